use outlet_api::wire::{
    BatchFailedMsg, DownloadMsg, DualDisplayTreeMsg, ErrorOccurredMsg, GuidSetMsg,
    HandleBatchFailedMsg, PlayStateMsg, SignalDataMsg, SignalMsg, SubtreeChangeMsg,
    TreeActionRequestMsg, TreeLoadUpdateMsg, UiEnablementMsg,
};

use super::{Codec, enum_from_wire};
use crate::error::CoreError;
use crate::model::{
    ErrorHandlingStrategy, Signal, SignalEnvelope, SignalEvent, TreeLoadState,
};

/// Pull the expected sub-message out of `signal_data`, or bail with
/// `InvalidState` naming what was found instead.
macro_rules! payload {
    ($data:expr, $signal:expr, $variant:ident) => {
        match $data {
            Some(SignalDataMsg::$variant(inner)) => inner,
            other => {
                return Err(CoreError::invalid_state(format!(
                    "signal {} expected `{}` payload but found {}",
                    $signal,
                    stringify!($variant),
                    other.as_ref().map_or("none", data_kind),
                )));
            }
        }
    };
}

impl Codec {
    /// Decode the payload of an already-identified signal.
    ///
    /// Callers resolve `sig_int` first so an unknown number can be reported
    /// separately from a malformed payload.
    pub fn signal_event_from_wire(
        &self,
        signal: Signal,
        msg: SignalMsg,
    ) -> Result<SignalEnvelope, CoreError> {
        let data = msg.signal_data;
        let event = match signal {
            Signal::Welcome => SignalEvent::Welcome,
            Signal::ShutdownApp => SignalEvent::ShutdownApp,
            Signal::DeregisterDisplayTree => SignalEvent::DeregisterDisplayTree,
            Signal::PauseOpExecution => SignalEvent::PauseOpExecution,
            Signal::ResumeOpExecution => SignalEvent::ResumeOpExecution,
            Signal::CommandComplete => SignalEvent::CommandComplete,
            Signal::CancelAllEditRoot => SignalEvent::CancelAllEditRoot,
            Signal::CancelOtherEditRoot => SignalEvent::CancelOtherEditRoot,
            Signal::LoadSubtreeDone => SignalEvent::LoadSubtreeDone,
            Signal::DiffTreesFailed => SignalEvent::DiffTreesFailed,
            Signal::ExitDiffMode => SignalEvent::ExitDiffMode,
            Signal::GenerateMergeTreeFailed => SignalEvent::GenerateMergeTreeFailed,

            Signal::ToggleUiEnablement => {
                let m = payload!(data, signal, UiEnablement);
                SignalEvent::ToggleUiEnablement { enable: m.enable }
            }
            Signal::ErrorOccurred => {
                let m = payload!(data, signal, ErrorOccurred);
                SignalEvent::ErrorOccurred {
                    msg: m.msg,
                    secondary_msg: m.secondary_msg,
                }
            }
            Signal::OpExecutionPlayStateChanged => {
                let m = payload!(data, signal, PlayState);
                SignalEvent::OpExecutionPlayStateChanged {
                    is_enabled: m.is_enabled,
                }
            }
            Signal::ExecuteAction => {
                let m = payload!(data, signal, TreeActionRequest);
                SignalEvent::ExecuteAction {
                    action_list: m
                        .action_list
                        .into_iter()
                        .map(|a| self.tree_action_from_wire(a))
                        .collect::<Result<_, _>>()?,
                }
            }
            Signal::DisplayTreeChanged => {
                let m = payload!(data, signal, DisplayTreeUiState);
                SignalEvent::DisplayTreeChanged {
                    tree: Box::new(self.display_tree_ui_state_from_wire(m)?),
                }
            }
            Signal::SetSelectedRows => {
                let m = payload!(data, signal, GuidSet);
                SignalEvent::SetSelectedRows {
                    guid_set: m.guid_set.into_iter().collect(),
                }
            }
            Signal::TreeLoadStateUpdated => {
                let m = payload!(data, signal, TreeLoadUpdate);
                SignalEvent::TreeLoadStateUpdated {
                    load_state: enum_from_wire(
                        m.load_state_int,
                        "load_state_int",
                        TreeLoadState::from_repr,
                    )?,
                    stats: self.stats_update_from_wire(m.stats_update),
                }
            }
            Signal::NodeUpserted => {
                let m = payload!(data, signal, Sn);
                SignalEvent::NodeUpserted {
                    sn: Box::new(self.sn_from_wire(m)?),
                }
            }
            Signal::NodeRemoved => {
                let m = payload!(data, signal, Sn);
                SignalEvent::NodeRemoved {
                    sn: Box::new(self.sn_from_wire(m)?),
                }
            }
            Signal::SubtreeNodesChanged => {
                let m = payload!(data, signal, Subtree);
                SignalEvent::SubtreeNodesChanged {
                    subtree_root: self.spid_from_wire(m.subtree_root_spid)?,
                    upserted: self.sn_list_from_wire(m.upserted_sn_list)?,
                    removed: self.sn_list_from_wire(m.removed_sn_list)?,
                }
            }
            Signal::DeviceUpserted => {
                let m = payload!(data, signal, Device);
                SignalEvent::DeviceUpserted {
                    device: self.device_from_wire(m)?,
                }
            }
            Signal::DownloadFromGdriveDone => {
                let m = payload!(data, signal, DownloadMsg);
                SignalEvent::DownloadFromGdriveDone {
                    filename: m.filename,
                }
            }
            Signal::DiffTreesDone => {
                let m = payload!(data, signal, DualDisplayTree);
                SignalEvent::DiffTreesDone {
                    left: Box::new(self.display_tree_ui_state_from_wire(m.left_tree)?),
                    right: Box::new(self.display_tree_ui_state_from_wire(m.right_tree)?),
                }
            }
            Signal::DiffTreesCancelled => {
                let m = payload!(data, signal, DualDisplayTree);
                SignalEvent::DiffTreesCancelled {
                    left: Box::new(self.display_tree_ui_state_from_wire(m.left_tree)?),
                    right: Box::new(self.display_tree_ui_state_from_wire(m.right_tree)?),
                }
            }
            Signal::GenerateMergeTreeDone => {
                let m = payload!(data, signal, DisplayTreeUiState);
                SignalEvent::GenerateMergeTreeDone {
                    tree: Box::new(self.display_tree_ui_state_from_wire(m)?),
                }
            }
            Signal::BatchFailed => {
                let m = payload!(data, signal, BatchFailed);
                SignalEvent::BatchFailed {
                    batch_uid: m.batch_uid,
                    msg: m.msg,
                    secondary_msg: m.secondary_msg,
                }
            }
            Signal::HandleBatchFailed => {
                let m = payload!(data, signal, HandleBatchFailed);
                SignalEvent::HandleBatchFailed {
                    batch_uid: m.batch_uid,
                    strategy: enum_from_wire(
                        m.error_handling_strategy,
                        "error_handling_strategy",
                        ErrorHandlingStrategy::from_repr,
                    )?,
                }
            }
        };
        Ok(SignalEnvelope::new(msg.sender, event))
    }

    /// Resolve `sig_int` and decode in one step.
    pub fn signal_from_wire(&self, msg: SignalMsg) -> Result<SignalEnvelope, CoreError> {
        let signal = enum_from_wire(msg.sig_int, "signal", Signal::from_repr)?;
        self.signal_event_from_wire(signal, msg)
    }

    pub fn signal_to_wire(&self, envelope: &SignalEnvelope) -> Result<SignalMsg, CoreError> {
        let signal_data = match &envelope.event {
            SignalEvent::Welcome
            | SignalEvent::ShutdownApp
            | SignalEvent::DeregisterDisplayTree
            | SignalEvent::PauseOpExecution
            | SignalEvent::ResumeOpExecution
            | SignalEvent::CommandComplete
            | SignalEvent::CancelAllEditRoot
            | SignalEvent::CancelOtherEditRoot
            | SignalEvent::LoadSubtreeDone
            | SignalEvent::DiffTreesFailed
            | SignalEvent::ExitDiffMode
            | SignalEvent::GenerateMergeTreeFailed => None,

            SignalEvent::ToggleUiEnablement { enable } => {
                Some(SignalDataMsg::UiEnablement(UiEnablementMsg { enable: *enable }))
            }
            SignalEvent::ErrorOccurred { msg, secondary_msg } => {
                Some(SignalDataMsg::ErrorOccurred(ErrorOccurredMsg {
                    msg: msg.clone(),
                    secondary_msg: secondary_msg.clone(),
                }))
            }
            SignalEvent::OpExecutionPlayStateChanged { is_enabled } => {
                Some(SignalDataMsg::PlayState(PlayStateMsg {
                    is_enabled: *is_enabled,
                }))
            }
            SignalEvent::ExecuteAction { action_list } => {
                Some(SignalDataMsg::TreeActionRequest(TreeActionRequestMsg {
                    action_list: action_list
                        .iter()
                        .map(|a| self.tree_action_to_wire(a))
                        .collect::<Result<_, _>>()?,
                }))
            }
            SignalEvent::DisplayTreeChanged { tree } | SignalEvent::GenerateMergeTreeDone { tree } => {
                Some(SignalDataMsg::DisplayTreeUiState(
                    self.display_tree_ui_state_to_wire(tree)?,
                ))
            }
            SignalEvent::SetSelectedRows { guid_set } => {
                let mut guid_set: Vec<String> = guid_set.iter().cloned().collect();
                guid_set.sort();
                Some(SignalDataMsg::GuidSet(GuidSetMsg { guid_set }))
            }
            SignalEvent::TreeLoadStateUpdated { load_state, stats } => {
                Some(SignalDataMsg::TreeLoadUpdate(TreeLoadUpdateMsg {
                    load_state_int: *load_state as u32,
                    stats_update: self.stats_update_to_wire(stats),
                }))
            }
            SignalEvent::NodeUpserted { sn } | SignalEvent::NodeRemoved { sn } => {
                Some(SignalDataMsg::Sn(self.sn_to_wire(sn)?))
            }
            SignalEvent::SubtreeNodesChanged {
                subtree_root,
                upserted,
                removed,
            } => Some(SignalDataMsg::Subtree(SubtreeChangeMsg {
                subtree_root_spid: self.spid_to_wire(subtree_root)?,
                upserted_sn_list: self.sn_list_to_wire(upserted)?,
                removed_sn_list: self.sn_list_to_wire(removed)?,
            })),
            SignalEvent::DeviceUpserted { device } => {
                Some(SignalDataMsg::Device(self.device_to_wire(device)))
            }
            SignalEvent::DownloadFromGdriveDone { filename } => {
                Some(SignalDataMsg::DownloadMsg(DownloadMsg {
                    filename: filename.clone(),
                }))
            }
            SignalEvent::DiffTreesDone { left, right }
            | SignalEvent::DiffTreesCancelled { left, right } => {
                Some(SignalDataMsg::DualDisplayTree(DualDisplayTreeMsg {
                    left_tree: self.display_tree_ui_state_to_wire(left)?,
                    right_tree: self.display_tree_ui_state_to_wire(right)?,
                }))
            }
            SignalEvent::BatchFailed {
                batch_uid,
                msg,
                secondary_msg,
            } => Some(SignalDataMsg::BatchFailed(BatchFailedMsg {
                batch_uid: *batch_uid,
                msg: msg.clone(),
                secondary_msg: secondary_msg.clone(),
            })),
            SignalEvent::HandleBatchFailed {
                batch_uid,
                strategy,
            } => Some(SignalDataMsg::HandleBatchFailed(HandleBatchFailedMsg {
                batch_uid: *batch_uid,
                error_handling_strategy: *strategy as u32,
            })),
        };

        Ok(SignalMsg {
            sig_int: envelope.signal() as u32,
            sender: envelope.sender.clone(),
            signal_data,
        })
    }
}

fn data_kind(data: &SignalDataMsg) -> &'static str {
    match data {
        SignalDataMsg::TreeActionRequest(_) => "tree_action_request",
        SignalDataMsg::DisplayTreeUiState(_) => "display_tree_ui_state",
        SignalDataMsg::DualDisplayTree(_) => "dual_display_tree",
        SignalDataMsg::PlayState(_) => "play_state",
        SignalDataMsg::UiEnablement(_) => "ui_enablement",
        SignalDataMsg::GuidSet(_) => "guid_set",
        SignalDataMsg::ErrorOccurred(_) => "error_occurred",
        SignalDataMsg::Sn(_) => "sn",
        SignalDataMsg::Subtree(_) => "subtree",
        SignalDataMsg::TreeLoadUpdate(_) => "tree_load_update",
        SignalDataMsg::DownloadMsg(_) => "download_msg",
        SignalDataMsg::Device(_) => "device",
        SignalDataMsg::BatchFailed(_) => "batch_failed",
        SignalDataMsg::HandleBatchFailed(_) => "handle_batch_failed",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert::test_support::{LOCAL_DEVICE, codec};
    use crate::model::{
        Device, LocalFileMeta, NodeIdentifier, NodePayload, SinglePathId, SpidKind, SpidNodePair,
        StatsUpdate, TNode, TrashStatus, TreeType,
    };

    fn file_sn(uid: u32) -> SpidNodePair {
        let spid = SinglePathId {
            kind: SpidKind::LocalDisk,
            node_uid: uid,
            device_uid: LOCAL_DEVICE,
            path: format!("/photos/{uid}.jpg"),
            path_uid: uid,
            parent_guid: None,
        };
        let node = TNode::new(
            NodeIdentifier::Single(spid.clone()),
            TrashStatus::NotTrashed,
            false,
            NodePayload::LocalFile(LocalFileMeta {
                size_bytes: Some(4_000_000),
                md5: None,
                sha256: None,
                sync_ts: None,
                create_ts: None,
                modify_ts: Some(1_650_000_000_000),
                change_ts: None,
                is_live: true,
                parent_uid: 110,
            }),
        )
        .unwrap();
        SpidNodePair { spid, node }
    }

    #[test]
    fn payload_signals_round_trip() {
        let codec = codec();
        let events = vec![
            SignalEvent::ToggleUiEnablement { enable: false },
            SignalEvent::error("Disk full", "/photos"),
            SignalEvent::OpExecutionPlayStateChanged { is_enabled: true },
            SignalEvent::SetSelectedRows {
                guid_set: ["2:150".to_owned(), "2:151".to_owned()].into_iter().collect(),
            },
            SignalEvent::TreeLoadStateUpdated {
                load_state: TreeLoadState::CompletelyLoaded,
                stats: StatsUpdate {
                    status_msg: "done".into(),
                    ..StatsUpdate::default()
                },
            },
            SignalEvent::NodeUpserted {
                sn: Box::new(file_sn(150)),
            },
            SignalEvent::NodeRemoved {
                sn: Box::new(file_sn(151)),
            },
            SignalEvent::SubtreeNodesChanged {
                subtree_root: file_sn(110).spid,
                upserted: vec![file_sn(152)],
                removed: vec![],
            },
            SignalEvent::DeviceUpserted {
                device: Device {
                    device_uid: 9,
                    long_device_id: "nas".into(),
                    tree_type: TreeType::LocalDisk,
                    friendly_name: "NAS".into(),
                },
            },
            SignalEvent::DownloadFromGdriveDone {
                filename: "/tmp/report.pdf".into(),
            },
            SignalEvent::BatchFailed {
                batch_uid: 12,
                msg: "Copy failed".into(),
                secondary_msg: "permission denied".into(),
            },
            SignalEvent::HandleBatchFailed {
                batch_uid: 12,
                strategy: ErrorHandlingStrategy::CancelFailedOpsOnly,
            },
        ];
        for event in events {
            let envelope = SignalEnvelope::new("left_tree", event);
            let wire = codec.signal_to_wire(&envelope).unwrap();
            assert_eq!(wire.sig_int, envelope.signal() as u32);
            assert_eq!(codec.signal_from_wire(wire).unwrap(), envelope);
        }
    }

    #[test]
    fn unit_signals_carry_no_data() {
        let codec = codec();
        let envelope = SignalEnvelope::new("backend", SignalEvent::ExitDiffMode);
        let wire = codec.signal_to_wire(&envelope).unwrap();
        assert!(wire.signal_data.is_none());
        assert_eq!(codec.signal_from_wire(wire).unwrap(), envelope);
    }

    #[test]
    fn missing_payload_is_invalid() {
        let codec = codec();
        let wire = SignalMsg {
            sig_int: Signal::DeviceUpserted as u32,
            sender: "backend".into(),
            signal_data: None,
        };
        let err = codec.signal_from_wire(wire).unwrap_err();
        assert!(err.to_string().contains("DEVICE_UPSERTED"), "{err}");
    }

    #[test]
    fn mismatched_payload_is_invalid() {
        let codec = codec();
        let wire = SignalMsg {
            sig_int: Signal::NodeUpserted as u32,
            sender: "backend".into(),
            signal_data: Some(SignalDataMsg::PlayState(PlayStateMsg { is_enabled: true })),
        };
        let err = codec.signal_from_wire(wire).unwrap_err();
        assert!(err.to_string().contains("play_state"), "{err}");
    }

    #[test]
    fn unknown_signal_number_is_invalid() {
        let codec = codec();
        let wire = SignalMsg {
            sig_int: 999,
            ..SignalMsg::default()
        };
        assert!(matches!(
            codec.signal_from_wire(wire),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn bad_load_state_is_invalid() {
        let codec = codec();
        let wire = SignalMsg {
            sig_int: Signal::TreeLoadStateUpdated as u32,
            sender: "backend".into(),
            signal_data: Some(SignalDataMsg::TreeLoadUpdate(TreeLoadUpdateMsg {
                load_state_int: 7,
                ..TreeLoadUpdateMsg::default()
            })),
        };
        assert!(codec.signal_from_wire(wire).is_err());
    }
}
