use outlet_api::wire::{
    ContainerNodeMeta, DirMetaMsg, GDriveFileMeta as GDriveFileWire,
    GDriveFolderMeta as GDriveFolderWire, LocalDirMeta as LocalDirWire,
    LocalFileMeta as LocalFileWire, NodeTypeMsg, NonexistentDirMeta, SpidNodePairMsg, TNodeMsg,
};

use super::{Codec, non_empty, non_zero};
use crate::error::CoreError;
use crate::model::{
    DirectoryStats, GDriveCommon, GDriveFileMeta, GDriveFolderMeta, IconId, LocalDirMeta,
    LocalFileMeta, NodePayload, SpidNodePair, TNode, TrashStatus,
};

impl Codec {
    // ── Encode ───────────────────────────────────────────────────────

    pub fn node_to_wire(&self, node: &TNode) -> Result<TNodeMsg, CoreError> {
        node.check_consistency()?;
        Ok(TNodeMsg {
            node_identifier: self.identifier_to_wire(node.identifier())?,
            trashed: node.trashed as u32,
            is_shared: node.is_shared,
            icon_id: node.custom_icon().map_or(0, |icon| icon.0),
            node_type: Some(payload_to_wire(node.payload())),
        })
    }

    pub fn node_list_to_wire(&self, nodes: &[TNode]) -> Result<Vec<TNodeMsg>, CoreError> {
        nodes.iter().map(|n| self.node_to_wire(n)).collect()
    }

    pub fn sn_to_wire(&self, sn: &SpidNodePair) -> Result<SpidNodePairMsg, CoreError> {
        Ok(SpidNodePairMsg {
            spid: self.spid_to_wire(&sn.spid)?,
            node: self.node_to_wire(&sn.node)?,
        })
    }

    // ── Decode ───────────────────────────────────────────────────────

    pub fn node_from_wire(&self, msg: TNodeMsg) -> Result<TNode, CoreError> {
        let identifier = self.identifier_from_wire(msg.node_identifier)?;
        let Some(node_type) = msg.node_type else {
            return Err(CoreError::invalid_state(format!(
                "wire TNode for {identifier} is missing node_type"
            )));
        };
        let Some(trashed) = TrashStatus::from_repr(msg.trashed) else {
            return Err(CoreError::invalid_state(format!(
                "invalid trash status {} for {identifier}",
                msg.trashed
            )));
        };

        let mut node = TNode::new(identifier, trashed, msg.is_shared, payload_from_wire(node_type))?;
        node.set_custom_icon(non_zero(msg.icon_id).map(IconId));
        Ok(node)
    }

    pub fn node_list_from_wire(&self, msgs: Vec<TNodeMsg>) -> Result<Vec<TNode>, CoreError> {
        msgs.into_iter().map(|m| self.node_from_wire(m)).collect()
    }

    pub fn sn_from_wire(&self, msg: SpidNodePairMsg) -> Result<SpidNodePair, CoreError> {
        Ok(SpidNodePair {
            spid: self.spid_from_wire(msg.spid)?,
            node: self.node_from_wire(msg.node)?,
        })
    }

    pub fn sn_list_from_wire(&self, msgs: Vec<SpidNodePairMsg>) -> Result<Vec<SpidNodePair>, CoreError> {
        msgs.into_iter().map(|m| self.sn_from_wire(m)).collect()
    }

    pub fn sn_list_to_wire(&self, sns: &[SpidNodePair]) -> Result<Vec<SpidNodePairMsg>, CoreError> {
        sns.iter().map(|sn| self.sn_to_wire(sn)).collect()
    }
}

// ── Directory stats ──────────────────────────────────────────────────

pub(crate) fn dir_stats_to_wire(stats: Option<&DirectoryStats>) -> DirMetaMsg {
    match stats {
        None => DirMetaMsg::default(),
        Some(s) => DirMetaMsg {
            has_data: true,
            file_count: s.file_count,
            dir_count: s.dir_count,
            trashed_file_count: s.trashed_file_count,
            trashed_dir_count: s.trashed_dir_count,
            size_bytes: s.size_bytes,
            trashed_bytes: s.trashed_bytes,
        },
    }
}

pub(crate) fn dir_stats_from_wire(msg: &DirMetaMsg) -> Option<DirectoryStats> {
    msg.has_data.then(|| DirectoryStats {
        file_count: msg.file_count,
        dir_count: msg.dir_count,
        trashed_file_count: msg.trashed_file_count,
        trashed_dir_count: msg.trashed_dir_count,
        size_bytes: msg.size_bytes,
        trashed_bytes: msg.trashed_bytes,
    })
}

// ── Payloads ─────────────────────────────────────────────────────────

fn payload_to_wire(payload: &NodePayload) -> NodeTypeMsg {
    match payload {
        NodePayload::LocalFile(meta) => NodeTypeMsg::LocalFileMeta(LocalFileWire {
            size_bytes: meta.size_bytes.unwrap_or_default(),
            sync_ts: meta.sync_ts.unwrap_or_default(),
            create_ts: meta.create_ts.unwrap_or_default(),
            modify_ts: meta.modify_ts.unwrap_or_default(),
            change_ts: meta.change_ts.unwrap_or_default(),
            is_live: meta.is_live,
            md5: meta.md5.clone().unwrap_or_default(),
            sha256: meta.sha256.clone().unwrap_or_default(),
            parent_uid: meta.parent_uid,
        }),
        NodePayload::LocalDir(meta) => NodeTypeMsg::LocalDirMeta(LocalDirWire {
            dir_meta: dir_stats_to_wire(meta.dir_stats.as_ref()),
            is_live: meta.is_live,
            parent_uid: meta.parent_uid,
            sync_ts: meta.sync_ts.unwrap_or_default(),
            create_ts: meta.create_ts.unwrap_or_default(),
            modify_ts: meta.modify_ts.unwrap_or_default(),
            change_ts: meta.change_ts.unwrap_or_default(),
        }),
        NodePayload::GDriveFile(meta) => {
            let c = &meta.common;
            NodeTypeMsg::GdriveFileMeta(GDriveFileWire {
                md5: meta.md5.clone().unwrap_or_default(),
                version: meta.version,
                size_bytes: meta.size_bytes.unwrap_or_default(),
                mime_type_uid: meta.mime_type_uid,
                goog_id: c.goog_id.clone().unwrap_or_default(),
                name: c.name.clone(),
                owner_uid: c.owner_uid,
                shared_by_user_uid: c.shared_by_user_uid.unwrap_or_default(),
                drive_id: c.drive_id.clone().unwrap_or_default(),
                parent_uid_list: c.parent_uids.clone(),
                sync_ts: c.sync_ts.unwrap_or_default(),
                modify_ts: c.modify_ts.unwrap_or_default(),
                create_ts: c.create_ts.unwrap_or_default(),
            })
        }
        NodePayload::GDriveFolder(meta) => {
            let c = &meta.common;
            NodeTypeMsg::GdriveFolderMeta(GDriveFolderWire {
                dir_meta: dir_stats_to_wire(meta.dir_stats.as_ref()),
                all_children_fetched: meta.all_children_fetched,
                goog_id: c.goog_id.clone().unwrap_or_default(),
                name: c.name.clone(),
                owner_uid: c.owner_uid,
                shared_by_user_uid: c.shared_by_user_uid.unwrap_or_default(),
                drive_id: c.drive_id.clone().unwrap_or_default(),
                parent_uid_list: c.parent_uids.clone(),
                sync_ts: c.sync_ts.unwrap_or_default(),
                modify_ts: c.modify_ts.unwrap_or_default(),
                create_ts: c.create_ts.unwrap_or_default(),
            })
        }
        NodePayload::Container { dir_stats } => NodeTypeMsg::ContainerMeta(ContainerNodeMeta {
            dir_meta: dir_stats_to_wire(dir_stats.as_ref()),
        }),
        NodePayload::RootType { dir_stats } => NodeTypeMsg::RootTypeMeta(ContainerNodeMeta {
            dir_meta: dir_stats_to_wire(dir_stats.as_ref()),
        }),
        NodePayload::Category { dir_stats } => NodeTypeMsg::CategoryMeta(ContainerNodeMeta {
            dir_meta: dir_stats_to_wire(dir_stats.as_ref()),
        }),
        NodePayload::NonexistentDir { name } => {
            NodeTypeMsg::NonexistentDirMeta(NonexistentDirMeta { name: name.clone() })
        }
    }
}

fn payload_from_wire(node_type: NodeTypeMsg) -> NodePayload {
    match node_type {
        NodeTypeMsg::LocalFileMeta(m) => NodePayload::LocalFile(LocalFileMeta {
            size_bytes: non_zero(m.size_bytes),
            md5: non_empty(m.md5),
            sha256: non_empty(m.sha256),
            sync_ts: non_zero(m.sync_ts),
            create_ts: non_zero(m.create_ts),
            modify_ts: non_zero(m.modify_ts),
            change_ts: non_zero(m.change_ts),
            is_live: m.is_live,
            parent_uid: m.parent_uid,
        }),
        NodeTypeMsg::LocalDirMeta(m) => NodePayload::LocalDir(LocalDirMeta {
            dir_stats: dir_stats_from_wire(&m.dir_meta),
            is_live: m.is_live,
            parent_uid: m.parent_uid,
            sync_ts: non_zero(m.sync_ts),
            create_ts: non_zero(m.create_ts),
            modify_ts: non_zero(m.modify_ts),
            change_ts: non_zero(m.change_ts),
        }),
        NodeTypeMsg::GdriveFileMeta(m) => NodePayload::GDriveFile(GDriveFileMeta {
            common: GDriveCommon {
                goog_id: non_empty(m.goog_id),
                name: m.name,
                owner_uid: m.owner_uid,
                shared_by_user_uid: non_zero(m.shared_by_user_uid),
                drive_id: non_empty(m.drive_id),
                parent_uids: m.parent_uid_list,
                sync_ts: non_zero(m.sync_ts),
                modify_ts: non_zero(m.modify_ts),
                create_ts: non_zero(m.create_ts),
            },
            version: m.version,
            mime_type_uid: m.mime_type_uid,
            size_bytes: non_zero(m.size_bytes),
            md5: non_empty(m.md5),
        }),
        NodeTypeMsg::GdriveFolderMeta(m) => NodePayload::GDriveFolder(GDriveFolderMeta {
            dir_stats: dir_stats_from_wire(&m.dir_meta),
            common: GDriveCommon {
                goog_id: non_empty(m.goog_id),
                name: m.name,
                owner_uid: m.owner_uid,
                shared_by_user_uid: non_zero(m.shared_by_user_uid),
                drive_id: non_empty(m.drive_id),
                parent_uids: m.parent_uid_list,
                sync_ts: non_zero(m.sync_ts),
                modify_ts: non_zero(m.modify_ts),
                create_ts: non_zero(m.create_ts),
            },
            all_children_fetched: m.all_children_fetched,
        }),
        NodeTypeMsg::ContainerMeta(m) => NodePayload::Container {
            dir_stats: dir_stats_from_wire(&m.dir_meta),
        },
        NodeTypeMsg::RootTypeMeta(m) => NodePayload::RootType {
            dir_stats: dir_stats_from_wire(&m.dir_meta),
        },
        NodeTypeMsg::CategoryMeta(m) => NodePayload::Category {
            dir_stats: dir_stats_from_wire(&m.dir_meta),
        },
        NodeTypeMsg::NonexistentDirMeta(m) => NodePayload::NonexistentDir { name: m.name },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert::test_support::{GDRIVE_DEVICE, LOCAL_DEVICE, codec};
    use crate::model::{
        ChangeTreeCategory, MultiPathId, NodeIdentifier, SUPER_ROOT_DEVICE_UID, SinglePathId,
        SpidKind,
    };

    fn local_id(uid: u32) -> NodeIdentifier {
        NodeIdentifier::Single(SinglePathId {
            kind: SpidKind::LocalDisk,
            node_uid: uid,
            device_uid: LOCAL_DEVICE,
            path: format!("/home/me/{uid}"),
            path_uid: uid,
            parent_guid: None,
        })
    }

    fn gdrive_mpid(uid: u32) -> NodeIdentifier {
        NodeIdentifier::Multi(MultiPathId {
            node_uid: uid,
            device_uid: GDRIVE_DEVICE,
            path_list: vec![format!("/My Drive/{uid}")],
        })
    }

    fn category_id() -> NodeIdentifier {
        NodeIdentifier::Single(SinglePathId {
            kind: SpidKind::ChangeTree(ChangeTreeCategory::Rm),
            node_uid: 500,
            device_uid: LOCAL_DEVICE,
            path: "/".into(),
            path_uid: 500,
            parent_guid: None,
        })
    }

    fn stats() -> DirectoryStats {
        DirectoryStats {
            file_count: 12,
            dir_count: 3,
            trashed_file_count: 1,
            trashed_dir_count: 0,
            size_bytes: 1 << 20,
            trashed_bytes: 512,
        }
    }

    fn gdrive_common() -> GDriveCommon {
        GDriveCommon {
            goog_id: Some("1AbC".into()),
            name: "budget.xlsx".into(),
            owner_uid: 44,
            shared_by_user_uid: None,
            drive_id: Some("drive-9".into()),
            parent_uids: vec![3, 870],
            sync_ts: Some(1_700_000_000_000),
            modify_ts: None,
            create_ts: Some(1_600_000_000_000),
        }
    }

    fn all_variants() -> Vec<TNode> {
        let mut nodes = vec![
            TNode::new(
                local_id(150),
                TrashStatus::NotTrashed,
                false,
                NodePayload::LocalFile(LocalFileMeta {
                    size_bytes: Some(2048),
                    md5: Some("d41d8cd98f00b204e9800998ecf8427e".into()),
                    sha256: None,
                    sync_ts: Some(1),
                    create_ts: Some(2),
                    modify_ts: Some(3),
                    change_ts: None,
                    is_live: true,
                    parent_uid: 149,
                }),
            ),
            TNode::new(
                local_id(149),
                TrashStatus::ExplicitlyTrashed,
                false,
                NodePayload::LocalDir(LocalDirMeta {
                    dir_stats: Some(stats()),
                    is_live: false,
                    parent_uid: 2,
                    sync_ts: None,
                    create_ts: Some(10),
                    modify_ts: Some(11),
                    change_ts: Some(12),
                }),
            ),
            TNode::new(
                gdrive_mpid(870),
                TrashStatus::NotTrashed,
                true,
                NodePayload::GDriveFile(GDriveFileMeta {
                    common: gdrive_common(),
                    version: 7,
                    mime_type_uid: 3,
                    size_bytes: None,
                    md5: None,
                }),
            ),
            TNode::new(
                gdrive_mpid(871),
                TrashStatus::ImplicitlyTrashed,
                false,
                NodePayload::GDriveFolder(GDriveFolderMeta {
                    common: GDriveCommon {
                        shared_by_user_uid: Some(45),
                        ..gdrive_common()
                    },
                    dir_stats: None,
                    all_children_fetched: true,
                }),
            ),
            TNode::new(
                NodeIdentifier::Single(SinglePathId {
                    kind: SpidKind::MixedTree,
                    node_uid: 1,
                    device_uid: SUPER_ROOT_DEVICE_UID,
                    path: "/".into(),
                    path_uid: 1,
                    parent_guid: None,
                }),
                TrashStatus::NotTrashed,
                false,
                NodePayload::Container {
                    dir_stats: Some(stats()),
                },
            ),
            TNode::new(
                local_id(2),
                TrashStatus::NotTrashed,
                false,
                NodePayload::RootType { dir_stats: None },
            ),
            TNode::new(
                category_id(),
                TrashStatus::NotTrashed,
                false,
                NodePayload::Category {
                    dir_stats: Some(DirectoryStats::default()),
                },
            ),
            TNode::new(
                local_id(160),
                TrashStatus::Deleted,
                false,
                NodePayload::NonexistentDir {
                    name: "Archive".into(),
                },
            ),
        ]
        .into_iter()
        .map(Result::unwrap)
        .collect::<Vec<_>>();
        nodes[0].set_custom_icon(Some(IconId(9)));
        nodes
    }

    #[test]
    fn every_node_variant_round_trips() {
        let codec = codec();
        for node in all_variants() {
            let wire = codec.node_to_wire(&node).unwrap();
            assert_eq!(codec.node_from_wire(wire).unwrap(), node);
        }
    }

    #[test]
    fn node_lists_round_trip() {
        let codec = codec();
        let nodes = all_variants();
        let wire = codec.node_list_to_wire(&nodes).unwrap();
        assert_eq!(codec.node_list_from_wire(wire).unwrap(), nodes);
    }

    #[test]
    fn absent_and_zero_stats_stay_distinct() {
        let absent = dir_stats_to_wire(None);
        let zero = dir_stats_to_wire(Some(&DirectoryStats::default()));
        assert!(!absent.has_data);
        assert!(zero.has_data);
        assert_eq!(dir_stats_from_wire(&absent), None);
        assert_eq!(dir_stats_from_wire(&zero), Some(DirectoryStats::default()));
    }

    #[test]
    fn unset_stats_counters_are_ignored() {
        let msg = DirMetaMsg {
            has_data: false,
            file_count: 99,
            ..DirMetaMsg::default()
        };
        assert_eq!(dir_stats_from_wire(&msg), None);
    }

    #[test]
    fn zero_icon_means_none() {
        let codec = codec();
        let mut wire = codec.node_to_wire(&all_variants()[1]).unwrap();
        wire.icon_id = 0;
        assert_eq!(codec.node_from_wire(wire).unwrap().custom_icon(), None);
    }

    #[test]
    fn missing_payload_is_invalid() {
        let codec = codec();
        let mut wire = codec.node_to_wire(&all_variants()[0]).unwrap();
        wire.node_type = None;
        assert!(matches!(
            codec.node_from_wire(wire),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn unknown_trash_status_is_invalid() {
        let codec = codec();
        let mut wire = codec.node_to_wire(&all_variants()[0]).unwrap();
        wire.trashed = 42;
        assert!(codec.node_from_wire(wire).is_err());
    }

    #[test]
    fn payload_identifier_mismatch_is_invalid() {
        let codec = codec();
        let mut wire = codec.node_to_wire(&all_variants()[0]).unwrap();
        wire.node_identifier = codec.identifier_to_wire(&gdrive_mpid(1000)).unwrap();
        assert!(codec.node_from_wire(wire).is_err());

        let mut wire = codec.node_to_wire(&all_variants()[6]).unwrap();
        wire.node_identifier = codec.identifier_to_wire(&local_id(501)).unwrap();
        assert!(codec.node_from_wire(wire).is_err());
    }

    #[test]
    fn sn_round_trip() {
        let codec = codec();
        let node = all_variants().remove(0);
        let spid = node.identifier().as_spid().unwrap().clone();
        let sn = SpidNodePair { spid, node };
        let wire = codec.sn_to_wire(&sn).unwrap();
        assert_eq!(codec.sn_from_wire(wire).unwrap(), sn);
    }
}
