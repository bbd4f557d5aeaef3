use outlet_api::wire::{IdentifierSubtypeMeta, MultiPathIdMeta, NodeIdentifierMsg, SinglePathIdMeta};

use super::Codec;
use crate::error::CoreError;
use crate::model::{
    NULL_UID, NodeIdentifier, NodeIdentifierType, SUPER_ROOT_DEVICE_UID, SinglePathId, SpidKind,
};

impl Codec {
    pub fn identifier_to_wire(&self, id: &NodeIdentifier) -> Result<NodeIdentifierMsg, CoreError> {
        match id {
            NodeIdentifier::Single(spid) => self.spid_to_wire(spid),
            NodeIdentifier::Multi(mpid) => Ok(NodeIdentifierMsg {
                node_uid: mpid.node_uid,
                device_uid: mpid.device_uid,
                identifier_type: NodeIdentifierType::GdriveMpid as u32,
                subtype_meta: Some(IdentifierSubtypeMeta::MultiPathIdMeta(MultiPathIdMeta {
                    path_list: mpid.path_list.clone(),
                })),
            }),
        }
    }

    pub fn spid_to_wire(&self, spid: &SinglePathId) -> Result<NodeIdentifierMsg, CoreError> {
        if spid.path_uid == NULL_UID {
            return Err(CoreError::invalid_state(format!(
                "SPID is missing path_uid: {}",
                NodeIdentifier::Single(spid.clone())
            )));
        }
        check_kind_rules(spid)?;
        check_not_own_parent(spid)?;

        Ok(NodeIdentifierMsg {
            node_uid: spid.node_uid,
            device_uid: spid.device_uid,
            identifier_type: spid.identifier_type() as u32,
            subtype_meta: Some(IdentifierSubtypeMeta::SpidMeta(SinglePathIdMeta {
                single_path: spid.path.clone(),
                path_uid: spid.path_uid,
                parent_guid: spid.parent_guid.clone().unwrap_or_default(),
            })),
        })
    }

    pub fn identifier_from_wire(&self, msg: NodeIdentifierMsg) -> Result<NodeIdentifier, CoreError> {
        let Some(nid_type) = NodeIdentifierType::from_repr(msg.identifier_type) else {
            return Err(CoreError::invalid_state(format!(
                "invalid identifier_type from wire: {}",
                msg.identifier_type
            )));
        };
        let Some(subtype_meta) = msg.subtype_meta else {
            return Err(CoreError::invalid_state(
                "node identifier from wire has no subtype_meta",
            ));
        };

        match subtype_meta {
            IdentifierSubtypeMeta::SpidMeta(meta) => {
                let spid = self.factory.build_spid(
                    msg.node_uid,
                    msg.device_uid,
                    nid_type,
                    meta.single_path,
                    meta.path_uid,
                    meta.parent_guid,
                )?;
                check_not_own_parent(&spid)?;
                Ok(NodeIdentifier::Single(spid))
            }
            IdentifierSubtypeMeta::MultiPathIdMeta(meta) => self
                .factory
                .build_multi_path(msg.node_uid, msg.device_uid, nid_type, meta.path_list)
                .map(NodeIdentifier::Multi),
        }
    }

    /// Decode an identifier that must be single-path.
    pub fn spid_from_wire(&self, msg: NodeIdentifierMsg) -> Result<SinglePathId, CoreError> {
        let (node_uid, device_uid) = (msg.node_uid, msg.device_uid);
        match self.identifier_from_wire(msg)? {
            NodeIdentifier::Single(spid) => Ok(spid),
            NodeIdentifier::Multi(mpid) => {
                tracing::error!(node_uid, device_uid, "expected a SPID from the wire");
                Err(CoreError::invalid_state(format!(
                    "expected a SPID but got {}",
                    NodeIdentifier::Multi(mpid)
                )))
            }
        }
    }
}

/// Per-kind uid rules that `build_spid` enforces on the way back in.
fn check_kind_rules(spid: &SinglePathId) -> Result<(), CoreError> {
    match spid.kind {
        SpidKind::LocalDisk | SpidKind::ChangeTree(_) if spid.node_uid != spid.path_uid => {
            Err(CoreError::invalid_state(format!(
                "{} SPID must have node_uid == path_uid (node_uid={}, path_uid={})",
                spid.identifier_type(),
                spid.node_uid,
                spid.path_uid
            )))
        }
        SpidKind::MixedTree if spid.device_uid != SUPER_ROOT_DEVICE_UID => {
            Err(CoreError::invalid_state(format!(
                "{} SPID must be on device {SUPER_ROOT_DEVICE_UID}, found {}",
                spid.identifier_type(),
                spid.device_uid
            )))
        }
        _ => Ok(()),
    }
}

fn check_not_own_parent(spid: &SinglePathId) -> Result<(), CoreError> {
    if spid.parent_guid.as_deref() == Some(spid.guid().as_str()) {
        return Err(CoreError::invalid_state(format!(
            "SPID's parent GUID is its own GUID: {}",
            spid.guid()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert::test_support::{GDRIVE_DEVICE, LOCAL_DEVICE, codec};
    use crate::model::{ChangeTreeCategory, MultiPathId};

    fn spid(kind: SpidKind, node_uid: u32, device_uid: u32, path_uid: u32) -> SinglePathId {
        SinglePathId {
            kind,
            node_uid,
            device_uid,
            path: "/docs/report.pdf".into(),
            path_uid,
            parent_guid: Some(format!("{device_uid}:1")),
        }
    }

    #[test]
    fn every_identifier_variant_round_trips() {
        let codec = codec();
        let cases = vec![
            NodeIdentifier::Single(spid(SpidKind::LocalDisk, 150, LOCAL_DEVICE, 150)),
            NodeIdentifier::Single(spid(SpidKind::GDrive, 900, GDRIVE_DEVICE, 412)),
            NodeIdentifier::Single(spid(SpidKind::MixedTree, 9, SUPER_ROOT_DEVICE_UID, 33)),
            NodeIdentifier::Single(spid(
                SpidKind::ChangeTree(ChangeTreeCategory::MvOnto),
                220,
                LOCAL_DEVICE,
                220,
            )),
            NodeIdentifier::Multi(MultiPathId {
                node_uid: 901,
                device_uid: GDRIVE_DEVICE,
                path_list: vec!["/a/x".into(), "/b/x".into()],
            }),
        ];
        for id in cases {
            let wire = codec.identifier_to_wire(&id).unwrap();
            assert_eq!(codec.identifier_from_wire(wire).unwrap(), id);
        }
    }

    #[test]
    fn absent_parent_is_empty_on_wire() {
        let codec = codec();
        let mut local = spid(SpidKind::LocalDisk, 150, LOCAL_DEVICE, 150);
        local.parent_guid = None;
        let wire = codec.spid_to_wire(&local).unwrap();
        match &wire.subtype_meta {
            Some(IdentifierSubtypeMeta::SpidMeta(meta)) => assert_eq!(meta.parent_guid, ""),
            other => panic!("unexpected meta: {other:?}"),
        }
        assert_eq!(codec.spid_from_wire(wire).unwrap(), local);
    }

    #[test]
    fn null_path_uid_rejected_on_encode() {
        let codec = codec();
        let bad = spid(SpidKind::GDrive, 900, GDRIVE_DEVICE, NULL_UID);
        assert!(matches!(
            codec.spid_to_wire(&bad),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn kind_uid_rules_checked_on_encode() {
        let codec = codec();
        let cases = [
            spid(SpidKind::LocalDisk, 150, LOCAL_DEVICE, 151),
            spid(
                SpidKind::ChangeTree(ChangeTreeCategory::Cp),
                220,
                LOCAL_DEVICE,
                7,
            ),
            spid(SpidKind::MixedTree, 9, LOCAL_DEVICE, 33),
        ];
        for bad in cases {
            assert!(
                matches!(codec.spid_to_wire(&bad), Err(CoreError::InvalidState { .. })),
                "encoded {bad:?}"
            );
        }

        // GDrive SPIDs carry independent node and path uids
        let gdrive = spid(SpidKind::GDrive, 900, GDRIVE_DEVICE, 412);
        let wire = codec.spid_to_wire(&gdrive).unwrap();
        assert_eq!(codec.spid_from_wire(wire).unwrap(), gdrive);
    }

    #[test]
    fn self_parent_rejected_both_ways() {
        let codec = codec();
        let mut looped = spid(SpidKind::GDrive, 900, GDRIVE_DEVICE, 412);
        looped.parent_guid = Some(looped.guid());
        assert!(codec.spid_to_wire(&looped).is_err());

        let wire = NodeIdentifierMsg {
            node_uid: 900,
            device_uid: GDRIVE_DEVICE,
            identifier_type: NodeIdentifierType::GdriveSpid as u32,
            subtype_meta: Some(IdentifierSubtypeMeta::SpidMeta(SinglePathIdMeta {
                single_path: "/x".into(),
                path_uid: 412,
                parent_guid: format!("{GDRIVE_DEVICE}:412"),
            })),
        };
        assert!(matches!(
            codec.identifier_from_wire(wire),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn malformed_identifiers_rejected() {
        let codec = codec();
        let no_meta = NodeIdentifierMsg {
            node_uid: 5,
            device_uid: LOCAL_DEVICE,
            identifier_type: NodeIdentifierType::LocalDiskSpid as u32,
            subtype_meta: None,
        };
        assert!(codec.identifier_from_wire(no_meta).is_err());

        let bad_tag = NodeIdentifierMsg {
            identifier_type: 77,
            subtype_meta: Some(IdentifierSubtypeMeta::MultiPathIdMeta(MultiPathIdMeta::default())),
            ..NodeIdentifierMsg::default()
        };
        assert!(codec.identifier_from_wire(bad_tag).is_err());
    }

    #[test]
    fn spid_from_wire_rejects_multi_path() {
        let codec = codec();
        let mpid = NodeIdentifier::Multi(MultiPathId {
            node_uid: 901,
            device_uid: GDRIVE_DEVICE,
            path_list: vec!["/a".into()],
        });
        let wire = codec.identifier_to_wire(&mpid).unwrap();
        assert!(codec.spid_from_wire(wire).is_err());
    }
}
