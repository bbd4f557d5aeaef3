// ── Node identifier factory ──
//
// Rebuilds the right `NodeIdentifier` variant from the raw fields that
// travel on the wire. Device lookups go through `DeviceRegistry` so the
// factory stays independent of where device state is kept.

use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{
    ChangeTreeCategory, Device, GDRIVE_ROOT_UID, Guid, LOCAL_ROOT_UID, MultiPathId, NULL_UID,
    NodeIdentifier, NodeIdentifierType, ROOT_PATH, ROOT_PATH_UID, SUPER_ROOT_DEVICE_UID,
    SinglePathId, SpidKind, TreeType, Uid,
};

/// Read access to the set of known devices.
pub trait DeviceRegistry: Send + Sync {
    fn device(&self, device_uid: Uid) -> Option<Device>;
    fn device_list(&self) -> Vec<Device>;
}

pub struct NodeIdentifierFactory {
    registry: Arc<dyn DeviceRegistry>,
}

impl NodeIdentifierFactory {
    pub fn new(registry: Arc<dyn DeviceRegistry>) -> Self {
        Self { registry }
    }

    /// Build a single-path identifier. An empty `parent_guid` means none.
    pub fn build_spid(
        &self,
        node_uid: Uid,
        device_uid: Uid,
        identifier_type: NodeIdentifierType,
        path: impl Into<String>,
        path_uid: Uid,
        parent_guid: impl Into<Guid>,
    ) -> Result<SinglePathId, CoreError> {
        let parent_guid: Guid = parent_guid.into();
        let parent_guid = (!parent_guid.is_empty()).then_some(parent_guid);
        let path = path.into();

        let (kind, node_uid, path_uid) = match identifier_type {
            NodeIdentifierType::LocalDiskSpid => (SpidKind::LocalDisk, node_uid, node_uid),
            NodeIdentifierType::GdriveSpid => (SpidKind::GDrive, node_uid, path_uid),
            NodeIdentifierType::MixedTreeSpid => {
                if device_uid != SUPER_ROOT_DEVICE_UID {
                    return Err(CoreError::invalid_state(format!(
                        "expected device_uid {SUPER_ROOT_DEVICE_UID} for {identifier_type} but found {device_uid}"
                    )));
                }
                if path_uid == NULL_UID {
                    return Err(CoreError::invalid_state(format!(
                        "path_uid cannot be null for {identifier_type}"
                    )));
                }
                (SpidKind::MixedTree, node_uid, path_uid)
            }
            other => {
                let Some(category) = ChangeTreeCategory::from_identifier_type(other) else {
                    return Err(CoreError::invalid_state(format!(
                        "invalid identifier type for SPID: {other} (device_uid={device_uid} node_uid={node_uid})"
                    )));
                };
                (SpidKind::ChangeTree(category), path_uid, path_uid)
            }
        };

        Ok(SinglePathId {
            kind,
            node_uid,
            device_uid,
            path,
            path_uid,
            parent_guid,
        })
    }

    /// Build a multi-path identifier. Only GDrive has these.
    pub fn build_multi_path(
        &self,
        node_uid: Uid,
        device_uid: Uid,
        identifier_type: NodeIdentifierType,
        path_list: Vec<String>,
    ) -> Result<MultiPathId, CoreError> {
        if device_uid == NULL_UID {
            return Err(CoreError::invalid_state("device_uid cannot be null"));
        }
        match identifier_type {
            NodeIdentifierType::GdriveMpid => Ok(MultiPathId {
                node_uid,
                device_uid,
                path_list,
            }),
            other => Err(CoreError::invalid_state(format!(
                "invalid identifier type for multi-path id: {other} (device_uid={device_uid} node_uid={node_uid})"
            ))),
        }
    }

    pub fn tree_type_for_device(&self, device_uid: Uid) -> Result<TreeType, CoreError> {
        if device_uid == NULL_UID {
            return Err(CoreError::invalid_state("tree_type_for_device: device_uid is null"));
        }
        if device_uid == SUPER_ROOT_DEVICE_UID {
            return Ok(TreeType::Mixed);
        }
        self.registry
            .device(device_uid)
            .map(|d| d.tree_type)
            .ok_or_else(|| {
                CoreError::invalid_state(format!("could not find device with uid {device_uid}"))
            })
    }

    pub fn root_gdrive_spid(&self, device_uid: Uid) -> SinglePathId {
        SinglePathId {
            kind: SpidKind::GDrive,
            node_uid: GDRIVE_ROOT_UID,
            device_uid,
            path: ROOT_PATH.into(),
            path_uid: ROOT_PATH_UID,
            parent_guid: None,
        }
    }

    pub fn root_gdrive_identifier(&self, device_uid: Uid) -> NodeIdentifier {
        NodeIdentifier::Multi(MultiPathId {
            node_uid: GDRIVE_ROOT_UID,
            device_uid,
            path_list: vec![ROOT_PATH.into()],
        })
    }

    pub fn root_local_spid(&self, device_uid: Uid) -> SinglePathId {
        SinglePathId {
            kind: SpidKind::LocalDisk,
            node_uid: LOCAL_ROOT_UID,
            device_uid,
            path: ROOT_PATH.into(),
            path_uid: LOCAL_ROOT_UID,
            parent_guid: None,
        }
    }

    /// The one local-disk device. Zero or several is an error.
    pub fn default_local_device_uid(&self) -> Result<Uid, CoreError> {
        let mut local = self
            .registry
            .device_list()
            .into_iter()
            .filter(|d| d.tree_type == TreeType::LocalDisk);
        match (local.next(), local.next()) {
            (Some(device), None) => Ok(device.device_uid),
            (None, _) => Err(CoreError::invalid_state("no local disks found")),
            (Some(_), Some(_)) => Err(CoreError::invalid_state(
                "multiple local disks found but this is not supported",
            )),
        }
    }
}
