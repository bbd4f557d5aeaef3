// ── Device domain types ──

use serde::Serialize;
use strum::{Display, FromRepr};

use super::identifier::Uid;

/// Namespace classification of a device's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum TreeType {
    Na = 0,
    Mixed = 1,
    LocalDisk = 2,
    #[strum(serialize = "GDRIVE")]
    GDrive = 3,
}

/// A registered storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub device_uid: Uid,
    pub long_device_id: String,
    pub tree_type: TreeType,
    pub friendly_name: String,
}
