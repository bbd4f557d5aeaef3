// ── Node identity types ──
//
// A `NodeIdentifier` names a node within one device's namespace. The
// single-path form (SPID) pins the node to exactly one path and is what
// UI rows are keyed on; the multi-path form exists because a GDrive node
// can live under several parents at once.

use std::fmt;

use serde::Serialize;
use strum::{Display, FromRepr};

/// Opaque numeric id. `NULL_UID` is reserved and never names a node.
pub type Uid = u32;

/// Opaque row handle, derived from an identifier.
pub type Guid = String;

pub const NULL_UID: Uid = 0;
pub const SUPER_ROOT_UID: Uid = 1;
pub const SUPER_ROOT_DEVICE_UID: Uid = 1;
pub const LOCAL_ROOT_UID: Uid = 2;
pub const ROOT_PATH_UID: Uid = LOCAL_ROOT_UID;
pub const GDRIVE_ROOT_UID: Uid = 3;
pub const MIN_FREE_UID: Uid = 100;
pub const ROOT_PATH: &str = "/";

/// Wire tag selecting the identifier variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum NodeIdentifierType {
    Null = 0,
    GenericMultiPath = 1,
    GenericSpid = 2,
    MixedTreeSpid = 3,
    LocalDiskSpid = 4,
    GdriveMpid = 10,
    GdriveSpid = 11,
    ChangeTreeCategoryNone = 90,
    ChangeTreeCategoryRm = 91,
    ChangeTreeCategoryCp = 92,
    ChangeTreeCategoryCpOnto = 93,
    ChangeTreeCategoryMv = 94,
    ChangeTreeCategoryMvOnto = 95,
}

/// Category of a diff/merge result tree. Shares its numbering with the
/// `CHANGE_TREE_CATEGORY_*` identifier tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ChangeTreeCategory {
    None = 90,
    Rm = 91,
    Cp = 92,
    CpOnto = 93,
    Mv = 94,
    MvOnto = 95,
}

impl ChangeTreeCategory {
    pub fn identifier_type(self) -> NodeIdentifierType {
        match self {
            Self::None => NodeIdentifierType::ChangeTreeCategoryNone,
            Self::Rm => NodeIdentifierType::ChangeTreeCategoryRm,
            Self::Cp => NodeIdentifierType::ChangeTreeCategoryCp,
            Self::CpOnto => NodeIdentifierType::ChangeTreeCategoryCpOnto,
            Self::Mv => NodeIdentifierType::ChangeTreeCategoryMv,
            Self::MvOnto => NodeIdentifierType::ChangeTreeCategoryMvOnto,
        }
    }

    pub fn from_identifier_type(nid_type: NodeIdentifierType) -> Option<Self> {
        Self::from_repr(nid_type as u32)
    }
}

// ── Single-path identifiers ─────────────────────────────────────────

/// Which concrete SPID this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpidKind {
    /// `path_uid` always equals `node_uid`.
    LocalDisk,
    GDrive,
    /// Lives on the super-root device.
    MixedTree,
    /// A row in a diff/merge result tree. `node_uid` equals `path_uid`.
    ChangeTree(ChangeTreeCategory),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SinglePathId {
    pub kind: SpidKind,
    pub node_uid: Uid,
    pub device_uid: Uid,
    pub path: String,
    /// `NULL_UID` when unset. Must be non-null before the id goes on the wire.
    pub path_uid: Uid,
    pub parent_guid: Option<Guid>,
}

impl SinglePathId {
    pub fn identifier_type(&self) -> NodeIdentifierType {
        match self.kind {
            SpidKind::LocalDisk => NodeIdentifierType::LocalDiskSpid,
            SpidKind::GDrive => NodeIdentifierType::GdriveSpid,
            SpidKind::MixedTree => NodeIdentifierType::MixedTreeSpid,
            SpidKind::ChangeTree(category) => category.identifier_type(),
        }
    }

    pub fn guid(&self) -> Guid {
        match self.kind {
            SpidKind::ChangeTree(category) => format!(
                "{}:{}:{}",
                self.device_uid, category as u32, self.path_uid
            ),
            _ => format!("{}:{}", self.device_uid, self.path_uid),
        }
    }

    pub fn category(&self) -> Option<ChangeTreeCategory> {
        match self.kind {
            SpidKind::ChangeTree(category) => Some(category),
            _ => None,
        }
    }

    /// Last path component, or the path itself for the root.
    pub fn name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or(&self.path)
    }
}

// ── Multi-path identifiers ──────────────────────────────────────────

/// GDrive node identified independently of any one parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MultiPathId {
    pub node_uid: Uid,
    pub device_uid: Uid,
    pub path_list: Vec<String>,
}

impl MultiPathId {
    pub fn guid(&self) -> Guid {
        format!("{}:{}", self.device_uid, self.node_uid)
    }
}

// ── NodeIdentifier ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NodeIdentifier {
    Single(SinglePathId),
    Multi(MultiPathId),
}

impl NodeIdentifier {
    pub fn node_uid(&self) -> Uid {
        match self {
            Self::Single(spid) => spid.node_uid,
            Self::Multi(mpid) => mpid.node_uid,
        }
    }

    pub fn device_uid(&self) -> Uid {
        match self {
            Self::Single(spid) => spid.device_uid,
            Self::Multi(mpid) => mpid.device_uid,
        }
    }

    pub fn identifier_type(&self) -> NodeIdentifierType {
        match self {
            Self::Single(spid) => spid.identifier_type(),
            Self::Multi(_) => NodeIdentifierType::GdriveMpid,
        }
    }

    pub fn guid(&self) -> Guid {
        match self {
            Self::Single(spid) => spid.guid(),
            Self::Multi(mpid) => mpid.guid(),
        }
    }

    pub fn path_list(&self) -> Vec<&str> {
        match self {
            Self::Single(spid) => vec![spid.path.as_str()],
            Self::Multi(mpid) => mpid.path_list.iter().map(String::as_str).collect(),
        }
    }

    pub fn as_spid(&self) -> Option<&SinglePathId> {
        match self {
            Self::Single(spid) => Some(spid),
            Self::Multi(_) => None,
        }
    }

    pub fn is_spid(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    pub fn is_local_disk(&self) -> bool {
        matches!(
            self,
            Self::Single(SinglePathId {
                kind: SpidKind::LocalDisk,
                ..
            })
        )
    }

    pub fn is_gdrive(&self) -> bool {
        match self {
            Self::Single(spid) => spid.kind == SpidKind::GDrive,
            Self::Multi(_) => true,
        }
    }

    pub fn is_change_tree(&self) -> bool {
        matches!(
            self,
            Self::Single(SinglePathId {
                kind: SpidKind::ChangeTree(_),
                ..
            })
        )
    }
}

impl From<SinglePathId> for NodeIdentifier {
    fn from(spid: SinglePathId) -> Self {
        Self::Single(spid)
    }
}

impl From<MultiPathId> for NodeIdentifier {
    fn from(mpid: MultiPathId) -> Self {
        Self::Multi(mpid)
    }
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(spid) => write!(
                f,
                "{}({} node={} \"{}\")",
                spid.identifier_type(),
                spid.guid(),
                spid.node_uid,
                spid.path
            ),
            Self::Multi(mpid) => write!(
                f,
                "GDRIVE_MPID({} paths={:?})",
                mpid.guid(),
                mpid.path_list
            ),
        }
    }
}
