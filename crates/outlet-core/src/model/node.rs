// ── Node domain types ──
//
// `TNode` is one node's content and metadata, always paired with exactly
// one `NodeIdentifier`. The payload is a closed sum: each variant carries
// only the fields its storage backend actually has.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, FromRepr};

use super::identifier::{NodeIdentifier, Uid};
use crate::error::CoreError;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Render a wire timestamp for humans.
pub fn timestamp_to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(i64::try_from(ts).ok()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum TrashStatus {
    NotTrashed = 0,
    ExplicitlyTrashed = 1,
    ImplicitlyTrashed = 2,
    Deleted = 3,
}

/// Custom icon id. `0` on the wire means "no custom icon".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IconId(pub u32);

/// Icon image fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub icon_id: IconId,
    pub content: Bytes,
}

/// Aggregate counters for a directory subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    pub file_count: u32,
    pub dir_count: u32,
    pub trashed_file_count: u32,
    pub trashed_dir_count: u32,
    pub size_bytes: u64,
    pub trashed_bytes: u64,
}

// ── Payloads ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFileMeta {
    pub size_bytes: Option<u64>,
    pub md5: Option<String>,
    pub sha256: Option<String>,
    pub sync_ts: Option<Timestamp>,
    pub create_ts: Option<Timestamp>,
    pub modify_ts: Option<Timestamp>,
    pub change_ts: Option<Timestamp>,
    pub is_live: bool,
    pub parent_uid: Uid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalDirMeta {
    pub dir_stats: Option<DirectoryStats>,
    pub is_live: bool,
    pub parent_uid: Uid,
    pub sync_ts: Option<Timestamp>,
    pub create_ts: Option<Timestamp>,
    pub modify_ts: Option<Timestamp>,
    pub change_ts: Option<Timestamp>,
}

/// Fields every GDrive node carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GDriveCommon {
    pub goog_id: Option<String>,
    pub name: String,
    pub owner_uid: Uid,
    pub shared_by_user_uid: Option<Uid>,
    pub drive_id: Option<String>,
    pub parent_uids: Vec<Uid>,
    pub sync_ts: Option<Timestamp>,
    pub modify_ts: Option<Timestamp>,
    pub create_ts: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GDriveFileMeta {
    pub common: GDriveCommon,
    pub version: u32,
    /// `0` means the mime type is unknown.
    pub mime_type_uid: Uid,
    pub size_bytes: Option<u64>,
    pub md5: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GDriveFolderMeta {
    pub common: GDriveCommon,
    pub dir_stats: Option<DirectoryStats>,
    pub all_children_fetched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodePayload {
    LocalFile(LocalFileMeta),
    LocalDir(LocalDirMeta),
    GDriveFile(GDriveFileMeta),
    GDriveFolder(GDriveFolderMeta),
    Container { dir_stats: Option<DirectoryStats> },
    RootType { dir_stats: Option<DirectoryStats> },
    /// Requires a change-tree SPID.
    Category { dir_stats: Option<DirectoryStats> },
    /// Placeholder for a directory that does not exist yet.
    NonexistentDir { name: String },
}

impl NodePayload {
    pub fn is_dir(&self) -> bool {
        !matches!(self, Self::LocalFile(_) | Self::GDriveFile(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::LocalFile(_) => "local-file",
            Self::LocalDir(_) => "local-dir",
            Self::GDriveFile(_) => "gdrive-file",
            Self::GDriveFolder(_) => "gdrive-folder",
            Self::Container { .. } => "container",
            Self::RootType { .. } => "root-type",
            Self::Category { .. } => "category",
            Self::NonexistentDir { .. } => "nonexistent-dir",
        }
    }

    fn check_identifier(&self, identifier: &NodeIdentifier) -> Result<(), CoreError> {
        let ok = match self {
            Self::LocalFile(_) | Self::LocalDir(_) => identifier.is_local_disk(),
            Self::GDriveFile(_) | Self::GDriveFolder(_) => identifier.is_gdrive(),
            Self::Category { .. } => identifier.is_change_tree(),
            Self::Container { .. } | Self::RootType { .. } | Self::NonexistentDir { .. } => true,
        };
        if ok {
            Ok(())
        } else {
            Err(CoreError::invalid_state(format!(
                "{} node cannot have identifier {identifier}",
                self.kind_name()
            )))
        }
    }
}

// ── TNode ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TNode {
    identifier: NodeIdentifier,
    pub trashed: TrashStatus,
    pub is_shared: bool,
    custom_icon: Option<IconId>,
    payload: NodePayload,
}

impl TNode {
    /// Build a node, rejecting identifier/payload combinations that cannot
    /// exist (e.g. a local file keyed by a GDrive id).
    pub fn new(
        identifier: NodeIdentifier,
        trashed: TrashStatus,
        is_shared: bool,
        payload: NodePayload,
    ) -> Result<Self, CoreError> {
        payload.check_identifier(&identifier)?;
        Ok(Self {
            identifier,
            trashed,
            is_shared,
            custom_icon: None,
            payload,
        })
    }

    pub(crate) fn check_consistency(&self) -> Result<(), CoreError> {
        self.payload.check_identifier(&self.identifier)
    }

    pub fn identifier(&self) -> &NodeIdentifier {
        &self.identifier
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub fn custom_icon(&self) -> Option<IconId> {
        self.custom_icon
    }

    pub fn set_custom_icon(&mut self, icon: Option<IconId>) {
        self.custom_icon = icon;
    }

    pub fn is_dir(&self) -> bool {
        self.payload.is_dir()
    }

    pub fn dir_stats(&self) -> Option<&DirectoryStats> {
        match &self.payload {
            NodePayload::LocalDir(meta) => meta.dir_stats.as_ref(),
            NodePayload::GDriveFolder(meta) => meta.dir_stats.as_ref(),
            NodePayload::Container { dir_stats }
            | NodePayload::RootType { dir_stats }
            | NodePayload::Category { dir_stats } => dir_stats.as_ref(),
            NodePayload::LocalFile(_)
            | NodePayload::GDriveFile(_)
            | NodePayload::NonexistentDir { .. } => None,
        }
    }

    /// Attach or clear stats. Returns `false` if this payload has no stats slot.
    pub fn set_dir_stats(&mut self, stats: Option<DirectoryStats>) -> bool {
        let slot = match &mut self.payload {
            NodePayload::LocalDir(meta) => &mut meta.dir_stats,
            NodePayload::GDriveFolder(meta) => &mut meta.dir_stats,
            NodePayload::Container { dir_stats }
            | NodePayload::RootType { dir_stats }
            | NodePayload::Category { dir_stats } => dir_stats,
            NodePayload::LocalFile(_)
            | NodePayload::GDriveFile(_)
            | NodePayload::NonexistentDir { .. } => return false,
        };
        *slot = stats;
        true
    }

    /// Display name: the payload's own name where it has one, else the
    /// last path component.
    pub fn name(&self) -> String {
        match &self.payload {
            NodePayload::GDriveFile(meta) => meta.common.name.clone(),
            NodePayload::GDriveFolder(meta) => meta.common.name.clone(),
            NodePayload::NonexistentDir { name } => name.clone(),
            _ => match &self.identifier {
                NodeIdentifier::Single(spid) => spid.name().to_owned(),
                NodeIdentifier::Multi(mpid) => mpid
                    .path_list
                    .first()
                    .map(|p| p.rsplit('/').next().unwrap_or(p).to_owned())
                    .unwrap_or_default(),
            },
        }
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match &self.payload {
            NodePayload::LocalFile(meta) => meta.size_bytes,
            NodePayload::GDriveFile(meta) => meta.size_bytes,
            _ => self.dir_stats().map(|s| s.size_bytes),
        }
    }

    pub fn modify_ts(&self) -> Option<Timestamp> {
        match &self.payload {
            NodePayload::LocalFile(meta) => meta.modify_ts,
            NodePayload::LocalDir(meta) => meta.modify_ts,
            NodePayload::GDriveFile(meta) => meta.common.modify_ts,
            NodePayload::GDriveFolder(meta) => meta.common.modify_ts,
            _ => None,
        }
    }
}

/// A single-path identifier together with the node it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpidNodePair {
    pub spid: super::identifier::SinglePathId,
    pub node: TNode,
}
