// ── Domain model ──
//
// Canonical in-process types. Nothing here knows about the wire; see
// `crate::convert` for the translation layer.

pub mod device;
pub mod identifier;
pub mod menu;
pub mod node;
pub mod ops;
pub mod signal;
pub mod tree;

pub use device::{Device, TreeType};
pub use identifier::{
    ChangeTreeCategory, GDRIVE_ROOT_UID, Guid, LOCAL_ROOT_UID, MIN_FREE_UID, MultiPathId,
    NULL_UID, NodeIdentifier, NodeIdentifierType, ROOT_PATH, ROOT_PATH_UID, SUPER_ROOT_DEVICE_UID,
    SUPER_ROOT_UID, SinglePathId, SpidKind, Uid,
};
pub use menu::{ActionId, ActionType, MenuItemMeta, MenuItemType, TreeAction};
pub use node::{
    DirectoryStats, GDriveCommon, GDriveFileMeta, GDriveFolderMeta, Icon, IconId, LocalDirMeta,
    LocalFileMeta, NodePayload, SpidNodePair, TNode, Timestamp, TrashStatus,
    timestamp_to_datetime,
};
pub use ops::{
    DirConflictPolicy, DragDropSpec, DragOperation, ErrorHandlingStrategy, FileConflictPolicy,
    UserOp, UserOpType,
};
pub use signal::{Signal, SignalEnvelope, SignalEvent};
pub use tree::{
    DiffResultTreeIds, DisplayTreeRequest, DisplayTreeUiState, FilterCriteria, RowsOfInterest,
    StatsUpdate, Ternary, TreeDisplayMode, TreeLoadState,
};
