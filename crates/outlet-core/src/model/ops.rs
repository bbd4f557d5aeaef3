// ── User operation types ──

use serde::Serialize;
use strum::{Display, FromRepr};

use super::identifier::Uid;
use super::node::TNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum UserOpType {
    Rm = 1,
    Unlink = 2,
    Mkdir = 3,
    Cp = 4,
    CpOnto = 5,
    StartDirCp = 6,
    FinishDirCp = 7,
    Mv = 8,
    MvOnto = 9,
    StartDirMv = 10,
    FinishDirMv = 11,
    CreateLink = 12,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserOp {
    pub op_uid: Uid,
    pub batch_uid: Uid,
    pub op_type: UserOpType,
    pub src_node: TNode,
    pub dst_node: Option<TNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum DragOperation {
    Move = 1,
    Copy = 2,
    Link = 3,
    Delete = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum DirConflictPolicy {
    Prompt = 1,
    Skip = 2,
    Replace = 10,
    Rename = 20,
    Merge = 30,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum FileConflictPolicy {
    Prompt = 1,
    Skip = 2,
    ReplaceAlways = 10,
    ReplaceIfOlderAndDifferent = 11,
    RenameAlways = 20,
    RenameIfOlderAndDifferent = 21,
    RenameIfDifferent = 22,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorHandlingStrategy {
    Prompt = 1,
    CancelBatch = 2,
    CancelFailedOpsAndAllDescendantOps = 3,
    CancelFailedOpsOnly = 4,
}

/// Everything `drop_dragged_nodes` needs besides the tree ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragDropSpec {
    pub src_guid_list: Vec<String>,
    pub dst_guid: String,
    pub is_into: bool,
    pub drag_operation: DragOperation,
    pub dir_conflict_policy: DirConflictPolicy,
    pub file_conflict_policy: FileConflictPolicy,
}
