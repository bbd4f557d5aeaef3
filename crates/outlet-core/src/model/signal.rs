// ── Signal types ──
//
// Signals are asynchronous events pushed by the backend over the signal
// stream (and occasionally sent back to it). `Signal` is the bare kind
// with its fixed wire number; `SignalEvent` is the kind plus its typed
// payload.

use std::collections::HashSet;

use serde::Serialize;
use strum::{Display, FromRepr};

use super::device::Device;
use super::identifier::{Guid, SinglePathId, Uid};
use super::menu::TreeAction;
use super::node::SpidNodePair;
use super::ops::ErrorHandlingStrategy;
use super::tree::{DisplayTreeUiState, StatsUpdate, TreeLoadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum Signal {
    Welcome = 1,
    ShutdownApp = 2,
    DeregisterDisplayTree = 3,

    ToggleUiEnablement = 10,
    ErrorOccurred = 11,
    OpExecutionPlayStateChanged = 12,
    PauseOpExecution = 13,
    ResumeOpExecution = 14,
    CommandComplete = 15,

    ExecuteAction = 20,
    DisplayTreeChanged = 21,
    SetSelectedRows = 22,
    TreeLoadStateUpdated = 23,
    CancelAllEditRoot = 24,
    CancelOtherEditRoot = 25,

    NodeUpserted = 30,
    NodeRemoved = 31,
    SubtreeNodesChanged = 32,
    DeviceUpserted = 33,
    DownloadFromGdriveDone = 34,
    LoadSubtreeDone = 35,

    DiffTreesDone = 40,
    DiffTreesFailed = 41,
    DiffTreesCancelled = 42,
    ExitDiffMode = 43,
    GenerateMergeTreeDone = 44,
    GenerateMergeTreeFailed = 45,

    BatchFailed = 50,
    HandleBatchFailed = 51,
}

/// A signal together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SignalEvent {
    // ── Lifecycle ────────────────────────────────────────────────────
    Welcome,
    ShutdownApp,
    DeregisterDisplayTree,

    // ── App state ────────────────────────────────────────────────────
    ToggleUiEnablement {
        enable: bool,
    },
    ErrorOccurred {
        msg: String,
        secondary_msg: String,
    },
    OpExecutionPlayStateChanged {
        is_enabled: bool,
    },
    PauseOpExecution,
    ResumeOpExecution,
    CommandComplete,

    // ── Display trees ────────────────────────────────────────────────
    ExecuteAction {
        action_list: Vec<TreeAction>,
    },
    DisplayTreeChanged {
        tree: Box<DisplayTreeUiState>,
    },
    SetSelectedRows {
        guid_set: HashSet<Guid>,
    },
    TreeLoadStateUpdated {
        load_state: TreeLoadState,
        stats: StatsUpdate,
    },
    CancelAllEditRoot,
    CancelOtherEditRoot,

    // ── Nodes & devices ──────────────────────────────────────────────
    NodeUpserted {
        sn: Box<SpidNodePair>,
    },
    NodeRemoved {
        sn: Box<SpidNodePair>,
    },
    SubtreeNodesChanged {
        subtree_root: SinglePathId,
        upserted: Vec<SpidNodePair>,
        removed: Vec<SpidNodePair>,
    },
    DeviceUpserted {
        device: Device,
    },
    DownloadFromGdriveDone {
        filename: String,
    },
    LoadSubtreeDone,

    // ── Diff & merge ─────────────────────────────────────────────────
    DiffTreesDone {
        left: Box<DisplayTreeUiState>,
        right: Box<DisplayTreeUiState>,
    },
    DiffTreesFailed,
    DiffTreesCancelled {
        left: Box<DisplayTreeUiState>,
        right: Box<DisplayTreeUiState>,
    },
    ExitDiffMode,
    GenerateMergeTreeDone {
        tree: Box<DisplayTreeUiState>,
    },
    GenerateMergeTreeFailed,

    // ── Op batches ───────────────────────────────────────────────────
    BatchFailed {
        batch_uid: Uid,
        msg: String,
        secondary_msg: String,
    },
    HandleBatchFailed {
        batch_uid: Uid,
        strategy: ErrorHandlingStrategy,
    },
}

impl SignalEvent {
    pub fn signal(&self) -> Signal {
        match self {
            Self::Welcome => Signal::Welcome,
            Self::ShutdownApp => Signal::ShutdownApp,
            Self::DeregisterDisplayTree => Signal::DeregisterDisplayTree,
            Self::ToggleUiEnablement { .. } => Signal::ToggleUiEnablement,
            Self::ErrorOccurred { .. } => Signal::ErrorOccurred,
            Self::OpExecutionPlayStateChanged { .. } => Signal::OpExecutionPlayStateChanged,
            Self::PauseOpExecution => Signal::PauseOpExecution,
            Self::ResumeOpExecution => Signal::ResumeOpExecution,
            Self::CommandComplete => Signal::CommandComplete,
            Self::ExecuteAction { .. } => Signal::ExecuteAction,
            Self::DisplayTreeChanged { .. } => Signal::DisplayTreeChanged,
            Self::SetSelectedRows { .. } => Signal::SetSelectedRows,
            Self::TreeLoadStateUpdated { .. } => Signal::TreeLoadStateUpdated,
            Self::CancelAllEditRoot => Signal::CancelAllEditRoot,
            Self::CancelOtherEditRoot => Signal::CancelOtherEditRoot,
            Self::NodeUpserted { .. } => Signal::NodeUpserted,
            Self::NodeRemoved { .. } => Signal::NodeRemoved,
            Self::SubtreeNodesChanged { .. } => Signal::SubtreeNodesChanged,
            Self::DeviceUpserted { .. } => Signal::DeviceUpserted,
            Self::DownloadFromGdriveDone { .. } => Signal::DownloadFromGdriveDone,
            Self::LoadSubtreeDone => Signal::LoadSubtreeDone,
            Self::DiffTreesDone { .. } => Signal::DiffTreesDone,
            Self::DiffTreesFailed => Signal::DiffTreesFailed,
            Self::DiffTreesCancelled { .. } => Signal::DiffTreesCancelled,
            Self::ExitDiffMode => Signal::ExitDiffMode,
            Self::GenerateMergeTreeDone { .. } => Signal::GenerateMergeTreeDone,
            Self::GenerateMergeTreeFailed => Signal::GenerateMergeTreeFailed,
            Self::BatchFailed { .. } => Signal::BatchFailed,
            Self::HandleBatchFailed { .. } => Signal::HandleBatchFailed,
        }
    }

    pub fn error(msg: impl Into<String>, secondary_msg: impl Into<String>) -> Self {
        Self::ErrorOccurred {
            msg: msg.into(),
            secondary_msg: secondary_msg.into(),
        }
    }
}

/// One delivered signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalEnvelope {
    pub sender: String,
    pub event: SignalEvent,
}

impl SignalEnvelope {
    pub fn new(sender: impl Into<String>, event: SignalEvent) -> Self {
        Self {
            sender: sender.into(),
            event,
        }
    }

    pub fn signal(&self) -> Signal {
        self.event.signal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_numbers_and_names() {
        assert_eq!(Signal::from_repr(33), Some(Signal::DeviceUpserted));
        assert_eq!(Signal::from_repr(4), None);
        assert_eq!(Signal::TreeLoadStateUpdated.to_string(), "TREE_LOAD_STATE_UPDATED");
        assert_eq!(Signal::HandleBatchFailed as u32, 51);
    }

    #[test]
    fn event_reports_its_kind() {
        let env = SignalEnvelope::new("backend", SignalEvent::error("boom", ""));
        assert_eq!(env.signal(), Signal::ErrorOccurred);
        assert_eq!(SignalEvent::ExitDiffMode.signal(), Signal::ExitDiffMode);
    }
}
