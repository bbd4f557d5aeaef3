// ── Display tree types ──

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use strum::{Display, FromRepr};

use super::identifier::{Guid, SinglePathId, Uid};
use super::node::{DirectoryStats, SpidNodePair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum TreeDisplayMode {
    OneTreeAllItems = 1,
    ChangesOneTreePerCategory = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum TreeLoadState {
    Unknown = 0,
    NotLoaded = 1,
    LoadStarted = 2,
    NoLongerExists = 3,
    CompletelyLoaded = 10,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum Ternary {
    False = 0,
    True = 1,
    #[default]
    NotSpecified = 2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub search_query: String,
    pub is_trashed: Ternary,
    pub is_shared: Ternary,
    pub is_ignore_case: bool,
    pub show_subtrees_of_matches: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            is_trashed: Ternary::NotSpecified,
            is_shared: Ternary::NotSpecified,
            is_ignore_case: true,
            show_subtrees_of_matches: false,
        }
    }
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty()
            || self.is_trashed != Ternary::NotSpecified
            || self.is_shared != Ternary::NotSpecified
    }
}

/// Backend-held view state for one display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTreeUiState {
    pub tree_id: String,
    pub root_sn: SpidNodePair,
    pub root_exists: bool,
    pub offending_path: Option<String>,
    pub needs_manual_load: bool,
    pub tree_display_mode: TreeDisplayMode,
    pub has_checkboxes: bool,
}

/// Parameters for `request_display_tree`. Build one through the
/// `Session::create_display_tree_*` helpers for the common cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTreeRequest {
    pub tree_id: String,
    pub return_async: bool,
    pub is_startup: bool,
    pub user_path: Option<String>,
    pub device_uid: Option<Uid>,
    pub spid: Option<SinglePathId>,
    pub tree_display_mode: TreeDisplayMode,
}

impl DisplayTreeRequest {
    pub fn new(tree_id: impl Into<String>) -> Self {
        Self {
            tree_id: tree_id.into(),
            return_async: false,
            is_startup: false,
            user_path: None,
            device_uid: None,
            spid: None,
            tree_display_mode: TreeDisplayMode::OneTreeAllItems,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowsOfInterest {
    pub expanded: HashSet<Guid>,
    pub selected: HashSet<Guid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResultTreeIds {
    pub left: String,
    pub right: String,
}

/// Progress report attached to `TREE_LOAD_STATE_UPDATED`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsUpdate {
    pub status_msg: String,
    pub dir_stats_by_uid: HashMap<Uid, Option<DirectoryStats>>,
    pub dir_stats_by_guid: HashMap<Guid, Option<DirectoryStats>>,
}
