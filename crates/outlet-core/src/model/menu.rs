// ── Context menu and tree action types ──

use serde::Serialize;
use strum::{Display, FromRepr};

use super::identifier::{Guid, Uid};
use super::node::TNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum MenuItemType {
    Normal = 1,
    Separator = 2,
    Disabled = 3,
    ItalicDisabled = 4,
}

/// Actions the backend and UI both understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ActionId {
    NoAction = 1,
    Refresh = 2,
    ExpandAll = 3,
    GoIntoDir = 4,
    ShowInFileExplorer = 5,
    OpenWithDefaultApp = 6,
    DeleteSingleFile = 7,
    DeleteSubtree = 8,
    DeleteSubtreeForSingleDevice = 9,
    DownloadFromGdrive = 10,
    SetRowsChecked = 11,
    SetRowsUnchecked = 12,
    ExpandRows = 13,
    CollapseRows = 14,
    RetryOperation = 15,
    RetryAllFailedOperations = 16,

    SetDefaultDragModeToMove = 20,
    SetDefaultDragModeToCopy = 21,
    SetDefaultDragModeToLink = 22,
    SetDefaultDragModeToDelete = 23,

    SetDefaultDirConflictPolicyToPrompt = 25,
    SetDefaultDirConflictPolicyToSkip = 26,
    SetDefaultDirConflictPolicyToReplace = 27,
    SetDefaultDirConflictPolicyToRename = 28,
    SetDefaultDirConflictPolicyToMerge = 29,

    SetDefaultFileConflictPolicyToPrompt = 30,
    SetDefaultFileConflictPolicyToSkip = 31,
    SetDefaultFileConflictPolicyToReplaceAlways = 32,
    SetDefaultFileConflictPolicyToReplaceIfOlderAndDifferent = 33,
    SetDefaultFileConflictPolicyToRenameAlways = 34,
    SetDefaultFileConflictPolicyToRenameIfOlderAndDifferent = 35,
    SetDefaultFileConflictPolicyToRenameIfDifferent = 36,

    CallExiftool = 50,
    DiffTreesByContent = 51,
    MergeChanges = 52,
    CancelDiff = 53,

    Activate = 100,
}

/// A menu/tree action: one of the built-ins, or an id the backend made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionType {
    Builtin(ActionId),
    Custom(u32),
}

impl ActionType {
    pub fn from_wire(action_id: u32) -> Self {
        ActionId::from_repr(action_id).map_or(Self::Custom(action_id), Self::Builtin)
    }

    pub fn to_wire(self) -> u32 {
        match self {
            Self::Builtin(id) => id as u32,
            Self::Custom(raw) => raw,
        }
    }
}

/// One context-menu entry, possibly with a submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemMeta {
    pub item_type: MenuItemType,
    pub title: String,
    pub action_type: ActionType,
    pub target_uid: Uid,
    pub target_guid_list: Vec<Guid>,
    pub submenu_item_list: Vec<MenuItemMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeAction {
    pub tree_id: String,
    pub action_type: ActionType,
    pub target_guid_list: Vec<Guid>,
    pub target_node_list: Vec<TNode>,
    pub target_uid: Uid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_ids_are_custom() {
        assert_eq!(ActionType::from_wire(8), ActionType::Builtin(ActionId::DeleteSubtree));
        assert_eq!(ActionType::from_wire(24), ActionType::Custom(24));
        assert_eq!(ActionType::from_wire(1001), ActionType::Custom(1001));
        assert_eq!(ActionType::Builtin(ActionId::Activate).to_wire(), 100);
        assert_eq!(ActionType::Custom(1001).to_wire(), 1001);
    }
}
