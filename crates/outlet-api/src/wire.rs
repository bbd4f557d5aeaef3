//! Wire messages exchanged with the Outlet backend.
//!
//! Every message follows proto3 conventions: all fields carry a default,
//! so a missing number decodes as `0` and a missing string as `""`. The
//! wire has no null. Optional domain values are encoded with those
//! sentinels by `outlet-core`'s codec, which also owns validation.
//!
//! One-of groups are modelled as externally tagged enums wrapped in
//! `Option`, e.g. `"node_type": { "local_file_meta": { ... } }`.

use serde::{Deserialize, Serialize};

// ── Identifiers ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeIdentifierMsg {
    pub node_uid: u32,
    pub device_uid: u32,
    pub identifier_type: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype_meta: Option<IdentifierSubtypeMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSubtypeMeta {
    SpidMeta(SinglePathIdMeta),
    MultiPathIdMeta(MultiPathIdMeta),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinglePathIdMeta {
    pub single_path: String,
    pub path_uid: u32,
    /// Empty string when the identifier has no parent.
    pub parent_guid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiPathIdMeta {
    pub path_list: Vec<String>,
}

// ── Nodes ───────────────────────────────────────────────────────────

/// Aggregate directory statistics. `has_data == false` means the six
/// counters were never computed and must be ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirMetaMsg {
    pub has_data: bool,
    pub file_count: u32,
    pub dir_count: u32,
    pub trashed_file_count: u32,
    pub trashed_dir_count: u32,
    pub size_bytes: u64,
    pub trashed_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TNodeMsg {
    pub node_identifier: NodeIdentifierMsg,
    pub trashed: u32,
    pub is_shared: bool,
    pub icon_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeTypeMsg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeTypeMsg {
    ContainerMeta(ContainerNodeMeta),
    CategoryMeta(ContainerNodeMeta),
    RootTypeMeta(ContainerNodeMeta),
    NonexistentDirMeta(NonexistentDirMeta),
    LocalDirMeta(LocalDirMeta),
    LocalFileMeta(LocalFileMeta),
    GdriveFolderMeta(GDriveFolderMeta),
    GdriveFileMeta(GDriveFileMeta),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerNodeMeta {
    pub dir_meta: DirMetaMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonexistentDirMeta {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalDirMeta {
    pub dir_meta: DirMetaMsg,
    pub is_live: bool,
    pub parent_uid: u32,
    pub sync_ts: u64,
    pub create_ts: u64,
    pub modify_ts: u64,
    pub change_ts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalFileMeta {
    pub size_bytes: u64,
    pub sync_ts: u64,
    pub create_ts: u64,
    pub modify_ts: u64,
    pub change_ts: u64,
    pub is_live: bool,
    pub md5: String,
    pub sha256: String,
    pub parent_uid: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GDriveFolderMeta {
    pub dir_meta: DirMetaMsg,
    pub all_children_fetched: bool,
    pub goog_id: String,
    pub name: String,
    pub owner_uid: u32,
    pub shared_by_user_uid: u32,
    pub drive_id: String,
    pub parent_uid_list: Vec<u32>,
    pub sync_ts: u64,
    pub modify_ts: u64,
    pub create_ts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GDriveFileMeta {
    pub md5: String,
    pub version: u32,
    pub size_bytes: u64,
    pub mime_type_uid: u32,
    pub goog_id: String,
    pub name: String,
    pub owner_uid: u32,
    pub shared_by_user_uid: u32,
    pub drive_id: String,
    pub parent_uid_list: Vec<u32>,
    pub sync_ts: u64,
    pub modify_ts: u64,
    pub create_ts: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpidNodePairMsg {
    pub spid: NodeIdentifierMsg,
    pub node: TNodeMsg,
}

// ── Devices, trees, filters ─────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceMsg {
    pub device_uid: u32,
    pub long_device_id: String,
    pub tree_type: u32,
    pub friendly_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayTreeUiStateMsg {
    pub tree_id: String,
    pub root_sn: SpidNodePairMsg,
    pub root_exists: bool,
    pub offending_path: String,
    pub needs_manual_load: bool,
    pub tree_display_mode: u32,
    pub has_checkboxes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteriaMsg {
    pub search_query: String,
    pub is_trashed: u32,
    pub is_shared: u32,
    pub is_ignore_case: bool,
    pub show_subtrees_of_matches: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeContextMenuItemMsg {
    pub item_type: u32,
    pub title: String,
    pub action_id: u32,
    pub target_uid: u32,
    pub target_guid_list: Vec<String>,
    pub submenu_item_list: Vec<TreeContextMenuItemMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeActionMsg {
    pub tree_id: String,
    pub action_id: u32,
    pub target_guid_list: Vec<String>,
    pub target_node_list: Vec<TNodeMsg>,
    pub target_uid: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOpMsg {
    pub op_uid: u32,
    pub batch_uid: u32,
    pub op_type: u32,
    pub src_node: TNodeMsg,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_node: Option<TNodeMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconMsg {
    pub icon_id: u32,
    pub content: Vec<u8>,
}

// ── Signals ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalMsg {
    pub sig_int: u32,
    pub sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_data: Option<SignalDataMsg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDataMsg {
    TreeActionRequest(TreeActionRequestMsg),
    DisplayTreeUiState(DisplayTreeUiStateMsg),
    DualDisplayTree(DualDisplayTreeMsg),
    PlayState(PlayStateMsg),
    UiEnablement(UiEnablementMsg),
    GuidSet(GuidSetMsg),
    ErrorOccurred(ErrorOccurredMsg),
    Sn(SpidNodePairMsg),
    Subtree(SubtreeChangeMsg),
    TreeLoadUpdate(TreeLoadUpdateMsg),
    DownloadMsg(DownloadMsg),
    Device(DeviceMsg),
    BatchFailed(BatchFailedMsg),
    HandleBatchFailed(HandleBatchFailedMsg),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeActionRequestMsg {
    pub action_list: Vec<TreeActionMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualDisplayTreeMsg {
    pub left_tree: DisplayTreeUiStateMsg,
    pub right_tree: DisplayTreeUiStateMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayStateMsg {
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiEnablementMsg {
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidSetMsg {
    pub guid_set: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorOccurredMsg {
    pub msg: String,
    pub secondary_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtreeChangeMsg {
    pub subtree_root_spid: NodeIdentifierMsg,
    pub upserted_sn_list: Vec<SpidNodePairMsg>,
    pub removed_sn_list: Vec<SpidNodePairMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLoadUpdateMsg {
    pub load_state_int: u32,
    pub stats_update: StatsUpdateMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsUpdateMsg {
    pub status_msg: String,
    pub dir_meta_by_uid_list: Vec<DirMetaUidEntry>,
    pub dir_meta_by_guid_list: Vec<DirMetaGuidEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirMetaUidEntry {
    pub uid: u32,
    pub dir_meta: DirMetaMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirMetaGuidEntry {
    pub guid: String,
    pub dir_meta: DirMetaMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadMsg {
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchFailedMsg {
    pub batch_uid: u32,
    pub msg: String,
    pub secondary_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleBatchFailedMsg {
    pub batch_uid: u32,
    pub error_handling_strategy: u32,
}

// ── RPC names ───────────────────────────────────────────────────────

/// Method names as they appear in the unary call path.
pub mod rpc {
    pub const SEND_SIGNAL: &str = "send_signal";
    pub const GET_CONFIG: &str = "get_config";
    pub const PUT_CONFIG: &str = "put_config";
    pub const GET_ICON: &str = "get_icon";
    pub const GET_DEVICE_LIST: &str = "get_device_list";
    pub const GET_CHILD_LIST_FOR_SPID: &str = "get_child_list_for_spid";
    pub const GET_ANCESTOR_LIST_FOR_SPID: &str = "get_ancestor_list_for_spid";
    pub const GET_ROWS_OF_INTEREST: &str = "get_rows_of_interest";
    pub const SET_SELECTED_ROW_SET: &str = "set_selected_row_set";
    pub const REMOVE_EXPANDED_ROW: &str = "remove_expanded_row";
    pub const GET_FILTER: &str = "get_filter";
    pub const UPDATE_FILTER: &str = "update_filter";
    pub const GET_CONTEXT_MENU: &str = "get_context_menu";
    pub const EXECUTE_TREE_ACTION_LIST: &str = "execute_tree_action_list";
    pub const REQUEST_DISPLAY_TREE: &str = "request_display_tree";
    pub const START_SUBTREE_LOAD: &str = "start_subtree_load";
    pub const REFRESH_SUBTREE: &str = "refresh_subtree";
    pub const GET_NEXT_UID: &str = "get_next_uid";
    pub const GET_NODE_FOR_UID: &str = "get_node_for_uid";
    pub const GET_UID_FOR_LOCAL_PATH: &str = "get_uid_for_local_path";
    pub const GET_SN_FOR: &str = "get_sn_for";
    pub const START_DIFF_TREES: &str = "start_diff_trees";
    pub const GENERATE_MERGE_TREE: &str = "generate_merge_tree";
    pub const DROP_DRAGGED_NODES: &str = "drop_dragged_nodes";
    pub const DELETE_SUBTREE: &str = "delete_subtree";
    pub const GET_LAST_PENDING_OP_FOR_NODE: &str = "get_last_pending_op_for_node";
    pub const DOWNLOAD_FILE_FROM_GDRIVE: &str = "download_file_from_gdrive";
    pub const GET_OP_EXEC_PLAY_STATE: &str = "get_op_exec_play_state";
    pub const SUBSCRIBE_TO_SIGNALS: &str = "subscribe_to_signals";
}

// ── Requests & responses ────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Empty {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigEntry {
    pub key: String,
    pub val: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetConfigRequest {
    pub config_key_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigListMsg {
    pub config_list: Vec<ConfigEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetIconRequest {
    pub icon_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetIconResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetDeviceListResponse {
    pub device_list: Vec<DeviceMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetChildListRequest {
    pub tree_id: String,
    pub parent_spid: NodeIdentifierMsg,
    pub is_expanding_parent: bool,
    pub max_results: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildListErrorMsg {
    pub fe_msg: String,
    pub fe_secondary_msg: String,
    pub be_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetChildListResponse {
    pub child_list: Vec<SpidNodePairMsg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ChildListErrorMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAncestorListRequest {
    pub stop_at_path: String,
    pub spid: NodeIdentifierMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAncestorListResponse {
    pub ancestor_list: Vec<SpidNodePairMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeIdRequest {
    pub tree_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetRowsOfInterestResponse {
    pub expanded_row_guid_set: Vec<String>,
    pub selected_row_guid_set: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetSelectedRowSetRequest {
    pub selected_row_guid_set: Vec<String>,
    pub tree_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveExpandedRowRequest {
    pub row_guid: String,
    pub tree_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetFilterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_criteria: Option<FilterCriteriaMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateFilterRequest {
    pub tree_id: String,
    pub filter_criteria: FilterCriteriaMsg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetContextMenuRequest {
    pub tree_id: String,
    pub target_guid_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetContextMenuResponse {
    pub menu_item_list: Vec<TreeContextMenuItemMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteTreeActionListRequest {
    pub action_list: Vec<TreeActionMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDisplayTreeRequest {
    pub is_startup: bool,
    pub tree_id: String,
    pub return_async: bool,
    pub user_path: String,
    pub device_uid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spid: Option<NodeIdentifierMsg>,
    pub tree_display_mode: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDisplayTreeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_tree_ui_state: Option<DisplayTreeUiStateMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSubtreeRequest {
    pub node_identifier: NodeIdentifierMsg,
    pub tree_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UidResponse {
    pub uid: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetNodeForUidRequest {
    pub uid: u32,
    pub device_uid: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleNodeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<TNodeMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetUidForLocalPathRequest {
    pub full_path: String,
    pub uid_suggestion: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSnForRequest {
    pub node_uid: u32,
    pub device_uid: u32,
    pub full_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSnForResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sn: Option<SpidNodePairMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffTreesMsg {
    pub tree_id_left: String,
    pub tree_id_right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateMergeTreeRequest {
    pub tree_id_left: String,
    pub tree_id_right: String,
    pub change_list_left: Vec<String>,
    pub change_list_right: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragDropRequest {
    pub src_tree_id: String,
    pub dst_tree_id: String,
    pub src_guid_list: Vec<String>,
    pub dst_guid: String,
    pub is_into: bool,
    pub drag_operation: u32,
    pub dir_conflict_policy: u32,
    pub file_conflict_policy: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragDropResponse {
    pub is_accepted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteSubtreeRequest {
    pub device_uid: u32,
    pub node_uid_list: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRefRequest {
    pub device_uid: u32,
    pub node_uid: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetLastPendingOpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_op: Option<UserOpMsg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadFromGDriveRequest {
    pub device_uid: u32,
    pub node_uid: u32,
    pub requestor_id: String,
}

/// Error body returned with a non-success HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcStatus {
    pub code: u32,
    pub message: String,
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_take_proto_defaults() {
        let msg: TNodeMsg = serde_json::from_value(json!({ "trashed": 1 })).unwrap();
        assert_eq!(msg.trashed, 1);
        assert_eq!(msg.node_identifier, NodeIdentifierMsg::default());
        assert!(msg.node_type.is_none());
        assert_eq!(msg.icon_id, 0);
    }

    #[test]
    fn one_of_is_externally_tagged() {
        let msg = TNodeMsg {
            node_type: Some(NodeTypeMsg::NonexistentDirMeta(NonexistentDirMeta {
                name: "gone".into(),
            })),
            ..TNodeMsg::default()
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["node_type"], json!({ "nonexistent_dir_meta": { "name": "gone" } }));
    }

    #[test]
    fn signal_without_data_omits_the_field() {
        let msg = SignalMsg {
            sig_int: 1,
            sender: "backend".into(),
            signal_data: None,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({ "sig_int": 1, "sender": "backend" }));

        let back: SignalMsg = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }
}
