use std::collections::HashMap;

use outlet_api::wire::{
    DeviceMsg, DirMetaGuidEntry, DirMetaUidEntry, DisplayTreeUiStateMsg, FilterCriteriaMsg,
    GetRowsOfInterestResponse, RequestDisplayTreeRequest, StatsUpdateMsg, TreeActionMsg,
    TreeContextMenuItemMsg, UserOpMsg,
};

use super::node::{dir_stats_from_wire, dir_stats_to_wire};
use super::{Codec, enum_from_wire, non_empty};
use crate::error::CoreError;
use crate::model::{
    ActionType, Device, DisplayTreeRequest, DisplayTreeUiState, FilterCriteria, MenuItemMeta,
    MenuItemType, NULL_UID, RowsOfInterest, StatsUpdate, Ternary, TreeAction, TreeDisplayMode,
    TreeType, UserOp, UserOpType,
};

impl Codec {
    // ── Devices ──────────────────────────────────────────────────────

    pub fn device_to_wire(&self, device: &Device) -> DeviceMsg {
        DeviceMsg {
            device_uid: device.device_uid,
            long_device_id: device.long_device_id.clone(),
            tree_type: device.tree_type as u32,
            friendly_name: device.friendly_name.clone(),
        }
    }

    pub fn device_from_wire(&self, msg: DeviceMsg) -> Result<Device, CoreError> {
        Ok(Device {
            device_uid: msg.device_uid,
            long_device_id: msg.long_device_id,
            tree_type: enum_from_wire(msg.tree_type, "tree_type", TreeType::from_repr)?,
            friendly_name: msg.friendly_name,
        })
    }

    // ── Filters ──────────────────────────────────────────────────────

    pub fn filter_criteria_to_wire(&self, filter: &FilterCriteria) -> FilterCriteriaMsg {
        FilterCriteriaMsg {
            search_query: filter.search_query.clone(),
            is_trashed: filter.is_trashed as u32,
            is_shared: filter.is_shared as u32,
            is_ignore_case: filter.is_ignore_case,
            show_subtrees_of_matches: filter.show_subtrees_of_matches,
        }
    }

    pub fn filter_criteria_from_wire(&self, msg: FilterCriteriaMsg) -> Result<FilterCriteria, CoreError> {
        Ok(FilterCriteria {
            search_query: msg.search_query,
            is_trashed: enum_from_wire(msg.is_trashed, "is_trashed", Ternary::from_repr)?,
            is_shared: enum_from_wire(msg.is_shared, "is_shared", Ternary::from_repr)?,
            is_ignore_case: msg.is_ignore_case,
            show_subtrees_of_matches: msg.show_subtrees_of_matches,
        })
    }

    // ── Display trees ────────────────────────────────────────────────

    pub fn display_tree_ui_state_to_wire(
        &self,
        state: &DisplayTreeUiState,
    ) -> Result<DisplayTreeUiStateMsg, CoreError> {
        Ok(DisplayTreeUiStateMsg {
            tree_id: state.tree_id.clone(),
            root_sn: self.sn_to_wire(&state.root_sn)?,
            root_exists: state.root_exists,
            offending_path: state.offending_path.clone().unwrap_or_default(),
            needs_manual_load: state.needs_manual_load,
            tree_display_mode: state.tree_display_mode as u32,
            has_checkboxes: state.has_checkboxes,
        })
    }

    pub fn display_tree_ui_state_from_wire(
        &self,
        msg: DisplayTreeUiStateMsg,
    ) -> Result<DisplayTreeUiState, CoreError> {
        Ok(DisplayTreeUiState {
            root_sn: self.sn_from_wire(msg.root_sn)?,
            tree_display_mode: enum_from_wire(
                msg.tree_display_mode,
                "tree_display_mode",
                TreeDisplayMode::from_repr,
            )?,
            tree_id: msg.tree_id,
            root_exists: msg.root_exists,
            offending_path: non_empty(msg.offending_path),
            needs_manual_load: msg.needs_manual_load,
            has_checkboxes: msg.has_checkboxes,
        })
    }

    pub fn display_tree_request_to_wire(
        &self,
        request: &DisplayTreeRequest,
    ) -> Result<RequestDisplayTreeRequest, CoreError> {
        Ok(RequestDisplayTreeRequest {
            is_startup: request.is_startup,
            tree_id: request.tree_id.clone(),
            return_async: request.return_async,
            user_path: request.user_path.clone().unwrap_or_default(),
            device_uid: request.device_uid.unwrap_or(NULL_UID),
            spid: request.spid.as_ref().map(|s| self.spid_to_wire(s)).transpose()?,
            tree_display_mode: request.tree_display_mode as u32,
        })
    }

    pub fn rows_of_interest_from_wire(&self, msg: GetRowsOfInterestResponse) -> RowsOfInterest {
        RowsOfInterest {
            expanded: msg.expanded_row_guid_set.into_iter().collect(),
            selected: msg.selected_row_guid_set.into_iter().collect(),
        }
    }

    // ── Context menus & actions ──────────────────────────────────────

    pub fn menu_item_to_wire(&self, item: &MenuItemMeta) -> TreeContextMenuItemMsg {
        TreeContextMenuItemMsg {
            item_type: item.item_type as u32,
            title: item.title.clone(),
            action_id: item.action_type.to_wire(),
            target_uid: item.target_uid,
            target_guid_list: item.target_guid_list.clone(),
            submenu_item_list: item
                .submenu_item_list
                .iter()
                .map(|sub| self.menu_item_to_wire(sub))
                .collect(),
        }
    }

    pub fn menu_item_from_wire(&self, msg: TreeContextMenuItemMsg) -> Result<MenuItemMeta, CoreError> {
        Ok(MenuItemMeta {
            item_type: enum_from_wire(msg.item_type, "menu item_type", MenuItemType::from_repr)?,
            title: msg.title,
            action_type: ActionType::from_wire(msg.action_id),
            target_uid: msg.target_uid,
            target_guid_list: msg.target_guid_list,
            submenu_item_list: msg
                .submenu_item_list
                .into_iter()
                .map(|sub| self.menu_item_from_wire(sub))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn tree_action_to_wire(&self, action: &TreeAction) -> Result<TreeActionMsg, CoreError> {
        Ok(TreeActionMsg {
            tree_id: action.tree_id.clone(),
            action_id: action.action_type.to_wire(),
            target_guid_list: action.target_guid_list.clone(),
            target_node_list: self.node_list_to_wire(&action.target_node_list)?,
            target_uid: action.target_uid,
        })
    }

    pub fn tree_action_from_wire(&self, msg: TreeActionMsg) -> Result<TreeAction, CoreError> {
        Ok(TreeAction {
            tree_id: msg.tree_id,
            action_type: ActionType::from_wire(msg.action_id),
            target_guid_list: msg.target_guid_list,
            target_node_list: self.node_list_from_wire(msg.target_node_list)?,
            target_uid: msg.target_uid,
        })
    }

    // ── Ops ──────────────────────────────────────────────────────────

    pub fn user_op_to_wire(&self, op: &UserOp) -> Result<UserOpMsg, CoreError> {
        Ok(UserOpMsg {
            op_uid: op.op_uid,
            batch_uid: op.batch_uid,
            op_type: op.op_type as u32,
            src_node: self.node_to_wire(&op.src_node)?,
            dst_node: op.dst_node.as_ref().map(|n| self.node_to_wire(n)).transpose()?,
        })
    }

    pub fn user_op_from_wire(&self, msg: UserOpMsg) -> Result<UserOp, CoreError> {
        Ok(UserOp {
            op_uid: msg.op_uid,
            batch_uid: msg.batch_uid,
            op_type: enum_from_wire(msg.op_type, "op_type", UserOpType::from_repr)?,
            src_node: self.node_from_wire(msg.src_node)?,
            dst_node: msg.dst_node.map(|n| self.node_from_wire(n)).transpose()?,
        })
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn stats_update_to_wire(&self, stats: &StatsUpdate) -> StatsUpdateMsg {
        let mut by_uid: Vec<DirMetaUidEntry> = stats
            .dir_stats_by_uid
            .iter()
            .map(|(uid, s)| DirMetaUidEntry {
                uid: *uid,
                dir_meta: dir_stats_to_wire(s.as_ref()),
            })
            .collect();
        by_uid.sort_by_key(|e| e.uid);

        let mut by_guid: Vec<DirMetaGuidEntry> = stats
            .dir_stats_by_guid
            .iter()
            .map(|(guid, s)| DirMetaGuidEntry {
                guid: guid.clone(),
                dir_meta: dir_stats_to_wire(s.as_ref()),
            })
            .collect();
        by_guid.sort_by(|a, b| a.guid.cmp(&b.guid));

        StatsUpdateMsg {
            status_msg: stats.status_msg.clone(),
            dir_meta_by_uid_list: by_uid,
            dir_meta_by_guid_list: by_guid,
        }
    }

    pub fn stats_update_from_wire(&self, msg: StatsUpdateMsg) -> StatsUpdate {
        StatsUpdate {
            status_msg: msg.status_msg,
            dir_stats_by_uid: msg
                .dir_meta_by_uid_list
                .iter()
                .map(|e| (e.uid, dir_stats_from_wire(&e.dir_meta)))
                .collect::<HashMap<_, _>>(),
            dir_stats_by_guid: msg
                .dir_meta_by_guid_list
                .into_iter()
                .map(|e| {
                    let stats = dir_stats_from_wire(&e.dir_meta);
                    (e.guid, stats)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert::test_support::{GDRIVE_DEVICE, LOCAL_DEVICE, codec};
    use crate::model::{
        ActionId, DirectoryStats, LocalDirMeta, NodeIdentifier, NodePayload, SinglePathId,
        SpidKind, SpidNodePair, TNode, TrashStatus,
    };

    fn local_sn(uid: u32) -> SpidNodePair {
        let spid = SinglePathId {
            kind: SpidKind::LocalDisk,
            node_uid: uid,
            device_uid: LOCAL_DEVICE,
            path: format!("/data/{uid}"),
            path_uid: uid,
            parent_guid: Some(format!("{LOCAL_DEVICE}:2")),
        };
        let node = TNode::new(
            NodeIdentifier::Single(spid.clone()),
            TrashStatus::NotTrashed,
            false,
            NodePayload::LocalDir(LocalDirMeta {
                dir_stats: None,
                is_live: true,
                parent_uid: 2,
                sync_ts: None,
                create_ts: None,
                modify_ts: None,
                change_ts: None,
            }),
        )
        .unwrap();
        SpidNodePair { spid, node }
    }

    fn ui_state(offending_path: Option<&str>) -> DisplayTreeUiState {
        DisplayTreeUiState {
            tree_id: "left_tree".into(),
            root_sn: local_sn(120),
            root_exists: offending_path.is_none(),
            offending_path: offending_path.map(str::to_owned),
            needs_manual_load: true,
            tree_display_mode: TreeDisplayMode::ChangesOneTreePerCategory,
            has_checkboxes: false,
        }
    }

    #[test]
    fn device_round_trip_and_bad_tree_type() {
        let codec = codec();
        let device = Device {
            device_uid: GDRIVE_DEVICE,
            long_device_id: "gdrive-1".into(),
            tree_type: TreeType::GDrive,
            friendly_name: "My Drive".into(),
        };
        let wire = codec.device_to_wire(&device);
        assert_eq!(wire.tree_type, 3);
        assert_eq!(codec.device_from_wire(wire.clone()).unwrap(), device);

        let bad = DeviceMsg { tree_type: 9, ..wire };
        assert!(matches!(
            codec.device_from_wire(bad),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn filter_defaults_survive_the_wire() {
        let codec = codec();
        let filter = FilterCriteria::default();
        let wire = codec.filter_criteria_to_wire(&filter);
        assert_eq!(wire.is_trashed, 2);
        assert_eq!(codec.filter_criteria_from_wire(wire).unwrap(), filter);

        let active = FilterCriteria {
            search_query: "*.jpg".into(),
            is_trashed: Ternary::False,
            ..FilterCriteria::default()
        };
        assert!(active.is_active());
        let wire = codec.filter_criteria_to_wire(&active);
        assert_eq!(codec.filter_criteria_from_wire(wire).unwrap(), active);
    }

    #[test]
    fn ui_state_offending_path_uses_empty_sentinel() {
        let codec = codec();
        for state in [ui_state(None), ui_state(Some("/data/missing"))] {
            let wire = codec.display_tree_ui_state_to_wire(&state).unwrap();
            assert_eq!(
                wire.offending_path.is_empty(),
                state.offending_path.is_none()
            );
            assert_eq!(codec.display_tree_ui_state_from_wire(wire).unwrap(), state);
        }
    }

    #[test]
    fn display_tree_request_sentinels() {
        let codec = codec();
        let mut request = DisplayTreeRequest::new("right_tree");
        request.is_startup = true;
        let wire = codec.display_tree_request_to_wire(&request).unwrap();
        assert_eq!(wire.user_path, "");
        assert_eq!(wire.device_uid, 0);
        assert!(wire.spid.is_none());
        assert_eq!(wire.tree_display_mode, 1);

        request.spid = Some(local_sn(130).spid);
        request.device_uid = Some(LOCAL_DEVICE);
        let wire = codec.display_tree_request_to_wire(&request).unwrap();
        assert_eq!(wire.device_uid, LOCAL_DEVICE);
        assert_eq!(wire.spid.unwrap().node_uid, 130);
    }

    #[test]
    fn nested_menu_items_round_trip() {
        let codec = codec();
        let menu = MenuItemMeta {
            item_type: MenuItemType::Normal,
            title: "Default drag mode".into(),
            action_type: ActionType::Builtin(ActionId::NoAction),
            target_uid: 0,
            target_guid_list: vec![],
            submenu_item_list: vec![
                MenuItemMeta {
                    item_type: MenuItemType::Normal,
                    title: "Move".into(),
                    action_type: ActionType::Builtin(ActionId::SetDefaultDragModeToMove),
                    target_uid: 0,
                    target_guid_list: vec!["2:120".into()],
                    submenu_item_list: vec![],
                },
                MenuItemMeta {
                    item_type: MenuItemType::Separator,
                    title: String::new(),
                    action_type: ActionType::Custom(1001),
                    target_uid: 7,
                    target_guid_list: vec![],
                    submenu_item_list: vec![],
                },
            ],
        };
        let wire = codec.menu_item_to_wire(&menu);
        assert_eq!(wire.submenu_item_list.len(), 2);
        assert_eq!(codec.menu_item_from_wire(wire).unwrap(), menu);
    }

    #[test]
    fn tree_action_carries_nodes() {
        let codec = codec();
        let action = TreeAction {
            tree_id: "left_tree".into(),
            action_type: ActionType::Builtin(ActionId::ExpandAll),
            target_guid_list: vec!["2:120".into()],
            target_node_list: vec![local_sn(120).node],
            target_uid: 0,
        };
        let wire = codec.tree_action_to_wire(&action).unwrap();
        assert_eq!(wire.action_id, 3);
        assert_eq!(codec.tree_action_from_wire(wire).unwrap(), action);
    }

    #[test]
    fn user_op_with_and_without_dst() {
        let codec = codec();
        let mut op = UserOp {
            op_uid: 501,
            batch_uid: 500,
            op_type: UserOpType::Rm,
            src_node: local_sn(140).node,
            dst_node: None,
        };
        let wire = codec.user_op_to_wire(&op).unwrap();
        assert!(wire.dst_node.is_none());
        assert_eq!(codec.user_op_from_wire(wire).unwrap(), op);

        op.op_type = UserOpType::Cp;
        op.dst_node = Some(local_sn(141).node);
        let wire = codec.user_op_to_wire(&op).unwrap();
        assert_eq!(codec.user_op_from_wire(wire).unwrap(), op);
    }

    #[test]
    fn stats_update_keeps_absent_entries() {
        let codec = codec();
        let mut stats = StatsUpdate {
            status_msg: "Loaded 3 dirs".into(),
            ..StatsUpdate::default()
        };
        stats.dir_stats_by_uid.insert(120, None);
        stats.dir_stats_by_uid.insert(
            121,
            Some(DirectoryStats {
                file_count: 4,
                ..DirectoryStats::default()
            }),
        );
        stats
            .dir_stats_by_guid
            .insert("2:120".into(), Some(DirectoryStats::default()));

        let wire = codec.stats_update_to_wire(&stats);
        assert_eq!(wire.dir_meta_by_uid_list[0].uid, 120);
        assert!(!wire.dir_meta_by_uid_list[0].dir_meta.has_data);
        assert_eq!(codec.stats_update_from_wire(wire), stats);
    }
}
