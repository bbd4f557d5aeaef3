// ── Session ──
//
// The public entry point. A `Session` owns the device store, codec,
// connection loop and call queue, and exposes every backend RPC as a
// typed async method. Cheaply cloneable via `Arc<SessionInner>`.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use outlet_api::wire::{
    ConfigEntry, ConfigListMsg, DeleteSubtreeRequest, DiffTreesMsg, DownloadFromGDriveRequest,
    DragDropRequest, DragDropResponse, Empty, ExecuteTreeActionListRequest, GenerateMergeTreeRequest,
    GetAncestorListRequest, GetAncestorListResponse, GetChildListRequest, GetChildListResponse,
    GetConfigRequest, GetContextMenuRequest, GetContextMenuResponse, GetDeviceListResponse,
    GetFilterResponse, GetIconRequest, GetIconResponse, GetLastPendingOpResponse,
    GetNodeForUidRequest, GetRowsOfInterestResponse, GetSnForRequest, GetSnForResponse,
    GetUidForLocalPathRequest, NodeRefRequest, PlayStateMsg, RefreshSubtreeRequest,
    RemoveExpandedRowRequest, RequestDisplayTreeResponse, SetSelectedRowSetRequest,
    SingleNodeResponse, TreeIdRequest, UidResponse, UpdateFilterRequest, rpc,
};
use outlet_api::{ChannelFactory, HttpChannelFactory};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::{ID_GDRIVE_DIR_SELECT, SessionConfig};
use crate::connection::{self, ConnectionManager, ConnectionState, Link};
use crate::convert::Codec;
use crate::discovery::{MdnsServiceBrowser, ServiceBrowser, ServiceLocator};
use crate::error::CoreError;
use crate::identifier_factory::NodeIdentifierFactory;
use crate::model::{
    Device, DiffResultTreeIds, DisplayTreeRequest, DisplayTreeUiState, DragDropSpec,
    FilterCriteria, Guid, Icon, IconId, MenuItemMeta, NULL_UID, NodeIdentifier, RowsOfInterest,
    SignalEnvelope, SinglePathId, SpidNodePair, TNode, TreeAction, TreeDisplayMode, Uid, UserOp,
};
use crate::signal_channel::{SignalChannel, SignalRelay};
use crate::store::DeviceStore;
use crate::stream::SignalSubscription;

// ── Session ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: SessionConfig,
    store: Arc<DeviceStore>,
    codec: Arc<Codec>,
    link: Arc<Link>,
    calls: SignalChannel,
    manager: Mutex<Option<ConnectionManager>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Build a session with the HTTP transport and mDNS browser. Does not
    /// connect; call [`start`](Self::start).
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        let factory = HttpChannelFactory::new(&config.transport).map_err(|e| CoreError::Config {
            message: format!("could not build HTTP client: {e}"),
        })?;
        Ok(Self::with_transport(
            config,
            Arc::new(factory),
            Arc::new(MdnsServiceBrowser),
        ))
    }

    /// Build a session over caller-supplied transport pieces.
    pub fn with_transport(
        config: SessionConfig,
        factory: Arc<dyn ChannelFactory>,
        browser: Arc<dyn ServiceBrowser>,
    ) -> Self {
        let store = Arc::new(DeviceStore::new());
        let codec = Arc::new(Codec::new(Arc::new(NodeIdentifierFactory::new(
            Arc::clone(&store) as _,
        ))));
        let link = Arc::new(Link::new(config.signal_buffer));
        let cancel = CancellationToken::new();

        let manager = ConnectionManager::new(
            Arc::clone(&link),
            ServiceLocator::new(config.endpoint.clone(), browser),
            factory,
            SignalRelay::new(Arc::clone(&codec), Arc::clone(&store), Arc::clone(&link)),
            config.discovery_timeout,
            config.retry_interval,
            cancel.clone(),
        );

        Self {
            inner: Arc::new(SessionInner {
                calls: SignalChannel::new(Arc::clone(&link)),
                config,
                store,
                codec,
                link,
                manager: Mutex::new(Some(manager)),
                cancel,
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn devices(&self) -> &DeviceStore {
        &self.inner.store
    }

    pub fn codec(&self) -> &Codec {
        &self.inner.codec
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the connection loop and the call processor. Idempotent.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if let Some(processor) = self
            .inner
            .calls
            .spawn_processor(self.inner.cancel.clone())
            .await
        {
            handles.push(processor);
        }
        if let Some(manager) = self.inner.manager.lock().await.take() {
            handles.push(tokio::spawn(manager.run()));
            info!("session started");
        }
    }

    /// Stop all background work and close the channel.
    pub async fn stop(&self) {
        connection::shutdown(&self.inner.link, &self.inner.cancel).await;
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                error!(error = %e, "session task panicked");
            }
        }
        debug!("session stopped");
    }

    /// Wait until the signal stream delivers its first message.
    pub async fn wait_until_connected(&self, timeout: Duration) -> Result<(), CoreError> {
        let mut rx = self.inner.link.watch_state();
        match tokio::time::timeout(timeout, rx.wait_for(|s| s.is_connected)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(_)) => Err(CoreError::ConnectionDown {
                rpc: rpc::SUBSCRIBE_TO_SIGNALS.into(),
            }),
            Err(_) => {
                let state = self.inner.link.state();
                Err(CoreError::TransportFailure {
                    rpc: rpc::SUBSCRIBE_TO_SIGNALS.into(),
                    reason: format!(
                        "no connection within {}s (last tried {}:{}, phase {})",
                        timeout.as_secs(),
                        state.host,
                        state.port,
                        state.phase
                    ),
                })
            }
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn is_connected(&self) -> bool {
        self.inner.link.is_connected()
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.link.watch_state()
    }

    pub fn subscribe(&self) -> SignalSubscription {
        SignalSubscription::new(self.inner.link.subscribe())
    }

    async fn call<Req, Resp>(&self, rpc: &'static str, request: &Req) -> Result<Resp, CoreError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        self.inner.calls.call(rpc, request).await
    }

    // ── Config ───────────────────────────────────────────────────────

    /// Read one remote config value. An empty value falls back to `default`.
    pub async fn get_config(&self, key: &str, default: Option<&str>) -> Result<String, CoreError> {
        let request = GetConfigRequest {
            config_key_list: vec![key.to_owned()],
        };
        let response: ConfigListMsg = self.call(rpc::GET_CONFIG, &request).await?;
        let [entry] = <[ConfigEntry; 1]>::try_from(response.config_list).map_err(|list| {
            CoreError::invalid_state(format!(
                "get_config for '{key}' returned {} values, expected 1",
                list.len()
            ))
        })?;
        if entry.key != key {
            debug!(expected = key, got = %entry.key, "get_config answered a different key");
        }
        if !entry.val.is_empty() {
            return Ok(entry.val);
        }
        default.map(str::to_owned).ok_or_else(|| {
            CoreError::invalid_state(format!(
                "get_config: no default supplied and no value for key '{key}'"
            ))
        })
    }

    pub async fn get_u32_config(&self, key: &str, default: Option<u32>) -> Result<u32, CoreError> {
        self.get_parsed_config(key, default, "u32").await
    }

    pub async fn get_i64_config(&self, key: &str, default: Option<i64>) -> Result<i64, CoreError> {
        self.get_parsed_config(key, default, "i64").await
    }

    pub async fn get_bool_config(&self, key: &str, default: Option<bool>) -> Result<bool, CoreError> {
        let raw = self
            .get_config(key, default.map(|d| d.to_string()).as_deref())
            .await?;
        raw.to_lowercase().parse().map_err(|_| {
            CoreError::invalid_state(format!("failed to parse \"{raw}\" as bool for key \"{key}\""))
        })
    }

    async fn get_parsed_config<T>(&self, key: &str, default: Option<T>, type_name: &str) -> Result<T, CoreError>
    where
        T: FromStr + ToString,
    {
        let raw = self
            .get_config(key, default.map(|d| d.to_string()).as_deref())
            .await?;
        raw.trim().parse().map_err(|_| {
            CoreError::invalid_state(format!(
                "failed to parse \"{raw}\" as {type_name} for key \"{key}\""
            ))
        })
    }

    pub async fn get_config_list(&self, keys: &[&str]) -> Result<HashMap<String, String>, CoreError> {
        let request = GetConfigRequest {
            config_key_list: keys.iter().map(|k| (*k).to_owned()).collect(),
        };
        let response: ConfigListMsg = self.call(rpc::GET_CONFIG, &request).await?;
        if response.config_list.len() != keys.len() {
            debug!(
                requested = keys.len(),
                returned = response.config_list.len(),
                "get_config_list count mismatch"
            );
        }
        Ok(response
            .config_list
            .into_iter()
            .map(|e| (e.key, e.val))
            .collect())
    }

    pub async fn put_config(&self, key: &str, val: &str) -> Result<(), CoreError> {
        let request = ConfigListMsg {
            config_list: vec![ConfigEntry {
                key: key.to_owned(),
                val: val.to_owned(),
            }],
        };
        let _: Empty = self.call(rpc::PUT_CONFIG, &request).await?;
        Ok(())
    }

    pub async fn put_config_list(&self, entries: &HashMap<String, String>) -> Result<(), CoreError> {
        let mut config_list: Vec<ConfigEntry> = entries
            .iter()
            .map(|(key, val)| ConfigEntry {
                key: key.clone(),
                val: val.clone(),
            })
            .collect();
        config_list.sort_by(|a, b| a.key.cmp(&b.key));
        let _: Empty = self
            .call(rpc::PUT_CONFIG, &ConfigListMsg { config_list })
            .await?;
        Ok(())
    }

    // ── Devices & nodes ──────────────────────────────────────────────

    /// Fetch every device and replace the store's contents with them.
    pub async fn get_device_list(&self) -> Result<Vec<Device>, CoreError> {
        let response: GetDeviceListResponse = self.call(rpc::GET_DEVICE_LIST, &Empty {}).await?;
        let devices = response
            .device_list
            .into_iter()
            .map(|d| self.inner.codec.device_from_wire(d))
            .collect::<Result<Vec<_>, _>>()?;
        self.inner.store.replace_all(devices.clone());
        Ok(devices)
    }

    pub async fn get_node_for_uid(&self, uid: Uid, device_uid: Uid) -> Result<Option<TNode>, CoreError> {
        let request = GetNodeForUidRequest { uid, device_uid };
        let response: SingleNodeResponse = self.call(rpc::GET_NODE_FOR_UID, &request).await?;
        response
            .node
            .map(|n| self.inner.codec.node_from_wire(n))
            .transpose()
    }

    pub async fn next_uid(&self) -> Result<Uid, CoreError> {
        let response: UidResponse = self.call(rpc::GET_NEXT_UID, &Empty {}).await?;
        Ok(response.uid)
    }

    pub async fn get_uid_for_local_path(
        &self,
        full_path: &str,
        uid_suggestion: Option<Uid>,
    ) -> Result<Option<Uid>, CoreError> {
        let request = GetUidForLocalPathRequest {
            full_path: full_path.to_owned(),
            uid_suggestion: uid_suggestion.unwrap_or(NULL_UID),
        };
        let response: UidResponse = self.call(rpc::GET_UID_FOR_LOCAL_PATH, &request).await?;
        Ok((response.uid != NULL_UID).then_some(response.uid))
    }

    pub async fn get_sn_for(
        &self,
        node_uid: Uid,
        device_uid: Uid,
        full_path: &str,
    ) -> Result<Option<SpidNodePair>, CoreError> {
        let request = GetSnForRequest {
            node_uid,
            device_uid,
            full_path: full_path.to_owned(),
        };
        let response: GetSnForResponse = self.call(rpc::GET_SN_FOR, &request).await?;
        response
            .sn
            .map(|sn| self.inner.codec.sn_from_wire(sn))
            .transpose()
    }

    /// List the children of `parent_spid`. `max_results` of `None` means no limit.
    pub async fn get_child_list(
        &self,
        parent_spid: &SinglePathId,
        tree_id: Option<&str>,
        is_expanding_parent: bool,
        max_results: Option<u32>,
    ) -> Result<Vec<SpidNodePair>, CoreError> {
        let request = GetChildListRequest {
            tree_id: tree_id.unwrap_or_default().to_owned(),
            parent_spid: self.inner.codec.spid_to_wire(parent_spid)?,
            is_expanding_parent,
            max_results: max_results.unwrap_or(0),
        };
        let response: GetChildListResponse =
            self.call(rpc::GET_CHILD_LIST_FOR_SPID, &request).await?;
        if let Some(err) = response.error {
            error!(be_msg = %err.be_msg, "get_child_list returned an error");
            return Err(CoreError::ChildListFailed {
                message: err.fe_msg,
                secondary: err.fe_secondary_msg,
            });
        }
        self.inner.codec.sn_list_from_wire(response.child_list)
    }

    pub async fn get_ancestor_list(
        &self,
        spid: &SinglePathId,
        stop_at_path: Option<&str>,
    ) -> Result<Vec<SpidNodePair>, CoreError> {
        let request = GetAncestorListRequest {
            stop_at_path: stop_at_path.unwrap_or_default().to_owned(),
            spid: self.inner.codec.spid_to_wire(spid)?,
        };
        let response: GetAncestorListResponse =
            self.call(rpc::GET_ANCESTOR_LIST_FOR_SPID, &request).await?;
        self.inner.codec.sn_list_from_wire(response.ancestor_list)
    }

    // ── Row state ────────────────────────────────────────────────────

    pub async fn get_rows_of_interest(&self, tree_id: &str) -> Result<RowsOfInterest, CoreError> {
        let request = TreeIdRequest {
            tree_id: tree_id.to_owned(),
        };
        let response: GetRowsOfInterestResponse =
            self.call(rpc::GET_ROWS_OF_INTEREST, &request).await?;
        Ok(self.inner.codec.rows_of_interest_from_wire(response))
    }

    pub async fn set_selected_row_set(&self, selected: &HashSet<Guid>, tree_id: &str) -> Result<(), CoreError> {
        let mut guids: Vec<Guid> = selected.iter().cloned().collect();
        guids.sort();
        let request = SetSelectedRowSetRequest {
            selected_row_guid_set: guids,
            tree_id: tree_id.to_owned(),
        };
        let _: Empty = self.call(rpc::SET_SELECTED_ROW_SET, &request).await?;
        Ok(())
    }

    pub async fn remove_expanded_row(&self, row_guid: &str, tree_id: &str) -> Result<(), CoreError> {
        let request = RemoveExpandedRowRequest {
            row_guid: row_guid.to_owned(),
            tree_id: tree_id.to_owned(),
        };
        let _: Empty = self.call(rpc::REMOVE_EXPANDED_ROW, &request).await?;
        Ok(())
    }

    // ── Context menu & actions ───────────────────────────────────────

    pub async fn get_context_menu(&self, tree_id: &str, guids: &[Guid]) -> Result<Vec<MenuItemMeta>, CoreError> {
        let request = GetContextMenuRequest {
            tree_id: tree_id.to_owned(),
            target_guid_list: guids.to_vec(),
        };
        let response: GetContextMenuResponse = self.call(rpc::GET_CONTEXT_MENU, &request).await?;
        response
            .menu_item_list
            .into_iter()
            .map(|item| self.inner.codec.menu_item_from_wire(item))
            .collect()
    }

    pub async fn execute_tree_action_list(&self, actions: &[TreeAction]) -> Result<(), CoreError> {
        let request = ExecuteTreeActionListRequest {
            action_list: actions
                .iter()
                .map(|a| self.inner.codec.tree_action_to_wire(a))
                .collect::<Result<_, _>>()?,
        };
        let _: Empty = self.call(rpc::EXECUTE_TREE_ACTION_LIST, &request).await?;
        Ok(())
    }

    pub async fn execute_tree_action(&self, action: &TreeAction) -> Result<(), CoreError> {
        self.execute_tree_action_list(std::slice::from_ref(action)).await
    }

    // ── Display trees ────────────────────────────────────────────────

    /// Ask the backend for a display tree. With `return_async` the state
    /// arrives later as `DISPLAY_TREE_CHANGED` and this returns `None`.
    pub async fn request_display_tree(
        &self,
        request: &DisplayTreeRequest,
    ) -> Result<Option<DisplayTreeUiState>, CoreError> {
        debug!(tree_id = %request.tree_id, "requesting display tree");
        let wire = self.inner.codec.display_tree_request_to_wire(request)?;
        let response: RequestDisplayTreeResponse =
            self.call(rpc::REQUEST_DISPLAY_TREE, &wire).await?;
        response
            .display_tree_ui_state
            .map(|s| self.inner.codec.display_tree_ui_state_from_wire(s))
            .transpose()
    }

    pub async fn create_display_tree_for_gdrive_select(
        &self,
        device_uid: Uid,
    ) -> Result<Option<DisplayTreeUiState>, CoreError> {
        let mut request = DisplayTreeRequest::new(ID_GDRIVE_DIR_SELECT);
        request.spid = Some(self.inner.codec.factory().root_gdrive_spid(device_uid));
        self.request_display_tree(&request).await
    }

    pub async fn create_display_tree_from_config(
        &self,
        tree_id: &str,
        is_startup: bool,
    ) -> Result<Option<DisplayTreeUiState>, CoreError> {
        let mut request = DisplayTreeRequest::new(tree_id);
        request.is_startup = is_startup;
        self.request_display_tree(&request).await
    }

    pub async fn create_display_tree_from_spid(
        &self,
        tree_id: &str,
        spid: SinglePathId,
    ) -> Result<Option<DisplayTreeUiState>, CoreError> {
        let mut request = DisplayTreeRequest::new(tree_id);
        request.return_async = true;
        request.spid = Some(spid);
        self.request_display_tree(&request).await
    }

    pub async fn create_display_tree_from_user_path(
        &self,
        tree_id: &str,
        user_path: &str,
        device_uid: Uid,
    ) -> Result<Option<DisplayTreeUiState>, CoreError> {
        let mut request = DisplayTreeRequest::new(tree_id);
        request.return_async = true;
        request.user_path = Some(user_path.to_owned());
        request.device_uid = Some(device_uid);
        self.request_display_tree(&request).await
    }

    pub async fn create_existing_display_tree(
        &self,
        tree_id: &str,
        tree_display_mode: TreeDisplayMode,
    ) -> Result<Option<DisplayTreeUiState>, CoreError> {
        let mut request = DisplayTreeRequest::new(tree_id);
        request.tree_display_mode = tree_display_mode;
        self.request_display_tree(&request).await
    }

    // ── Loading, diff & merge ────────────────────────────────────────

    pub async fn start_subtree_load(&self, tree_id: &str) -> Result<(), CoreError> {
        let request = TreeIdRequest {
            tree_id: tree_id.to_owned(),
        };
        let _: Empty = self.call(rpc::START_SUBTREE_LOAD, &request).await?;
        Ok(())
    }

    pub async fn refresh_subtree(&self, node_identifier: &NodeIdentifier, tree_id: &str) -> Result<(), CoreError> {
        let request = RefreshSubtreeRequest {
            node_identifier: self.inner.codec.identifier_to_wire(node_identifier)?,
            tree_id: tree_id.to_owned(),
        };
        let _: Empty = self.call(rpc::REFRESH_SUBTREE, &request).await?;
        Ok(())
    }

    pub async fn get_op_execution_play_state(&self) -> Result<bool, CoreError> {
        let response: PlayStateMsg = self.call(rpc::GET_OP_EXEC_PLAY_STATE, &Empty {}).await?;
        Ok(response.is_enabled)
    }

    pub async fn start_diff_trees(&self, tree_id_left: &str, tree_id_right: &str) -> Result<DiffResultTreeIds, CoreError> {
        let request = DiffTreesMsg {
            tree_id_left: tree_id_left.to_owned(),
            tree_id_right: tree_id_right.to_owned(),
        };
        let response: DiffTreesMsg = self.call(rpc::START_DIFF_TREES, &request).await?;
        Ok(DiffResultTreeIds {
            left: response.tree_id_left,
            right: response.tree_id_right,
        })
    }

    pub async fn generate_merge_tree(
        &self,
        tree_id_left: &str,
        tree_id_right: &str,
        selected_left: &[Guid],
        selected_right: &[Guid],
    ) -> Result<(), CoreError> {
        let request = GenerateMergeTreeRequest {
            tree_id_left: tree_id_left.to_owned(),
            tree_id_right: tree_id_right.to_owned(),
            change_list_left: selected_left.to_vec(),
            change_list_right: selected_right.to_vec(),
        };
        let _: Empty = self.call(rpc::GENERATE_MERGE_TREE, &request).await?;
        Ok(())
    }

    /// Returns whether the backend accepted the drop.
    pub async fn drop_dragged_nodes(
        &self,
        src_tree_id: &str,
        dst_tree_id: &str,
        spec: &DragDropSpec,
    ) -> Result<bool, CoreError> {
        let request = DragDropRequest {
            src_tree_id: src_tree_id.to_owned(),
            dst_tree_id: dst_tree_id.to_owned(),
            src_guid_list: spec.src_guid_list.clone(),
            dst_guid: spec.dst_guid.clone(),
            is_into: spec.is_into,
            drag_operation: spec.drag_operation as u32,
            dir_conflict_policy: spec.dir_conflict_policy as u32,
            file_conflict_policy: spec.file_conflict_policy as u32,
        };
        let response: DragDropResponse = self.call(rpc::DROP_DRAGGED_NODES, &request).await?;
        Ok(response.is_accepted)
    }

    pub async fn delete_subtree(&self, device_uid: Uid, node_uids: &[Uid]) -> Result<(), CoreError> {
        let request = DeleteSubtreeRequest {
            device_uid,
            node_uid_list: node_uids.to_vec(),
        };
        let _: Empty = self.call(rpc::DELETE_SUBTREE, &request).await?;
        Ok(())
    }

    pub async fn get_last_pending_op(&self, device_uid: Uid, node_uid: Uid) -> Result<Option<UserOp>, CoreError> {
        let request = NodeRefRequest {
            device_uid,
            node_uid,
        };
        let response: GetLastPendingOpResponse =
            self.call(rpc::GET_LAST_PENDING_OP_FOR_NODE, &request).await?;
        response
            .user_op
            .map(|op| self.inner.codec.user_op_from_wire(op))
            .transpose()
    }

    pub async fn download_file_from_gdrive(
        &self,
        device_uid: Uid,
        node_uid: Uid,
        requestor_id: &str,
    ) -> Result<(), CoreError> {
        let request = DownloadFromGDriveRequest {
            device_uid,
            node_uid,
            requestor_id: requestor_id.to_owned(),
        };
        let _: Empty = self.call(rpc::DOWNLOAD_FILE_FROM_GDRIVE, &request).await?;
        Ok(())
    }

    // ── Filters ──────────────────────────────────────────────────────

    pub async fn get_filter_criteria(&self, tree_id: &str) -> Result<FilterCriteria, CoreError> {
        let request = TreeIdRequest {
            tree_id: tree_id.to_owned(),
        };
        let response: GetFilterResponse = self.call(rpc::GET_FILTER, &request).await?;
        let Some(criteria) = response.filter_criteria else {
            return Err(CoreError::invalid_state(format!(
                "no filter criteria (probably unknown tree) for tree: {tree_id}"
            )));
        };
        self.inner.codec.filter_criteria_from_wire(criteria)
    }

    pub async fn update_filter_criteria(&self, tree_id: &str, criteria: &FilterCriteria) -> Result<(), CoreError> {
        let request = UpdateFilterRequest {
            tree_id: tree_id.to_owned(),
            filter_criteria: self.inner.codec.filter_criteria_to_wire(criteria),
        };
        let _: Empty = self.call(rpc::UPDATE_FILTER, &request).await?;
        Ok(())
    }

    // ── Icons & signals ──────────────────────────────────────────────

    pub async fn get_icon(&self, icon_id: IconId) -> Result<Option<Icon>, CoreError> {
        let request = GetIconRequest { icon_id: icon_id.0 };
        let response: GetIconResponse = self.call(rpc::GET_ICON, &request).await?;
        let Some(icon) = response.icon else {
            debug!(icon_id = icon_id.0, "backend has no such icon");
            return Ok(None);
        };
        if icon.icon_id != icon_id.0 {
            return Err(CoreError::invalid_state(format!(
                "requested icon {} but got {}",
                icon_id.0, icon.icon_id
            )));
        }
        Ok(Some(Icon {
            icon_id,
            content: icon.content.into(),
        }))
    }

    /// Forward a signal to the backend.
    pub async fn send_signal(&self, envelope: &SignalEnvelope) -> Result<(), CoreError> {
        let msg = self.inner.codec.signal_to_wire(envelope)?;
        let _: Empty = self.call(rpc::SEND_SIGNAL, &msg).await?;
        Ok(())
    }
}
