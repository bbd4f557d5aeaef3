// ── Device store ──
//
// Concurrent map of known devices with push-based change notification.
// Fed by `get_device_list` responses and `DEVICE_UPSERTED` signals; read
// by the identifier factory through `DeviceRegistry`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::identifier_factory::DeviceRegistry;
use crate::model::{Device, Uid};

pub struct DeviceStore {
    by_uid: DashMap<Uid, Device>,
    /// Sorted snapshot, rebuilt on every mutation.
    snapshot: watch::Sender<Arc<Vec<Device>>>,
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_uid: DashMap::new(),
            snapshot,
        }
    }

    /// Insert or update one device. Returns `true` if it was new.
    pub fn upsert(&self, device: Device) -> bool {
        let is_new = self.by_uid.insert(device.device_uid, device).is_none();
        self.rebuild_snapshot();
        is_new
    }

    /// Replace the whole set, as after a full `get_device_list`.
    pub fn replace_all(&self, devices: impl IntoIterator<Item = Device>) {
        self.by_uid.clear();
        for device in devices {
            self.by_uid.insert(device.device_uid, device);
        }
        self.rebuild_snapshot();
    }

    pub fn get(&self, device_uid: Uid) -> Option<Device> {
        self.by_uid.get(&device_uid).map(|r| r.value().clone())
    }

    pub fn snapshot(&self) -> Arc<Vec<Device>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Device>>> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.by_uid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uid.is_empty()
    }

    fn rebuild_snapshot(&self) {
        let mut devices: Vec<Device> = self.by_uid.iter().map(|r| r.value().clone()).collect();
        devices.sort_by_key(|d| d.device_uid);
        self.snapshot.send_replace(Arc::new(devices));
    }
}

impl DeviceRegistry for DeviceStore {
    fn device(&self, device_uid: Uid) -> Option<Device> {
        self.get(device_uid)
    }

    fn device_list(&self) -> Vec<Device> {
        self.snapshot().as_ref().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::TreeType;

    fn device(uid: Uid, name: &str) -> Device {
        Device {
            device_uid: uid,
            long_device_id: format!("long-{uid}"),
            tree_type: TreeType::LocalDisk,
            friendly_name: name.into(),
        }
    }

    #[test]
    fn upsert_and_snapshot_order() {
        let store = DeviceStore::new();
        assert!(store.upsert(device(7, "b")));
        assert!(store.upsert(device(3, "a")));
        assert!(!store.upsert(device(7, "b2")));

        let snap = store.snapshot();
        let uids: Vec<Uid> = snap.iter().map(|d| d.device_uid).collect();
        assert_eq!(uids, vec![3, 7]);
        assert_eq!(store.get(7).unwrap().friendly_name, "b2");
    }

    #[test]
    fn replace_all_drops_stale_devices() {
        let store = DeviceStore::new();
        store.upsert(device(1, "gone"));
        store.replace_all(vec![device(2, "kept")]);
        assert!(store.get(1).is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = DeviceStore::new();
        let mut rx = store.subscribe();
        store.upsert(device(5, "x"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
