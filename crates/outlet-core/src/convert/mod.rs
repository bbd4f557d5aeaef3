// ── Wire ⇄ domain codec ──
//
// `Codec` translates between `outlet_api::wire` messages and the domain
// model in both directions. Wire messages use zero/empty sentinels for
// absent values; the codec maps those to `Option` and back, and rejects
// anything that would produce an inconsistent domain object. There is no
// partial decoding: one bad field fails the whole conversion.

mod identifier;
mod node;
mod signal;
mod tree;

use std::sync::Arc;

use crate::error::CoreError;
use crate::identifier_factory::NodeIdentifierFactory;

pub struct Codec {
    factory: Arc<NodeIdentifierFactory>,
}

impl Codec {
    pub fn new(factory: Arc<NodeIdentifierFactory>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &NodeIdentifierFactory {
        &self.factory
    }
}

// ── Sentinel helpers ─────────────────────────────────────────────────

fn non_zero<T: PartialEq + Default>(value: T) -> Option<T> {
    (value != T::default()).then_some(value)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Map a wire enum number through `from_repr`, naming `field` on failure.
fn enum_from_wire<T>(
    raw: u32,
    field: &str,
    from_repr: impl FnOnce(u32) -> Option<T>,
) -> Result<T, CoreError> {
    from_repr(raw).ok_or_else(|| CoreError::invalid_state(format!("invalid {field} from wire: {raw}")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::Codec;
    use crate::identifier_factory::NodeIdentifierFactory;
    use crate::model::{Device, TreeType};
    use crate::store::DeviceStore;

    pub(crate) const LOCAL_DEVICE: u32 = 2;
    pub(crate) const GDRIVE_DEVICE: u32 = 3;

    pub(crate) fn codec() -> Codec {
        let store = Arc::new(DeviceStore::new());
        store.replace_all(vec![
            Device {
                device_uid: LOCAL_DEVICE,
                long_device_id: "local-1".into(),
                tree_type: TreeType::LocalDisk,
                friendly_name: "Laptop".into(),
            },
            Device {
                device_uid: GDRIVE_DEVICE,
                long_device_id: "gdrive-1".into(),
                tree_type: TreeType::GDrive,
                friendly_name: "My Drive".into(),
            },
        ]);
        Codec::new(Arc::new(NodeIdentifierFactory::new(store)))
    }
}
