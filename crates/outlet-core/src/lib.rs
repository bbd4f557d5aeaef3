// outlet-core: session layer between outlet-api and consumers (CLI).

pub mod config;
pub mod connection;
pub mod convert;
pub mod discovery;
pub mod error;
pub mod identifier_factory;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;

mod signal_channel;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{EndpointMode, SessionConfig};
pub use connection::{ConnectionState, Phase};
pub use convert::Codec;
pub use discovery::{
    CompletionLatch, DiscoveredEndpoint, MdnsServiceBrowser, ServiceBrowser, ServiceLocator,
};
pub use error::CoreError;
pub use identifier_factory::{DeviceRegistry, NodeIdentifierFactory};
pub use session::Session;
pub use store::DeviceStore;
pub use stream::{SignalEnvelopeStream, SignalSubscription};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Devices & identifiers
    Device, Guid, MultiPathId, NodeIdentifier, NodeIdentifierType, SinglePathId, TreeType, Uid,
    // Nodes
    DirectoryStats, Icon, IconId, NodePayload, SpidNodePair, TNode, TrashStatus,
    // Trees & menus
    DisplayTreeRequest, DisplayTreeUiState, FilterCriteria, MenuItemMeta, RowsOfInterest,
    Ternary, TreeAction, TreeDisplayMode,
    // Ops
    DragDropSpec, UserOp,
    // Signals
    Signal, SignalEnvelope, SignalEvent,
};
