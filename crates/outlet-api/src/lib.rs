// outlet-api: wire messages and transport plumbing for the Outlet service

pub mod channel;
pub mod discovery;
pub mod error;
pub mod http;
pub mod signal_stream;
pub mod wire;

pub use channel::{ChannelFactory, Endpoint, RpcChannel, SignalStream};
pub use error::Error;
pub use http::{HttpChannel, HttpChannelFactory, TransportConfig};
