//! Outbound side of the socket. The emitter only ever calls [`Transport::emit`];
//! connection lifecycle belongs to whoever owns the other end.

pub mod channel;
pub mod recording;

use thiserror::Error;

use crate::protocol::OutboundEvent;

pub use channel::{write_frames, ChannelTransport, EventStream};
pub use recording::RecordingTransport;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport closed, {0} dropped")]
    Closed(&'static str),
}

/// Fire-and-forget send. Implementations must not block.
pub trait Transport: Send + Sync {
    fn emit(&self, event: OutboundEvent) -> Result<(), TransportError>;
}
