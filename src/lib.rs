//! genbridge turns image-generation UI state into outbound socket messages.
//!
//! The pipeline for every intent is snapshot → translate → emit: a
//! [`RequestEmitter`] applies the intent's local mutations to a [`StateStore`],
//! reads a fresh snapshot, builds the payload with
//! [`translation::frontend_to_backend_parameters`] where needed and hands an
//! [`OutboundEvent`] to a [`Transport`]. Generation and postprocessing requests
//! also leave a redacted entry in the activity log.

pub mod activity;
pub mod config;
pub mod emitter;
pub mod error;
pub mod intent;
pub mod logger;
pub mod models;
pub mod protocol;
pub mod readiness;
pub mod state;
pub mod translation;
pub mod transport;

pub use activity::ActivityLogger;
pub use config::EmitterConfig;
pub use emitter::RequestEmitter;
pub use error::{EmitterError, Result};
pub use intent::Intent;
pub use models::*;
pub use protocol::OutboundEvent;
pub use readiness::{DefaultReadiness, Readiness, ReadinessGate};
pub use state::{Action, RootState, StateStore, Store};
pub use transport::{ChannelTransport, RecordingTransport, Transport, TransportError};
