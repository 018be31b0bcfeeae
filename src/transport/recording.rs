use std::sync::{Arc, Mutex, PoisonError};

use super::{Transport, TransportError};
use crate::protocol::OutboundEvent;

/// Keeps every emitted event in memory. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    events: Arc<Mutex<Vec<OutboundEvent>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OutboundEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(OutboundEvent::name)
            .collect()
    }

    pub fn last(&self) -> Option<OutboundEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Transport for RecordingTransport {
    fn emit(&self, event: OutboundEvent) -> Result<(), TransportError> {
        log::debug!("recorded {}", event.name());
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
