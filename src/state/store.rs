use std::sync::{Arc, Mutex, PoisonError};

use super::{Action, RootState};

/// The two calls the emitter makes against application state.
pub trait StateStore: Send + Sync {
    fn snapshot(&self) -> Arc<RootState>;
    fn dispatch(&self, action: Action);
}

type Subscriber = Arc<dyn Fn(&Action, &RootState) + Send + Sync>;

/// Small in-process container. State is copy-on-write so snapshots stay
/// immutable after later dispatches.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<Arc<RootState>>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl Store {
    pub fn new(initial: RootState) -> Self {
        Self {
            state: Arc::new(Mutex::new(Arc::new(initial))),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Listeners run after every dispatch, outside both locks, so they may
    /// dispatch follow-up actions.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Action, &RootState) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(RootState::default())
    }
}

impl StateStore for Store {
    fn snapshot(&self) -> Arc<RootState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, action: Action) {
        let next = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::make_mut(&mut *guard).reduce(&action);
            Arc::clone(&*guard)
        };
        log::trace!("dispatched {:?}", action);

        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &subscribers {
            listener(&action, &next);
        }
    }
}
