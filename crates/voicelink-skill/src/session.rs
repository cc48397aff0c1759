//! Per-user session state.
//!
//! Conversation continuity is keyed by the platform user id so concurrent
//! requests from different users can never observe each other's
//! conversation token or greeting state. Entries live for the process
//! lifetime; there is no persistence.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;

/// One user's conversational state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Backend conversation correlation token from the user's last turn.
    pub conversation_id: Option<String>,
    /// Calendar date (in the deployment's home offset) of the user's last
    /// launch, steering the welcome-vs-resume greeting.
    pub last_interaction_date: Option<NaiveDate>,
}

/// In-memory session map.
///
/// Uses `std::sync::RwLock` intentionally: all lock acquisitions are brief
/// HashMap operations that never span `.await` points.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a user's state; a user never seen before gets defaults.
    pub fn get(&self, user_id: &str) -> SessionState {
        let map = match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("session store lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        };
        map.get(user_id).cloned().unwrap_or_default()
    }

    /// Applies `mutate` to the user's entry, creating it if absent.
    pub fn update(&self, user_id: &str, mutate: impl FnOnce(&mut SessionState)) {
        let mut map = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("session store lock poisoned, recovering with stale state");
                poisoned.into_inner()
            }
        };
        mutate(map.entry(user_id.to_string()).or_default());
    }
}
