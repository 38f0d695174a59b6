//! Persistence of the selected UI mode under a single storage key.

use crate::storage::KeyValueStore;
use shared::UiMode;
use std::sync::Arc;

/// Storage key holding the persisted mode string
pub const UI_MODE_KEY: &str = "ui_mode";

/// Persists the selected [`UiMode`] in a key/value store.
///
/// Storage failures never reach the caller: reads degrade to `None` and
/// writes are logged and dropped.
#[derive(Clone)]
pub struct ModeStore {
    store: Arc<dyn KeyValueStore>,
}

impl ModeStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<UiMode> {
        let raw = match self.store.get(UI_MODE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("could not read persisted ui mode: {}", e);
                return None;
            }
        };
        match raw.parse::<UiMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::debug!("ignoring persisted value: {}", e);
                None
            }
        }
    }

    pub fn save(&self, mode: UiMode) {
        if let Err(e) = self.store.set(UI_MODE_KEY, mode.as_str()) {
            tracing::warn!("could not persist ui mode {}: {}", mode, e);
        }
    }
}
