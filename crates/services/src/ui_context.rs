//! Owner of the active UI mode.
//!
//! One [`UiContext`] is built at start-up and handed to whatever needs the
//! mode. Consumers that must react to changes call [`UiContext::subscribe`].

use crate::mode_store::ModeStore;
use shared::{FeatureFlags, ModeInfo, UiMode};
use std::sync::mpsc::{channel, Receiver, Sender};

pub struct UiContext {
    mode: UiMode,
    store: ModeStore,
    subscribers: Vec<Sender<UiMode>>,
}

impl UiContext {
    /// Adopt the persisted mode if it is valid, otherwise basic. Only reads.
    pub fn initialize(store: ModeStore) -> Self {
        let mode = store.load().unwrap_or_default();
        tracing::info!("ui mode initialized to {}", mode);
        Self {
            mode,
            store,
            subscribers: Vec::new(),
        }
    }

    pub fn current_mode(&self) -> UiMode {
        self.mode
    }

    /// Switch by name. Unknown names are ignored.
    pub fn switch_mode(&mut self, target: &str) {
        match target.parse::<UiMode>() {
            Ok(mode) => self.set_mode(mode),
            Err(e) => tracing::debug!("mode switch ignored: {}", e),
        }
    }

    /// Make `mode` current, persist it and notify subscribers
    pub fn set_mode(&mut self, mode: UiMode) {
        if mode == self.mode {
            return;
        }
        tracing::info!("ui mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.store.save(mode);
        self.subscribers.retain(|tx| tx.send(mode).is_ok());
    }

    /// Receive every later mode change. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<UiMode> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn feature_flags(&self) -> &'static FeatureFlags {
        self.mode.feature_flags()
    }

    pub fn mode_info(&self, mode: &str) -> ModeInfo {
        UiMode::info_for(mode)
    }

    pub fn current_info(&self) -> ModeInfo {
        self.mode.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode_store::UI_MODE_KEY;
    use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn memory_context() -> (UiContext, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        (UiContext::initialize(ModeStore::new(kv.clone())), kv)
    }

    #[test]
    fn test_defaults_to_basic() {
        let (ctx, _) = memory_context();
        assert_eq!(ctx.current_mode(), UiMode::Basic);
    }

    #[test]
    fn test_invalid_persisted_value_falls_back_to_basic() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(UI_MODE_KEY, "ADVANCED").unwrap();
        let ctx = UiContext::initialize(ModeStore::new(kv));
        assert_eq!(ctx.current_mode(), UiMode::Basic);
    }

    #[test]
    fn test_initialize_is_repeatable() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(UI_MODE_KEY, "intermediate").unwrap();
        let store = ModeStore::new(kv.clone());
        let first = UiContext::initialize(store.clone());
        let second = UiContext::initialize(store);
        assert_eq!(first.current_mode(), second.current_mode());
        assert_eq!(kv.get(UI_MODE_KEY).unwrap().as_deref(), Some("intermediate"));
    }

    #[test]
    fn test_unknown_names_leave_mode_unchanged() {
        let (mut ctx, _) = memory_context();
        ctx.set_mode(UiMode::Intermediate);
        for bogus in ["superuser", "", "Basic", " advanced", "admin"] {
            ctx.switch_mode(bogus);
            assert_eq!(ctx.current_mode(), UiMode::Intermediate);
        }
    }

    #[test]
    fn test_superuser_from_advanced_keeps_persisted_value() {
        let (mut ctx, kv) = memory_context();
        ctx.switch_mode("advanced");
        ctx.switch_mode("superuser");
        assert_eq!(ctx.current_mode(), UiMode::Advanced);
        assert_eq!(kv.get(UI_MODE_KEY).unwrap().as_deref(), Some("advanced"));
    }

    #[test]
    fn test_flags_always_match_current_mode() {
        let (mut ctx, _) = memory_context();
        for name in ["advanced", "bogus", "basic", "intermediate", "x"] {
            ctx.switch_mode(name);
            assert_eq!(ctx.feature_flags(), ctx.current_mode().feature_flags());
        }
    }

    #[test]
    fn test_mode_round_trips_through_file_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        for mode in UiMode::all() {
            let mut ctx = UiContext::initialize(ModeStore::new(Arc::new(FileStore::new(&path))));
            ctx.switch_mode(mode.as_str());

            let fresh = UiContext::initialize(ModeStore::new(Arc::new(FileStore::new(&path))));
            assert_eq!(fresh.current_mode(), *mode);
        }
    }

    #[test]
    fn test_subscribers_see_changes_only() {
        let (mut ctx, _) = memory_context();
        let rx = ctx.subscribe();
        let dropped = ctx.subscribe();
        drop(dropped);

        ctx.switch_mode("advanced");
        ctx.switch_mode("advanced");
        ctx.switch_mode("nope");
        ctx.switch_mode("basic");

        let seen: Vec<UiMode> = rx.try_iter().collect();
        assert_eq!(seen, vec![UiMode::Advanced, UiMode::Basic]);
        assert_eq!(ctx.subscribers.len(), 1);
    }

    #[test]
    fn test_mode_info_lookup() {
        let (ctx, _) = memory_context();
        assert_eq!(ctx.mode_info("intermediate").name, "Business Tools");
        assert_eq!(ctx.mode_info("superuser"), UiMode::Basic.info());
        assert_eq!(ctx.current_info().icon, "💬");
    }
}
