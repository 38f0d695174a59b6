//! Local state services: durable preferences and the UI mode context.

pub mod mode_store;
pub mod storage;
pub mod ui_context;

pub use mode_store::ModeStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use ui_context::UiContext;
