pub mod chat;
pub mod mode_switcher;
pub mod placeholder;
