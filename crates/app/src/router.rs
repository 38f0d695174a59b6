//! Which top-level view the current mode gets.

use shared::UiMode;

/// Arrangement of the chat view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatLayout {
    /// Thread and composer only
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Chat(ChatLayout),
    /// Tier not built yet; offers a way back to basic
    Placeholder(UiMode),
}

pub fn route(mode: UiMode) -> ActiveView {
    match mode {
        UiMode::Basic => ActiveView::Chat(ChatLayout::Simple),
        UiMode::Intermediate => ActiveView::Placeholder(UiMode::Intermediate),
        UiMode::Advanced => ActiveView::Placeholder(UiMode::Advanced),
    }
}
