//! UI feature tiers and the static tables derived from them.
//!
//! Every lookup here is an exhaustive match on [`UiMode`], so adding a tier
//! fails to compile until its flags and display info are filled in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named UI feature tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    /// Plain chat, nothing else
    #[default]
    Basic,
    /// Business tools tier
    Intermediate,
    /// Everything switched on
    Advanced,
}

impl UiMode {
    pub fn all() -> &'static [UiMode] {
        &[UiMode::Basic, UiMode::Intermediate, UiMode::Advanced]
    }

    /// Stable string used for persistence
    pub fn as_str(&self) -> &'static str {
        match self {
            UiMode::Basic => "basic",
            UiMode::Intermediate => "intermediate",
            UiMode::Advanced => "advanced",
        }
    }

    pub fn feature_flags(&self) -> &'static FeatureFlags {
        match self {
            UiMode::Basic => &BASIC_FLAGS,
            UiMode::Intermediate => &INTERMEDIATE_FLAGS,
            UiMode::Advanced => &ADVANCED_FLAGS,
        }
    }

    pub fn info(&self) -> ModeInfo {
        match self {
            UiMode::Basic => ModeInfo {
                name: "Simple Chat",
                description: "Clean, simple interface for quick conversations",
                icon: "💬",
            },
            UiMode::Intermediate => ModeInfo {
                name: "Business Tools",
                description: "Enhanced features for small businesses",
                icon: "🔧",
            },
            UiMode::Advanced => ModeInfo {
                name: "Power User",
                description: "Full feature set for developers and experts",
                icon: "⚡",
            },
        }
    }

    /// Display info for a raw mode string. Unknown strings get basic's info.
    pub fn info_for(raw: &str) -> ModeInfo {
        raw.parse::<UiMode>().unwrap_or_default().info()
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known tiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ui mode: {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for UiMode {
    type Err = UnknownMode;

    /// Exact, case-sensitive match on the persisted spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(UiMode::Basic),
            "intermediate" => Ok(UiMode::Intermediate),
            "advanced" => Ok(UiMode::Advanced),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Name, blurb and glyph shown in the mode switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Toggles derived solely from the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub show_sidebar: bool,
    pub show_tools_panel: bool,
    pub show_agent_selector: bool,
    pub show_advanced_settings: bool,
    pub show_memory_view: bool,
    pub show_workflow_builder: bool,
    pub show_debug_panel: bool,
    /// Declared per tier; the session does not trim to it.
    pub max_chat_history: usize,
}

impl FeatureFlags {
    /// Human-readable names of the panels this tier turns on
    pub fn enabled_panels(&self) -> Vec<&'static str> {
        [
            (self.show_sidebar, "Sidebar"),
            (self.show_tools_panel, "Tools panel"),
            (self.show_agent_selector, "Agent selector"),
            (self.show_advanced_settings, "Advanced settings"),
            (self.show_memory_view, "Memory view"),
            (self.show_workflow_builder, "Workflow builder"),
            (self.show_debug_panel, "Debug panel"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

const BASIC_FLAGS: FeatureFlags = FeatureFlags {
    show_sidebar: false,
    show_tools_panel: false,
    show_agent_selector: false,
    show_advanced_settings: false,
    show_memory_view: false,
    show_workflow_builder: false,
    show_debug_panel: false,
    max_chat_history: 50,
};

const INTERMEDIATE_FLAGS: FeatureFlags = FeatureFlags {
    show_sidebar: true,
    show_tools_panel: true,
    show_agent_selector: true,
    show_advanced_settings: false,
    show_memory_view: false,
    show_workflow_builder: false,
    show_debug_panel: false,
    max_chat_history: 100,
};

const ADVANCED_FLAGS: FeatureFlags = FeatureFlags {
    show_sidebar: true,
    show_tools_panel: true,
    show_agent_selector: true,
    show_advanced_settings: true,
    show_memory_view: true,
    show_workflow_builder: true,
    show_debug_panel: true,
    max_chat_history: 500,
};
