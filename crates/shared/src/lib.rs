pub mod chat;
pub mod ui_mode;

pub use chat::{ChatReply, Message, MessageId, ReplyId, Role};
pub use ui_mode::{FeatureFlags, ModeInfo, UiMode};

pub mod settings {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    /// Local Flask backend from the development setup
    pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5001";
    pub const DEFAULT_CONVERSATION_ID: &str = "default";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

    fn default_base_url() -> String {
        DEFAULT_API_BASE_URL.to_string()
    }

    fn default_conversation_id() -> String {
        DEFAULT_CONVERSATION_ID.to_string()
    }

    fn default_timeout() -> Option<u64> {
        Some(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    fn default_true() -> bool {
        true
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct AppSettings {
        /// Origin of the chat backend; requests go to `{api_base_url}/api/...`
        #[serde(default = "default_base_url")]
        pub api_base_url: String,
        /// `null` disables the timeout
        #[serde(default = "default_timeout")]
        pub request_timeout_secs: Option<u64>,
        #[serde(default = "default_conversation_id")]
        pub conversation_id: String,
        #[serde(default = "default_true")]
        pub dark_mode: bool,
    }

    impl AppSettings {
        pub fn request_timeout(&self) -> Option<Duration> {
            self.request_timeout_secs.map(Duration::from_secs)
        }
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                api_base_url: default_base_url(),
                request_timeout_secs: default_timeout(),
                conversation_id: default_conversation_id(),
                dark_mode: true,
            }
        }
    }

}
