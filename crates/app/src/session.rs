//! The conversation thread and its send cycle.
//!
//! `Idle -> Sending -> Idle`. The pending result receiver doubles as the
//! "one request in flight" guard: while it exists, `send` refuses.

use chrono::Utc;
use providers::{ApiError, ChatBackend};
use shared::{ChatReply, Message, Role};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;

pub const GREETING: &str = "Hello! How can I assist you today?";

/// Shown for every failed send, whatever the cause
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting to the server right now. Please try again in a moment.";

type SendOutcome = Result<ChatReply, ApiError>;
type HistoryOutcome = Result<Vec<Message>, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    pending: Option<Receiver<SendOutcome>>,
    history: Option<Receiver<HistoryOutcome>>,
    backend: Arc<dyn ChatBackend>,
    runtime: Handle,
    last_local_id: i64,
    scroll_to_bottom: bool,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>, runtime: Handle) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            input: String::new(),
            pending: None,
            history: None,
            backend,
            runtime,
            last_local_id: 0,
            scroll_to_bottom: false,
        };
        session.push_local(Role::Assistant, GREETING);
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Composer text, edited in place by the view
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn state(&self) -> SendState {
        if self.pending.is_some() {
            SendState::Sending
        } else {
            SendState::Idle
        }
    }

    pub fn is_sending(&self) -> bool {
        self.state() == SendState::Sending
    }

    /// Whether the send control should be enabled
    pub fn can_send(&self) -> bool {
        !self.is_sending() && !self.input.trim().is_empty()
    }

    pub fn is_loading_history(&self) -> bool {
        self.history.is_some()
    }

    /// Fetch earlier messages of the conversation in the background. They
    /// land right after the greeting, ahead of anything sent meanwhile.
    pub fn load_history(&mut self) {
        let (tx, rx) = channel();
        let backend = Arc::clone(&self.backend);
        self.runtime.spawn(async move {
            let _ = tx.send(backend.history().await);
        });
        self.history = Some(rx);
    }

    /// Start a send with the current composer text.
    ///
    /// The user's message is appended right away and stays in the thread
    /// whatever the outcome. Returns false when nothing was sent.
    pub fn send(&mut self) -> bool {
        if self.is_sending() {
            tracing::debug!("send ignored, a request is already in flight");
            return false;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return false;
        }

        self.push_local(Role::User, text.clone());
        self.input.clear();

        let (tx, rx) = channel();
        let backend = Arc::clone(&self.backend);
        self.runtime.spawn(async move {
            let outcome = backend.send_message(&text).await;
            // Receiver gone means the session was dropped; nothing to report to.
            let _ = tx.send(outcome);
        });
        self.pending = Some(rx);
        true
    }

    /// Non-blocking check for history and the in-flight reply. Returns true
    /// if the thread changed.
    pub fn poll(&mut self) -> bool {
        let seeded = self.poll_history();
        let replied = self.poll_reply();
        seeded || replied
    }

    fn poll_history(&mut self) -> bool {
        let Some(rx) = &self.history else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ApiError::Network {
                message: "history task ended without a result".to_string(),
            }),
        };
        self.history = None;
        match outcome {
            Ok(earlier) if earlier.is_empty() => false,
            Ok(earlier) => {
                tracing::info!("restored {} earlier messages", earlier.len());
                let at = self.messages.len().min(1);
                self.messages.splice(at..at, earlier);
                self.scroll_to_bottom = true;
                true
            }
            Err(e) => {
                tracing::warn!("could not load conversation history ({}): {}", e.kind(), e);
                false
            }
        }
    }

    fn poll_reply(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ApiError::Network {
                message: "request task ended without a result".to_string(),
            }),
        };
        self.pending = None;
        self.finish(outcome);
        true
    }

    /// True once after each thread change; the view scrolls to the end
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    fn finish(&mut self, outcome: SendOutcome) {
        match outcome {
            Ok(reply) => {
                tracing::info!("reply {} received", reply.id);
                self.push(Message::from(reply));
            }
            Err(e) => {
                tracing::warn!("chat request failed ({}): {}", e.kind(), e);
                self.push_local(Role::Assistant, FALLBACK_REPLY);
            }
        }
    }

    fn push_local(&mut self, role: Role, content: impl Into<String>) {
        let id = self.next_local_id();
        self.push(Message::local(id, role, content));
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_to_bottom = true;
    }

    /// Wall-clock milliseconds, bumped when two messages share a millisecond
    fn next_local_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_local_id = now.max(self.last_local_id + 1);
        self.last_local_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use providers::chat::parse_chat_response;
    use serde_json::json;
    use shared::{MessageId, ReplyId};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tokio::runtime::Runtime;
    use tokio::sync::Notify;

    struct FakeBackend {
        outcome: SendOutcome,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl FakeBackend {
        fn new(outcome: SendOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(outcome: SendOutcome, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn send_message(&self, _message: &str) -> Result<ChatReply, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcome.clone()
        }
    }

    struct PanickingBackend;

    #[async_trait]
    impl ChatBackend for PanickingBackend {
        async fn send_message(&self, _message: &str) -> Result<ChatReply, ApiError> {
            panic!("backend blew up");
        }
    }

    struct HistoryBackend {
        earlier: HistoryOutcome,
    }

    #[async_trait]
    impl ChatBackend for HistoryBackend {
        async fn send_message(&self, _message: &str) -> Result<ChatReply, ApiError> {
            hi_reply()
        }

        async fn history(&self) -> Result<Vec<Message>, ApiError> {
            self.earlier.clone()
        }
    }

    fn earlier(id: &str, role: Role, content: &str) -> Message {
        Message {
            id: MessageId::Server(ReplyId::Text(id.to_string())),
            role,
            content: content.to_string(),
            created_at: Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap(),
        }
    }

    fn wait_for_history(session: &mut ChatSession) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.is_loading_history() {
            assert!(Instant::now() < deadline, "history never arrived");
            session.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn hi_reply() -> SendOutcome {
        Ok(ChatReply {
            id: ReplyId::Number(7i64.into()),
            content: "Hi".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
    }

    fn wait_for_reply(session: &mut ChatSession) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if session.poll() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("no reply within deadline");
    }

    fn session_with(backend: Arc<dyn ChatBackend>, rt: &Runtime) -> ChatSession {
        ChatSession::new(backend, rt.handle().clone())
    }

    #[test]
    fn test_starts_with_greeting_and_idle() {
        let rt = Runtime::new().unwrap();
        let session = session_with(FakeBackend::new(hi_reply()), &rt);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, GREETING);
        assert_eq!(session.state(), SendState::Idle);
        assert!(!session.can_send());
    }

    #[test]
    fn test_blank_input_sends_nothing() {
        let rt = Runtime::new().unwrap();
        let backend = FakeBackend::new(hi_reply());
        let mut session = session_with(backend.clone(), &rt);

        for blank in ["", "   ", "\n\t "] {
            *session.input_mut() = blank.to_string();
            assert!(!session.can_send());
            assert!(!session.send());
        }
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.state(), SendState::Idle);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn test_successful_reply_appends_one_assistant_message() {
        let rt = Runtime::new().unwrap();
        let backend = FakeBackend::new(hi_reply());
        let mut session = session_with(backend.clone(), &rt);

        *session.input_mut() = "  hello  ".to_string();
        assert!(session.send());
        assert_eq!(session.state(), SendState::Sending);
        assert_eq!(session.input(), "");
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, "hello");
        assert!(session.messages()[1].is_user());

        wait_for_reply(&mut session);
        assert_eq!(session.state(), SendState::Idle);
        assert_eq!(session.messages().len(), 3);
        let reply = &session.messages()[2];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "Hi");
        assert_eq!(reply.id, MessageId::Server(ReplyId::Number(7i64.into())));
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_network_failure_appends_fallback_and_keeps_user_message() {
        let rt = Runtime::new().unwrap();
        let backend = FakeBackend::new(Err(ApiError::Network {
            message: "connection refused".into(),
        }));
        let mut session = session_with(backend, &rt);

        *session.input_mut() = "are you there?".to_string();
        session.send();
        wait_for_reply(&mut session);

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "are you there?");
        assert_eq!(messages[2].content, FALLBACK_REPLY);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(session.state(), SendState::Idle);

        *session.input_mut() = "retry".to_string();
        assert!(session.can_send());
    }

    #[test]
    fn test_unsuccessful_body_is_handled_like_a_network_failure() {
        let rt = Runtime::new().unwrap();
        let outcome = parse_chat_response(&json!({"success": false}));
        let mut session = session_with(FakeBackend::new(outcome), &rt);

        *session.input_mut() = "hello".to_string();
        session.send();
        wait_for_reply(&mut session);

        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].content, FALLBACK_REPLY);
    }

    #[test]
    fn test_status_error_uses_same_fallback() {
        let rt = Runtime::new().unwrap();
        let backend = FakeBackend::new(Err(ApiError::Status {
            status: 502,
            status_text: "Bad Gateway".into(),
        }));
        let mut session = session_with(backend, &rt);
        *session.input_mut() = "hello".to_string();
        session.send();
        wait_for_reply(&mut session);
        assert_eq!(session.messages().last().unwrap().content, FALLBACK_REPLY);
    }

    #[test]
    fn test_second_send_while_sending_is_ignored() {
        let rt = Runtime::new().unwrap();
        let gate = Arc::new(Notify::new());
        let backend = FakeBackend::gated(hi_reply(), gate.clone());
        let mut session = session_with(backend.clone(), &rt);

        *session.input_mut() = "first".to_string();
        assert!(session.send());

        *session.input_mut() = "second".to_string();
        assert!(!session.can_send());
        assert!(!session.send());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.input(), "second");
        assert!(!session.poll());

        gate.notify_one();
        wait_for_reply(&mut session);

        assert_eq!(backend.calls(), 1);
        let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec![GREETING, "first", "Hi"]);
    }

    #[test]
    fn test_vanished_request_task_falls_back() {
        let rt = Runtime::new().unwrap();
        let mut session = session_with(Arc::new(PanickingBackend), &rt);
        *session.input_mut() = "hello".to_string();
        session.send();
        wait_for_reply(&mut session);
        assert_eq!(session.messages().last().unwrap().content, FALLBACK_REPLY);
        assert_eq!(session.state(), SendState::Idle);
    }

    #[test]
    fn test_local_ids_are_unique_and_scroll_requested() {
        let rt = Runtime::new().unwrap();
        let mut session = session_with(
            FakeBackend::new(Err(ApiError::malformed("nope"))),
            &rt,
        );
        assert!(session.take_scroll_request());
        assert!(!session.take_scroll_request());

        for i in 0..3 {
            *session.input_mut() = format!("msg {i}");
            session.send();
            assert!(session.take_scroll_request());
            wait_for_reply(&mut session);
            assert!(session.take_scroll_request());
        }

        let ids: HashSet<&MessageId> = session.messages().iter().map(|m| &m.id).collect();
        assert_eq!(ids.len(), session.messages().len());
    }

    #[test]
    fn test_history_lands_after_greeting_and_before_new_messages() {
        let rt = Runtime::new().unwrap();
        let backend = Arc::new(HistoryBackend {
            earlier: Ok(vec![
                earlier("u1", Role::User, "old question"),
                earlier("a1", Role::Assistant, "old answer"),
            ]),
        });
        let mut session = session_with(backend, &rt);
        session.load_history();
        wait_for_history(&mut session);

        *session.input_mut() = "new question".to_string();
        session.send();
        wait_for_reply(&mut session);

        let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![GREETING, "old question", "old answer", "new question", "Hi"]
        );
    }

    #[test]
    fn test_history_failure_leaves_thread_untouched() {
        let rt = Runtime::new().unwrap();
        let backend = Arc::new(HistoryBackend {
            earlier: Err(ApiError::Network {
                message: "refused".into(),
            }),
        });
        let mut session = session_with(backend, &rt);
        session.load_history();
        wait_for_history(&mut session);

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.state(), SendState::Idle);
    }

    #[test]
    fn test_backend_without_history_keeps_greeting_only() {
        let rt = Runtime::new().unwrap();
        let mut session = session_with(FakeBackend::new(hi_reply()), &rt);
        session.load_history();
        wait_for_history(&mut session);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, GREETING);
    }
}
