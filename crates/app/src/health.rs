//! One-shot backend health probe shown as a badge in the header.

use eframe::egui::Color32;
use providers::{ApiError, ChatClient};
use shared::chat::HealthStatus;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Checking,
    Online { version: Option<String> },
    Degraded(String),
    Offline,
}

impl ServerStatus {
    pub fn from_result(result: &Result<HealthStatus, ApiError>) -> Self {
        match result {
            Ok(health) if health.is_healthy() => ServerStatus::Online {
                version: health.version.clone(),
            },
            Ok(health) => ServerStatus::Degraded(health.status.clone()),
            Err(_) => ServerStatus::Offline,
        }
    }

    pub fn label(&self) -> (String, Color32) {
        match self {
            ServerStatus::Checking => ("Checking server...".to_string(), Color32::YELLOW),
            ServerStatus::Online { version: Some(v) } => {
                (format!("Online (v{v})"), Color32::LIGHT_GREEN)
            }
            ServerStatus::Online { version: None } => ("Online".to_string(), Color32::LIGHT_GREEN),
            ServerStatus::Degraded(status) => (format!("Server {status}"), Color32::YELLOW),
            ServerStatus::Offline => ("Offline".to_string(), Color32::GRAY),
        }
    }
}

type HealthOutcome = Result<HealthStatus, ApiError>;

pub struct HealthProbe {
    rx: Option<Receiver<HealthOutcome>>,
    status: ServerStatus,
}

impl HealthProbe {
    pub fn start(client: Arc<ChatClient>, runtime: &Handle) -> Self {
        let (tx, rx) = channel();
        runtime.spawn(async move {
            let _ = tx.send(client.health().await);
        });
        Self::waiting_on(rx)
    }

    fn waiting_on(rx: Receiver<HealthOutcome>) -> Self {
        Self {
            rx: Some(rx),
            status: ServerStatus::Checking,
        }
    }

    pub fn status(&self) -> &ServerStatus {
        &self.status
    }

    pub fn is_checking(&self) -> bool {
        self.status == ServerStatus::Checking
    }

    pub fn poll(&mut self) {
        let Some(rx) = &self.rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(ApiError::Network {
                message: "health task ended without a result".to_string(),
            }),
        };
        match &result {
            Ok(health) => tracing::info!("backend health: {}", health.status),
            Err(e) => tracing::warn!("backend health check failed: {}", e),
        }
        self.status = ServerStatus::from_result(&result);
        self.rx = None;
    }
}
