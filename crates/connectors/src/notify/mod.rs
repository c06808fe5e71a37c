use crate::error::NotificationError;
use async_trait::async_trait;
use serde::Serialize;

pub mod tracing_notifier;
pub mod webhook;

/// A plain-text message for one recipient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
    pub sender_display_name: Option<String>,
}

/// Delivers the final job report.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;

    fn name(&self) -> String;
}
