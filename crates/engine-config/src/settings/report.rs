use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "Batch Processing for Contact Mask update";
pub const DEFAULT_SENDER: &str = "Batch Processing Module";
pub const DEFAULT_REPLY_TO: &str = "noreply@example.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Tracing,
    Webhook,
}

/// How the final report is titled and delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub job_name: String,
    pub subject: String,
    pub sender_display_name: String,
    pub reply_to: String,
    pub notifier: NotifierKind,
    pub webhook_url: Option<String>,
    /// Only ever taken from the environment.
    #[serde(skip)]
    pub auth_token: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            job_name: "ContactMaskJob".to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            sender_display_name: DEFAULT_SENDER.to_string(),
            reply_to: DEFAULT_REPLY_TO.to_string(),
            notifier: NotifierKind::Tracing,
            webhook_url: None,
            auth_token: None,
        }
    }
}
