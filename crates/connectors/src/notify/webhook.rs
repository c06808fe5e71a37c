use crate::{
    error::NotificationError,
    notify::{Notification, Notifier},
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Posts the notification as JSON to a mail relay or webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
    max_attempts: usize,
    initial_backoff: Duration,
}

impl WebhookNotifier {
    pub fn new(url: &str, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            auth_token,
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
        }
    }

    pub fn with_attempts(mut self, max_attempts: usize, initial_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.initial_backoff = initial_backoff;
        self
    }

    async fn post_once(&self, notification: &Notification) -> Result<(), NotificationError> {
        let mut request = self.client.post(&self.url).json(notification);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::Rejected(response.status().as_u16()))
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let mut backoff = self.initial_backoff;

        for attempt in 1..=self.max_attempts {
            match self.post_once(notification).await {
                Ok(()) => {
                    info!(to = %notification.to, attempt, "Notification delivered");
                    return Ok(());
                }
                Err(err) if err.is_permanent() => {
                    warn!(attempt, error = %err, "Notification rejected, not retrying");
                    return Err(err);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Notification attempt failed");
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(NotificationError::AttemptsExhausted(self.max_attempts))
    }

    fn name(&self) -> String {
        format!("webhook:{}", self.url)
    }
}
