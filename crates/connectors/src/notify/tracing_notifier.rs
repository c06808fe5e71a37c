use crate::{
    error::NotificationError,
    notify::{Notification, Notifier},
};
use async_trait::async_trait;
use tracing::info;

/// Logs the notification instead of delivering it. Used when no delivery
/// endpoint is configured.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        info!(
            to = %notification.to,
            subject = %notification.subject,
            "Notification (not delivered, no endpoint configured):\n{}",
            notification.body
        );
        Ok(())
    }

    fn name(&self) -> String {
        "tracing".into()
    }
}
