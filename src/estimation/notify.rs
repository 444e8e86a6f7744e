//! Operator notification - tells the agency a new estimate was produced.
//!
//! Delivery is fire-and-forget: `dispatch` spawns the send and hands back a
//! handle the caller may await (the CLI does, the HTTP server doesn't).
//! A failed send is logged and never reaches the submission caller.

use crate::estimation::types::PropertyDescriptor;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateNotification {
    pub submission_id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub property_descriptor: PropertyDescriptor,
    pub estimated_value: u64,
}

/// Transport for operator notifications (SMTP, queue, API...)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &EstimateNotification) -> Result<()>;
}

/// Stub transport: logs the payload instead of sending it
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &EstimateNotification) -> Result<()> {
        let payload = serde_json::to_string(notification)?;
        info!(
            "Email would be sent to {} ({}): {}",
            notification.recipient, notification.subject, payload
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Failed,
}

/// Pending notification. Dropping it leaves the send running detached.
pub struct NotificationHandle {
    task: JoinHandle<NotificationOutcome>,
}

impl NotificationHandle {
    /// Wait for the send to finish
    pub async fn wait(self) -> NotificationOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Notification task aborted: {}", e);
                NotificationOutcome::Failed
            }
        }
    }
}

/// Spawn the send on the runtime, inside the caller's span
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    notification: EstimateNotification,
) -> NotificationHandle {
    let task = tokio::spawn(
        async move {
            match notifier.notify(&notification).await {
                Ok(()) => {
                    info!("Notification sent to {}", notification.recipient);
                    NotificationOutcome::Delivered
                }
                Err(e) => {
                    warn!(
                        "Notification to {} failed: {:#}",
                        notification.recipient, e
                    );
                    NotificationOutcome::Failed
                }
            }
        }
        .in_current_span(),
    );

    NotificationHandle { task }
}
