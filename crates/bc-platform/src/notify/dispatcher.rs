//! Reminder fan-out.
//!
//! Converts one persisted message into one outbound email per
//! recipient. Sends are independent: a provider failure for one
//! recipient never aborts the rest of the batch.

use std::sync::Arc;

use bc_config::NotifyConfig;
use tracing::{debug, warn};

use crate::message::entity::Message;
use crate::notify::mailer::{MailError, Mailer, ReminderEmail};

/// Prefix prepended to every outbound body.
const BODY_PREFIX: &str = "BC Racing: ";

/// Outcome of one recipient's send attempt.
#[derive(Debug)]
pub struct RecipientOutcome {
    pub recipient: String,
    pub result: Result<(), MailError>,
}

/// Per-recipient outcomes for a single dispatch.
///
/// The save pipeline treats dispatch as fire-and-forget; the report
/// exists for logging and for tests, not for control flow.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<RecipientOutcome>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn sent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Dispatcher owning the delivery configuration and the mailer seam.
///
/// Configuration is passed in at construction; nothing is read from
/// ambient global state.
pub struct ReminderDispatcher {
    mailer: Arc<dyn Mailer>,
    config: NotifyConfig,
}

impl ReminderDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, config: NotifyConfig) -> Self {
        Self { mailer, config }
    }

    /// Send one reminder per recipient of a persisted message.
    ///
    /// Failures are logged and recorded but do not stop the loop and
    /// are never surfaced to the submitting user.
    pub async fn dispatch(&self, message: &Message) -> DispatchReport {
        let mut report = DispatchReport::default();

        for recipient in &message.recipients {
            let email = self.build_reminder(recipient, &message.body);
            let result = self.mailer.send(&email).await;

            if let Err(ref e) = result {
                warn!(
                    message_id = message.id,
                    recipient = %recipient,
                    error = %e,
                    "Reminder delivery failed"
                );
            }

            report.outcomes.push(RecipientOutcome {
                recipient: recipient.clone(),
                result,
            });
        }

        debug!(
            message_id = message.id,
            attempted = report.attempted(),
            failed = report.failed(),
            "Dispatch complete"
        );
        report
    }

    fn build_reminder(&self, recipient: &str, body: &str) -> ReminderEmail {
        ReminderEmail {
            from: self.config.sender.clone(),
            to: recipient.to_string(),
            subject: String::new(),
            body: format!("{BODY_PREFIX}{body}"),
            message_id: format!("<{recipient}>"),
            reply_to: self.config.reply_to.clone(),
            tag: self.config.tag.clone(),
        }
    }
}
