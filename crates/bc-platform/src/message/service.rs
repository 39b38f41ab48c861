//! Message save pipeline.
//!
//! One explicit, ordered operation: validate, assign recipients,
//! persist, dispatch. The ordering that the original system hid in
//! lifecycle callbacks is spelled out here so it can be tested.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::message::entity::{validate, Message, MessageDraft, ValidationError};
use crate::message::repository::MessageRepository;
use crate::notify::dispatcher::ReminderDispatcher;
use crate::shared::error::AppError;

/// Why a save attempt did not produce a persisted message.
///
/// Validation and storage faults are distinct so callers can log
/// them differently even when the user-facing message is unified.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// Owns the full lifecycle of a message: no other component persists
/// or mutates one.
pub struct MessageService {
    repo: Arc<MessageRepository>,
    dispatcher: Arc<ReminderDispatcher>,
    recipients: Vec<String>,
}

impl MessageService {
    pub fn new(
        repo: Arc<MessageRepository>,
        dispatcher: Arc<ReminderDispatcher>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            recipients,
        }
    }

    /// Run a single save attempt to a terminal state.
    ///
    /// Received -> Validating -> {Rejected | Persisting ->
    /// Dispatching -> Completed}. Rejected attempts touch neither
    /// storage nor the mailer. Dispatch runs synchronously on the
    /// persisted record and its outcome never changes the result.
    pub async fn create(&self, draft: MessageDraft) -> Result<Message, SaveError> {
        validate(&draft.body, &draft.code).map_err(SaveError::Validation)?;

        // The system decides recipients; whatever came in with the
        // draft is discarded.
        let message = self
            .repo
            .insert(&draft.body, &draft.code, &self.recipients)
            .await?;

        let report = self.dispatcher.dispatch(&message).await;
        info!(
            message_id = message.id,
            recipients = report.attempted(),
            failed = report.failed(),
            "Message saved"
        );

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::mailer::{MailError, Mailer, ReminderEmail};
    use async_trait::async_trait;
    use bc_config::NotifyConfig;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingMailer {
        sends: AtomicUsize,
        fail: bool,
    }

    impl CountingMailer {
        fn new(fail: bool) -> Self {
            Self {
                sends: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl Mailer for CountingMailer {
        async fn send(&self, _email: &ReminderEmail) -> Result<(), MailError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(MailError::Smtp("provider down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    async fn service_with(
        recipients: Vec<String>,
        mailer: Arc<CountingMailer>,
    ) -> (MessageService, Arc<MessageRepository>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = Arc::new(MessageRepository::new(pool));
        repo.init_schema().await.unwrap();

        let dispatcher = Arc::new(ReminderDispatcher::new(mailer, NotifyConfig::default()));
        let service = MessageService::new(repo.clone(), dispatcher, recipients);
        (service, repo)
    }

    #[tokio::test]
    async fn valid_draft_persists_and_dispatches() {
        let mailer = Arc::new(CountingMailer::new(false));
        let recipients = vec!["a@txt.net".to_string(), "b@txt.net".to_string()];
        let (service, repo) = service_with(recipients.clone(), mailer.clone()).await;

        let message = service
            .create(MessageDraft::new("hello", "landspeeder"))
            .await
            .unwrap();

        assert_eq!(message.recipients, recipients);
        assert_eq!(repo.count_all().await.unwrap(), 1);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn caller_supplied_recipients_are_discarded() {
        let mailer = Arc::new(CountingMailer::new(false));
        let (service, _) = service_with(vec!["real@txt.net".to_string()], mailer).await;

        let mut draft = MessageDraft::new("hello", "landspeeder");
        draft.recipients = vec!["attacker@evil.example".to_string()];

        let message = service.create(draft).await.unwrap();
        assert_eq!(message.recipients, vec!["real@txt.net".to_string()]);
    }

    #[tokio::test]
    async fn rejected_draft_touches_nothing() {
        let mailer = Arc::new(CountingMailer::new(false));
        let (service, repo) = service_with(vec!["a@txt.net".to_string()], mailer.clone()).await;

        let err = service
            .create(MessageDraft::new("", "wrong"))
            .await
            .unwrap_err();

        match err {
            SaveError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.count_all().await.unwrap(), 0);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dispatch_failure_does_not_fail_the_save() {
        let mailer = Arc::new(CountingMailer::new(true));
        let (service, repo) = service_with(vec!["a@txt.net".to_string()], mailer.clone()).await;

        let message = service
            .create(MessageDraft::new("hello", "landspeeder"))
            .await
            .unwrap();

        assert_eq!(message.body, "hello");
        assert_eq!(repo.count_all().await.unwrap(), 1);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
    }
}
