//! BC Racing message blast platform
//!
//! A single-aggregate web application: a short message is submitted
//! through a form, gated by a shared access code, persisted, and
//! fanned out as one email per configured recipient through an
//! email-to-SMS gateway.
//!
//! ## Module Organization (Aggregate-based)
//!
//! - `message` - the Message aggregate: `entity`, `repository`,
//!   `service` (the save pipeline), `api` (HTTP handlers + view)
//! - `notify` - outbound email: `Mailer` trait, SMTP implementation,
//!   per-recipient fan-out dispatcher
//! - `shared` - error types and the one-shot flash cookie

pub mod message;
pub mod notify;
pub mod shared;

// Re-export common types from shared
pub use shared::error::{AppError, Result};
pub use shared::flash::{Flash, FlashLevel};

// Re-export main entity types for convenience
pub use message::entity::{validate, Message, MessageDraft, ValidationError};
pub use message::repository::MessageRepository;
pub use message::service::{MessageService, SaveError};
pub use message::api::{messages_router, MessagesState};

// Re-export notification types
pub use notify::dispatcher::{DispatchReport, ReminderDispatcher};
pub use notify::mailer::{MailError, Mailer, ReminderEmail, SmtpMailer};
