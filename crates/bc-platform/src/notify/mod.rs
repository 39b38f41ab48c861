//! Outbound notification: mailer abstraction and reminder fan-out.

pub mod dispatcher;
pub mod mailer;
