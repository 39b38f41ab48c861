//! View models for the messages page.
//!
//! Handlers map entities into these flat structs so the template
//! never touches domain types directly.

use askama::Template;

use crate::message::entity::Message;
use crate::shared::flash::{Flash, FlashLevel};

/// The single page of the application: pending flash, the send form,
/// and every message newest-first.
#[derive(Template)]
#[template(path = "messages.html")]
pub struct MessagesPage {
    pub flash: Option<FlashView>,
    pub messages: Vec<MessageRow>,
}

impl MessagesPage {
    pub fn new(flash: Option<Flash>, messages: &[Message]) -> Self {
        Self {
            flash: flash.map(FlashView::from),
            messages: messages.iter().map(MessageRow::from).collect(),
        }
    }
}

/// A flash ready for rendering: severity resolved to a CSS class.
pub struct FlashView {
    pub css_class: &'static str,
    pub message: String,
}

impl From<Flash> for FlashView {
    fn from(flash: Flash) -> Self {
        let css_class = match flash.level {
            FlashLevel::Notice => "flash notice",
            FlashLevel::Error => "flash error",
        };
        Self {
            css_class,
            message: flash.message,
        }
    }
}

/// One list row.
pub struct MessageRow {
    pub body: String,
    pub sent_at: String,
}

impl From<&Message> for MessageRow {
    fn from(message: &Message) -> Self {
        Self {
            body: message.body.clone(),
            sent_at: message.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}
