//! Messages HTTP API
//!
//! Browser-facing routes for the message aggregate. The surface is a
//! classic form-post flow: redirect-after-success with a one-shot
//! flash cookie, direct re-render on failure.

use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, warn};

use crate::message::entity::MessageDraft;
use crate::message::repository::MessageRepository;
use crate::message::service::{MessageService, SaveError};
use crate::message::view::MessagesPage;
use crate::shared::error::Result;
use crate::shared::flash::{self, Flash};

/// Shared handler state.
#[derive(Clone)]
pub struct MessagesState {
    pub service: Arc<MessageService>,
    pub repo: Arc<MessageRepository>,
}

/// Build the message routes.
pub fn messages_router(state: MessagesState) -> Router {
    Router::new()
        .route("/", get(redirect_root))
        .route("/messages", get(list_messages))
        .route("/messages/create", post(create_message))
        .with_state(state)
}

/// Form payload. Field names keep the `message[...]` shape the form
/// submits, so the wire format matches the original pages.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(rename = "message[body]", default)]
    pub body: String,

    #[serde(rename = "message[code]", default)]
    pub code: String,
}

/// Plain 302 Found, the redirect the original pages used.
fn found(location: &'static str) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

/// GET / - the root only redirects to the list view.
async fn redirect_root() -> impl IntoResponse {
    found("/messages")
}

/// GET /messages - pending flash (consumed), the send form, and all
/// messages newest-first.
async fn list_messages(State(state): State<MessagesState>, jar: CookieJar) -> Result<Response> {
    let (jar, flash) = flash::take(jar);
    let messages = state.repo.list_recent().await?;
    let page = MessagesPage::new(flash, &messages);
    Ok((jar, Html(page.render()?)).into_response())
}

/// POST /messages/create - run the save pipeline.
///
/// Success redirects with a notice flash. Any failure re-renders the
/// list directly with an error banner; the user's input is discarded
/// and the user-facing message never says why the save failed.
async fn create_message(
    State(state): State<MessagesState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Result<Response> {
    let draft = MessageDraft::new(form.body, form.code);

    match state.service.create(draft).await {
        Ok(_) => {
            let jar = flash::set(jar, &Flash::notice("Messages sent"));
            Ok((jar, found("/messages")).into_response())
        }
        Err(SaveError::Validation(errors)) => {
            warn!(?errors, "Message rejected by validation");
            render_failure(&state, jar).await
        }
        Err(SaveError::Storage(e)) => {
            // Storage faults get a distinct, louder log line even
            // though the page shows the same unified banner.
            error!(error = %e, "Message save failed in storage");
            render_failure(&state, jar).await
        }
    }
}

async fn render_failure(state: &MessagesState, jar: CookieJar) -> Result<Response> {
    let messages = state.repo.list_recent().await?;
    let page = MessagesPage::new(Some(Flash::error("Message failed to send")), &messages);
    Ok((jar, Html(page.render()?)).into_response())
}
