//! HTTP handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::page::render_page;
use super::request::ActionRequest;
use super::response::Envelope;
use crate::app::{AppContext, Result, StackdockError};

/// Query parameters for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub format: Option<String>,
}

impl ListQuery {
    fn wants_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

/// `POST /`: decode the action and run it. Every outcome is an envelope
/// with HTTP 200.
pub async fn post_action(State(ctx): State<Arc<AppContext>>, body: Bytes) -> Envelope {
    let _guard = ctx.invocation().await;

    match dispatch(&ctx, &body).await {
        Ok(envelope) => envelope,
        Err(e) => {
            match &e {
                StackdockError::ArticleNotFound(_)
                | StackdockError::InvalidAction(_)
                | StackdockError::InvalidRequest(_) => tracing::warn!("Rejected action: {}", e),
                _ => tracing::error!("Action failed: {}", e),
            }
            Envelope::error(&e)
        }
    }
}

async fn dispatch(ctx: &AppContext, body: &[u8]) -> Result<Envelope> {
    match ActionRequest::decode(body)? {
        ActionRequest::Add { url, title } => {
            let article = ctx.repository.add(&url, title.as_deref()).await?;
            Ok(Envelope::added(article.id, article.title))
        }
        ActionRequest::MarkRead { id } => {
            ctx.repository.mark_read(&id)?;
            Ok(Envelope::success())
        }
        ActionRequest::Delete { id } => {
            ctx.repository.delete(&id)?;
            Ok(Envelope::success())
        }
    }
}

/// `GET /`: the listing as JSON with `?format=json`, otherwise as a page.
pub async fn list_articles(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let _guard = ctx.invocation().await;

    match ctx.repository.list() {
        Ok(articles) if query.wants_json() => Json(articles).into_response(),
        Ok(articles) => Html(render_page(&articles)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list articles: {}", e);
            if query.wants_json() {
                Envelope::error(&e).into_response()
            } else {
                let message = html_escape::encode_text(&e.to_string()).into_owned();
                (StatusCode::INTERNAL_SERVER_ERROR, Html(message)).into_response()
            }
        }
    }
}

/// `GET /health`
pub async fn health_check() -> &'static str {
    "OK"
}
