//! The result envelope returned by every write action.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::app::StackdockError;

/// `{"status":"success", ...}` or `{"status":"error","message":...}`.
/// Always sent with HTTP 200; the status field carries the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Error {
        message: String,
    },
}

impl Envelope {
    pub fn success() -> Self {
        Envelope::Success {
            id: None,
            title: None,
        }
    }

    pub fn added(id: String, title: String) -> Self {
        Envelope::Success {
            id: Some(id),
            title: Some(title),
        }
    }

    pub fn error(err: &StackdockError) -> Self {
        Envelope::Error {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
