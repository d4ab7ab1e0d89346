//! Write requests accepted on `POST /`.

use serde::Deserialize;
use serde_json::Value;

use crate::app::{Result, StackdockError};

/// A write action, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum ActionRequest {
    #[serde(rename = "add")]
    Add {
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
    #[serde(rename = "markRead")]
    MarkRead { id: String },
    #[serde(rename = "delete")]
    Delete { id: String },
}

impl ActionRequest {
    pub const ACTIONS: [&'static str; 3] = ["add", "markRead", "delete"];

    /// Decodes a JSON body. An unrecognised `action` is reported as
    /// `InvalidAction`; anything else that doesn't fit as `InvalidRequest`.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;

        let action = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| StackdockError::InvalidRequest("missing field `action`".into()))?;

        if !Self::ACTIONS.contains(&action) {
            return Err(StackdockError::InvalidAction(action.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }
}
