use serde::{Deserialize, Serialize};

use crate::service::{Action, Reply};
use crate::utils::error::ServiceError;

/// Frames sent by a client.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Must be the first frame on a connection.
    #[serde(rename = "hello")]
    Hello {
        user_id: String,
        #[serde(default)]
        display_name: Option<String>,
    },

    #[serde(rename = "action")]
    Action { action: Action },
}

/// Frames sent by the server.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "welcome")]
    Welcome { user_id: String, is_admin: bool },

    #[serde(rename = "reply")]
    Reply { reply: serde_json::Value },

    #[serde(rename = "error")]
    Error {
        kind: String,
        message: String,
        #[serde(default)]
        retryable: bool,
    },
}

impl ServerMessage {
    pub fn reply(reply: &Reply) -> Result<Self, serde_json::Error> {
        Ok(ServerMessage::Reply {
            reply: serde_json::to_value(reply)?,
        })
    }

    pub fn error(kind: &str, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            kind: kind.to_string(),
            message: message.into(),
            retryable: false,
        }
    }

    /// Maps a handler error to a frame. Persistence failures are reported as
    /// retryable internal errors without their details.
    pub fn from_service_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::Store(e) if e.is_retryable() => ServerMessage::Error {
                kind: e.kind().to_string(),
                message: "internal error, please try again".to_string(),
                retryable: true,
            },
            other => ServerMessage::error(other.kind(), other.to_string()),
        }
    }
}
