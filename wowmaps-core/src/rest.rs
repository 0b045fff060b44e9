//! Plain HTTP call description shared by the catalog and assistant clients.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One JSON request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestCall {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

/// Status plus raw response text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestReply {
    pub status: u16,
    pub body: String,
}

impl RestReply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body parsed as JSON; an empty body reads as an empty object.
    ///
    /// # Errors
    /// Returns the parse error when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        if self.body.trim().is_empty() {
            Ok(Value::Object(serde_json::Map::new()))
        } else {
            serde_json::from_str(&self.body)
        }
    }

    /// `error.message` from a Google-style error body, else the raw body,
    /// else the bare status.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.json()
            .ok()
            .as_ref()
            .and_then(|v| v.pointer("/error/message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                if self.body.trim().is_empty() {
                    format!("HTTP {}", self.status)
                } else {
                    self.body.clone()
                }
            })
    }
}

/// The request never produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

#[async_trait::async_trait(?Send)]
pub trait RestTransport {
    /// # Errors
    /// Returns an error when no HTTP reply was received.
    async fn execute(&self, call: RestCall) -> Result<RestReply, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_classifies_status_and_extracts_message() {
        let ok = RestReply {
            status: 204,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.json().unwrap(), json!({}));

        let denied = RestReply {
            status: 403,
            body: json!({"error": {"code": 403, "message": "PERMISSION_DENIED"}}).to_string(),
        };
        assert!(!denied.is_success());
        assert_eq!(denied.error_message(), "PERMISSION_DENIED");

        let bare = RestReply {
            status: 502,
            body: String::new(),
        };
        assert_eq!(bare.error_message(), "HTTP 502");
        let text = RestReply {
            status: 500,
            body: "upstream timeout".into(),
        };
        assert_eq!(text.error_message(), "upstream timeout");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }
}
