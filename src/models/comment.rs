//! Comment and correspondence bodies for the RT API.

use serde::Serialize;

/// A message added to a ticket, either as an internal comment or as
/// correspondence sent to the requestors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    /// Message body.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// MIME type of the body (e.g. "text/plain", "text/html").
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
}

impl Comment {
    /// Creates a plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: "text/plain".to_string(),
        }
    }

    /// Creates an HTML message.
    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: "text/html".to_string(),
        }
    }
}
