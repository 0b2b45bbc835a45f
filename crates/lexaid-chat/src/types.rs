//! Transcript and wire types.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Transcript
// =============================================================================

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A citation backing an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier of the originating document.
    pub source: String,
    /// 1-based page number within the document.
    pub page: u32,
    /// Short quoted excerpt.
    pub snippet: String,
}

/// One transcript entry. Fully formed before it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    /// ISO-8601 instant.
    pub timestamp: String,
}

impl Message {
    /// A user question stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            timestamp: now_timestamp(),
        }
    }

    /// An assistant answer. Falls back to the current time when the service
    /// did not report one.
    pub fn assistant(
        content: impl Into<String>,
        sources: Vec<Source>,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            timestamp: timestamp.unwrap_or_else(now_timestamp),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Current UTC instant in RFC 3339 with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Wire types
// =============================================================================

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: u32,
}

/// Successful response from `POST /api/ask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Server-side processing time in seconds.
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// Response from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub documents_loaded: u64,
    pub model_ready: bool,
}

/// A document the service has ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    pub modified: String,
}

/// Response from `GET /api/documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<DocumentInfo>,
    #[serde(default)]
    pub total: usize,
}
