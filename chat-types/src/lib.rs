//! Shared types between the chat widget and the chat back-end
//!
//! These types are used by both:
//! - the Dioxus widget (WASM)
//! - any native service that speaks the widget's HTTP contract
//!
//! Serializable with serde for JSON over HTTP

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Session
// ============================================================================

/// Opaque per-page-load client identifier.
///
/// Shaped `session-<unix-ms>-<suffix>`. Unique enough to correlate one
/// visitor's messages server-side; not a secret and not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(transparent)]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub struct SessionId(pub String);

const SESSION_SUFFIX_LEN: usize = 9;

impl SessionId {
    pub fn new() -> Self {
        Self::at(Utc::now().timestamp_millis())
    }

    /// Build an identifier for a given load timestamp with a fresh random suffix.
    pub fn at(timestamp_ms: i64) -> Self {
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "session-{timestamp_ms}-{}",
            &random[..SESSION_SUFFIX_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Chat endpoint
// ============================================================================

/// Body of `POST <chat_url>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub struct ChatRequest {
    pub message: String,
    pub session_id: SessionId,
    /// Set only on reachability probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub health_check: Option<bool>,
    /// Visitor details supplied by the host page, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub customer_info: Option<serde_json::Value>,
}

impl ChatRequest {
    pub fn message(text: impl Into<String>, session_id: &SessionId) -> Self {
        Self {
            message: text.into(),
            session_id: session_id.clone(),
            health_check: None,
            customer_info: None,
        }
    }

    /// Zero-length message flagged as a health check.
    pub fn probe(session_id: &SessionId) -> Self {
        Self {
            message: String::new(),
            session_id: session_id.clone(),
            health_check: Some(true),
            customer_info: None,
        }
    }

    pub fn with_customer_info(mut self, info: Option<serde_json::Value>) -> Self {
        self.customer_info = info;
        self
    }

    pub fn is_probe(&self) -> bool {
        self.health_check == Some(true)
    }
}

/// Body returned by the chat endpoint on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatReply {
    /// The reply text, if the server produced a non-empty one.
    pub fn text(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }
}

// ============================================================================
// Upload endpoint
// ============================================================================

/// Body returned by `POST <upload_url>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub struct UploadReply {
    pub file_id: String,
}

pub const UPLOAD_MARKER_PREFIX: &str = "[IMAGE_UPLOADED:";
const UPLOAD_MARKER_SUFFIX: &str = "]";

/// Chat message telling the back-end that `file_id` was uploaded for this session.
pub fn upload_marker(file_id: &str) -> String {
    format!("{UPLOAD_MARKER_PREFIX}{file_id}{UPLOAD_MARKER_SUFFIX}")
}

pub fn is_upload_marker(text: &str) -> bool {
    parse_upload_marker(text).is_some()
}

/// Extract the file id from an upload marker.
pub fn parse_upload_marker(text: &str) -> Option<&str> {
    text.strip_prefix(UPLOAD_MARKER_PREFIX)?
        .strip_suffix(UPLOAD_MARKER_SUFFIX)
        .filter(|file_id| !file_id.is_empty())
}

// ============================================================================
// Config endpoint
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub struct CompanyInfo {
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body returned by `GET <config_url>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub struct RemoteConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub company_info: CompanyInfo,
}

// ============================================================================
// UI State
// ============================================================================

/// Last known reachability of the chat endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Online,
    Offline,
}

impl ConnectionStatus {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Online => "We're Online",
            Self::Offline => "Offline",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Connecting => "#f59e0b",
            Self::Online => "#10b981",
            Self::Offline => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// Lifecycle of an optimistically rendered image upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export, export_to = "../../chat-widget/src/types/generated.ts")]
pub enum UploadState {
    Pending,
    Confirmed { file_id: String },
    Failed { reason: String },
}

impl UploadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

// ============================================================================
// Tests
// ============================================================================
