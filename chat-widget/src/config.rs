use chat_types::CompanyInfo;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub const DEFAULT_CHAT_URL: &str = "https://paperbagglue-chat.onrender.com/api/chat";
pub const WIDGET_ROOT_ID: &str = "chat-widget-container";

/// Name of the optional `window` property the host page sets to override defaults.
pub const HOST_CONFIG_GLOBAL: &str = "CHAT_WIDGET_CONFIG";

pub const REQUEST_TIMEOUT_MS: u32 = 10_000;
pub const KEEPALIVE_INTERVAL_MS: u32 = 5 * 60 * 1000;
pub const AUTO_OPEN_DELAY_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub chat_url: String,
    pub upload_url: String,
    pub config_url: String,
    /// Reserved id of the element the widget mounts into.
    pub root_id: String,
    pub request_timeout_ms: u32,
    pub keepalive_interval_ms: u32,
    /// `None` disables auto-open.
    pub auto_open_delay_ms: Option<u32>,
    pub agent_name: String,
    pub logo_url: String,
    pub whatsapp: String,
    pub email: String,
    pub customer_info: Option<serde_json::Value>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            upload_url: sibling_endpoint(DEFAULT_CHAT_URL, "upload"),
            config_url: sibling_endpoint(DEFAULT_CHAT_URL, "config"),
            root_id: WIDGET_ROOT_ID.to_string(),
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            keepalive_interval_ms: KEEPALIVE_INTERVAL_MS,
            auto_open_delay_ms: Some(AUTO_OPEN_DELAY_MS),
            agent_name: "Larry Chen".to_string(),
            logo_url: "https://paperbagglue.com/wp-content/uploads/2025/01/logo.png".to_string(),
            whatsapp: "+8613323273311".to_string(),
            email: "LarryChen@paperbagglue.com".to_string(),
            customer_info: None,
        }
    }
}

/// Host-supplied overrides, keyed the way a page script would write them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub chat_url: Option<String>,
    pub upload_url: Option<String>,
    pub config_url: Option<String>,
    pub root_id: Option<String>,
    pub request_timeout_ms: Option<u32>,
    pub keepalive_interval_ms: Option<u32>,
    pub auto_open: Option<bool>,
    pub auto_open_delay_ms: Option<u32>,
    pub agent_name: Option<String>,
    pub logo_url: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub customer_info: Option<serde_json::Value>,
}

impl WidgetConfig {
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(chat_url) = overrides.chat_url {
            // Sibling endpoints follow the chat URL unless given explicitly.
            self.upload_url = sibling_endpoint(&chat_url, "upload");
            self.config_url = sibling_endpoint(&chat_url, "config");
            self.chat_url = chat_url;
        }
        if let Some(upload_url) = overrides.upload_url {
            self.upload_url = upload_url;
        }
        if let Some(config_url) = overrides.config_url {
            self.config_url = config_url;
        }
        if let Some(root_id) = overrides.root_id.filter(|id| !id.trim().is_empty()) {
            self.root_id = root_id;
        }
        if let Some(ms) = overrides.request_timeout_ms.filter(|ms| *ms > 0) {
            self.request_timeout_ms = ms;
        }
        if let Some(ms) = overrides.keepalive_interval_ms.filter(|ms| *ms > 0) {
            self.keepalive_interval_ms = ms;
        }
        if let Some(ms) = overrides.auto_open_delay_ms {
            self.auto_open_delay_ms = Some(ms);
        }
        if overrides.auto_open == Some(false) {
            self.auto_open_delay_ms = None;
        }
        if let Some(agent_name) = overrides.agent_name {
            self.agent_name = agent_name;
        }
        if let Some(logo_url) = overrides.logo_url {
            self.logo_url = logo_url;
        }
        if let Some(whatsapp) = overrides.whatsapp {
            self.whatsapp = whatsapp;
        }
        if let Some(email) = overrides.email {
            self.email = email;
        }
        if overrides.customer_info.is_some() {
            self.customer_info = overrides.customer_info;
        }
        self
    }

    pub fn from_overrides_json(json: &str) -> Result<Self, String> {
        let overrides: ConfigOverrides =
            serde_json::from_str(json).map_err(|e| format!("Invalid widget config: {e}"))?;
        Ok(Self::default().with_overrides(overrides))
    }

    /// Read `window.CHAT_WIDGET_CONFIG`, falling back to defaults when absent or invalid.
    pub fn from_host_page() -> Self {
        match read_host_overrides() {
            Ok(Some(json)) => Self::from_overrides_json(&json).unwrap_or_else(|e| {
                log::warn!("{e}; using defaults");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Failed to read host widget config: {e}");
                Self::default()
            }
        }
    }

    /// Fallback bubble shown when the chat endpoint cannot answer.
    ///
    /// Remote company info, when fetched, wins over the compiled-in contacts.
    pub fn fallback_message(&self, company: Option<&CompanyInfo>) -> String {
        let whatsapp = company
            .and_then(|info| info.whatsapp.as_deref())
            .unwrap_or(&self.whatsapp);
        let email = company
            .and_then(|info| info.email.as_deref())
            .unwrap_or(&self.email);
        format!(
            "Sorry, I ran into a problem. Please try again later, or contact us directly:\n\n📱 WhatsApp: {whatsapp}\n📧 Email: {email}"
        )
    }
}

pub const UPLOAD_FAILED_MESSAGE: &str = "Sorry, the image could not be uploaded. Please try again.";
pub const UPLOAD_NOT_IMAGE_MESSAGE: &str = "Please choose an image file (JPG, PNG, GIF or WebP).";

/// `https://host/api/chat` -> `https://host/api/<name>`.
fn sibling_endpoint(chat_url: &str, name: &str) -> String {
    let trimmed = chat_url.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((base, _)) => format!("{base}/{name}"),
        None => format!("/api/{name}"),
    }
}

fn read_host_overrides() -> Result<Option<String>, String> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(HOST_CONFIG_GLOBAL))
        .map_err(|e| format!("{e:?}"))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(text) = value.as_string() {
        return Ok(Some(text));
    }
    js_sys::JSON::stringify(&value)
        .map(String::from)
        .map(Some)
        .map_err(|e| format!("{e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_sibling_endpoints() {
        let config = WidgetConfig::default();
        assert_eq!(config.chat_url, DEFAULT_CHAT_URL);
        assert_eq!(
            config.upload_url,
            "https://paperbagglue-chat.onrender.com/api/upload"
        );
        assert_eq!(
            config.config_url,
            "https://paperbagglue-chat.onrender.com/api/config"
        );
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.keepalive_interval_ms, 300_000);
        assert_eq!(config.auto_open_delay_ms, Some(3_000));
    }

    #[test]
    fn chat_url_override_moves_siblings() {
        let config =
            WidgetConfig::from_overrides_json(r#"{"chatUrl": "http://localhost:5000/api/chat"}"#)
                .unwrap();
        assert_eq!(config.chat_url, "http://localhost:5000/api/chat");
        assert_eq!(config.upload_url, "http://localhost:5000/api/upload");
        assert_eq!(config.config_url, "http://localhost:5000/api/config");
    }

    #[test]
    fn explicit_upload_url_wins() {
        let config = WidgetConfig::from_overrides_json(
            r#"{"chatUrl": "http://a/api/chat", "uploadUrl": "http://files/up"}"#,
        )
        .unwrap();
        assert_eq!(config.upload_url, "http://files/up");
        assert_eq!(config.config_url, "http://a/api/config");
    }

    #[test]
    fn unknown_fields_are_ignored_and_defaults_kept() {
        let config =
            WidgetConfig::from_overrides_json(r#"{"theme": "dark", "email": "x@y.z"}"#).unwrap();
        assert_eq!(config.email, "x@y.z");
        assert_eq!(config.whatsapp, WidgetConfig::default().whatsapp);
        assert_eq!(config.root_id, WIDGET_ROOT_ID);
    }

    #[test]
    fn zero_timeouts_and_blank_root_are_rejected() {
        let config = WidgetConfig::from_overrides_json(
            r#"{"requestTimeoutMs": 0, "keepaliveIntervalMs": 0, "rootId": "  "}"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_ms, REQUEST_TIMEOUT_MS);
        assert_eq!(config.keepalive_interval_ms, KEEPALIVE_INTERVAL_MS);
        assert_eq!(config.root_id, WIDGET_ROOT_ID);
    }

    #[test]
    fn auto_open_can_be_disabled() {
        let config = WidgetConfig::from_overrides_json(r#"{"autoOpen": false}"#).unwrap();
        assert_eq!(config.auto_open_delay_ms, None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(WidgetConfig::from_overrides_json("not json").is_err());
    }

    #[test]
    fn fallback_message_lists_contact_channels() {
        let config = WidgetConfig::default();
        let text = config.fallback_message(None);
        assert!(text.contains("WhatsApp: +8613323273311"));
        assert!(text.contains("Email: LarryChen@paperbagglue.com"));

        let remote = CompanyInfo {
            website: None,
            whatsapp: Some("+1555".to_string()),
            email: None,
        };
        let text = config.fallback_message(Some(&remote));
        assert!(text.contains("WhatsApp: +1555"));
        assert!(text.contains("Email: LarryChen@paperbagglue.com"));
    }
}
