use std::future::Future;

use async_trait::async_trait;
use chat_types::{ChatReply, ChatRequest, RemoteConfig, SessionId, UploadReply};
use futures::future::{select, Either};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use web_sys::{AbortController, AbortSignal, File, FormData};

use crate::config::WidgetConfig;

/// Every way a round trip to the chat back-end can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u32 },

    #[error("HTTP error: {status} ({detail})")]
    Status { status: u16, detail: String },

    #[error("Failed to parse JSON: {0}")]
    Malformed(String),

    #[error("No response from server")]
    MissingReply,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("{0}")]
    Rejected(String),
}

/// Outbound side of the widget.
///
/// Implementations bound every call by their own timeout; callers never wait
/// on a request forever.
#[async_trait(?Send)]
pub trait ChatTransport {
    /// Whatever the platform hands us for a user-selected file.
    type Attachment;

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError>;

    /// Zero-content health check. `Ok` means the endpoint answered with
    /// anything short of a server error.
    async fn probe(&self, session_id: &SessionId) -> Result<(), ExchangeError>;

    async fn upload(
        &self,
        attachment: &Self::Attachment,
        session_id: &SessionId,
    ) -> Result<UploadReply, ExchangeError>;

    async fn fetch_remote_config(&self) -> Result<RemoteConfig, ExchangeError>;
}

/// Browser transport over `fetch`, aborting requests that outlive the timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpTransport {
    chat_url: String,
    upload_url: String,
    config_url: String,
    timeout_ms: u32,
}

impl HttpTransport {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            chat_url: config.chat_url.clone(),
            upload_url: config.upload_url.clone(),
            config_url: config.config_url.clone(),
            timeout_ms: config.request_timeout_ms,
        }
    }

    /// Send a request and read its response under one timeout. The request
    /// is aborted if the timer fires first, whether headers or body are late.
    async fn bounded<T, F>(
        &self,
        build: impl FnOnce(&AbortSignal) -> Result<Request, gloo_net::Error>,
        read: impl FnOnce(Response) -> F,
    ) -> Result<T, ExchangeError>
    where
        F: Future<Output = Result<T, ExchangeError>>,
    {
        let controller = AbortController::new().map_err(js_error)?;
        let request = build(&controller.signal())
            .map_err(|e| ExchangeError::Network(format!("Failed to build request: {e}")))?;

        let exchange = async move {
            let response = request
                .send()
                .await
                .map_err(|e| ExchangeError::Network(e.to_string()))?;
            read(response).await
        };
        within(
            exchange,
            TimeoutFuture::new(self.timeout_ms),
            self.timeout_ms,
            || controller.abort(),
        )
        .await
    }
}

/// Race `work` against `deadline`; `on_expiry` runs only if the deadline wins.
async fn within<T>(
    work: impl Future<Output = Result<T, ExchangeError>>,
    deadline: impl Future<Output = ()>,
    timeout_ms: u32,
    on_expiry: impl FnOnce(),
) -> Result<T, ExchangeError> {
    futures::pin_mut!(work, deadline);
    match select(work, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            on_expiry();
            Err(ExchangeError::Timeout { ms: timeout_ms })
        }
    }
}

/// Any HTTP answer below 500 means the service is up. The back-end rejects
/// the empty probe with 400, which still counts.
fn is_reachable_status(status: u16) -> bool {
    status < 500
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    type Attachment = File;

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError> {
        self.bounded(
            |signal| {
                Request::post(&self.chat_url)
                    .abort_signal(Some(signal))
                    .json(request)
            },
            read_json::<ChatReply>,
        )
        .await
    }

    async fn probe(&self, session_id: &SessionId) -> Result<(), ExchangeError> {
        let probe = ChatRequest::probe(session_id);
        self.bounded(
            |signal| {
                Request::post(&self.chat_url)
                    .abort_signal(Some(signal))
                    .json(&probe)
            },
            |response: Response| async move {
                if is_reachable_status(response.status()) {
                    Ok(())
                } else {
                    Err(describe_http_error(response).await)
                }
            },
        )
        .await
    }

    async fn upload(
        &self,
        attachment: &File,
        session_id: &SessionId,
    ) -> Result<UploadReply, ExchangeError> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", attachment, &attachment.name())
            .map_err(js_error)?;
        form.append_with_str("session_id", session_id.as_str())
            .map_err(js_error)?;

        let reply = self
            .bounded(
                |signal| {
                    Request::post(&self.upload_url)
                        .abort_signal(Some(signal))
                        .body(form)
                },
                read_json::<UploadReply>,
            )
            .await?;
        if reply.file_id.trim().is_empty() {
            return Err(ExchangeError::Upload("server returned an empty file id".to_string()));
        }
        Ok(reply)
    }

    async fn fetch_remote_config(&self) -> Result<RemoteConfig, ExchangeError> {
        self.bounded(
            |signal| {
                Request::get(&self.config_url)
                    .abort_signal(Some(signal))
                    .build()
            },
            read_json::<RemoteConfig>,
        )
        .await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ExchangeError> {
    if !response.ok() {
        return Err(describe_http_error(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| ExchangeError::Malformed(e.to_string()))
}

async fn describe_http_error(response: Response) -> ExchangeError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ExchangeError::Status {
        status,
        detail: error_detail(&body),
    }
}

/// Pull the most useful part out of an error body.
fn error_detail(body: &str) -> String {
    if body.trim().is_empty() {
        return "empty body".to_string();
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
            return error.to_string();
        }
        if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }

    body.trim().to_string()
}

fn js_error(value: wasm_bindgen::JsValue) -> ExchangeError {
    ExchangeError::Network(format!("{value:?}"))
}
