//! One message round trip, and the image-upload variant that feeds it.

use chat_types::{upload_marker, ChatRequest, Sender, UploadState};
use dioxus_logger::tracing::{debug, warn};

use crate::api::{ChatTransport, ExchangeError};
use crate::config::{UPLOAD_FAILED_MESSAGE, UPLOAD_NOT_IMAGE_MESSAGE};
use crate::session::ChatSession;
use crate::state::{ExchangeOutcome, StateHandle, StatusTicket};

/// Send whatever is in the input box. Blank drafts are ignored.
pub async fn send<T, S>(session: &ChatSession<T>, mut state: S) -> Result<(), ExchangeError>
where
    T: ChatTransport,
    S: StateHandle,
{
    let Some(text) = state.update(|s| s.take_draft()) else {
        return Ok(());
    };
    send_text(session, text, state).await
}

/// Relay `text` to the chat endpoint and render the reply or the fallback.
///
/// Blank text is ignored. Rejected without side effects while another
/// exchange is in flight. Notices queued meanwhile go out right after.
pub async fn send_text<T, S>(
    session: &ChatSession<T>,
    text: String,
    mut state: S,
) -> Result<(), ExchangeError>
where
    T: ChatTransport,
    S: StateHandle,
{
    let text = text.trim().to_string();
    if text.is_empty() {
        debug!("Ignoring blank message");
        return Ok(());
    }

    let ticket = match state.update(|s| s.begin_send(&text)) {
        Ok(ticket) => ticket,
        Err(_) => {
            warn!("Ignoring send while another message is in flight");
            return Err(ExchangeError::Rejected(
                "a message is already being sent".to_string(),
            ));
        }
    };

    let result = exchange(session, text, ticket, &mut state).await;

    while let Some((notice, ticket)) = state.update(|s| s.begin_queued_notice()) {
        if let Err(e) = exchange(session, notice, ticket, &mut state).await {
            debug!("Queued notice not delivered: {e}");
        }
    }

    result
}

async fn exchange<T, S>(
    session: &ChatSession<T>,
    text: String,
    ticket: StatusTicket,
    state: &mut S,
) -> Result<(), ExchangeError>
where
    T: ChatTransport,
    S: StateHandle,
{
    let request = ChatRequest::message(text, &session.id)
        .with_customer_info(session.config.customer_info.clone());
    let result = match session.transport.post_chat(&request).await {
        Ok(reply) => reply
            .text()
            .map(str::to_string)
            .ok_or(ExchangeError::MissingReply),
        Err(e) => Err(e),
    };

    match result {
        Ok(reply) => {
            state.update(|s| s.finish_send(ticket, ExchangeOutcome::Replied(reply)));
            Ok(())
        }
        Err(e) => {
            warn!("Chat exchange failed: {e}");
            let fallback = session.fallback_message();
            state.update(|s| s.finish_send(ticket, ExchangeOutcome::Failed { fallback }));
            Err(e)
        }
    }
}

/// A locally selected file, already turned into something the panel can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage<A> {
    pub attachment: A,
    pub mime: String,
    pub preview_url: String,
}

pub fn is_image_type(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Show the image right away, upload it, then tell the chat back-end about it.
///
/// The bubble moves `Pending -> Confirmed` on success and `Pending -> Failed`
/// (plus a short bot-side error) otherwise. If a message is in flight when the
/// upload lands, the marker is queued behind it. Returns the server file id.
pub async fn handle_file_upload<T, S>(
    session: &ChatSession<T>,
    image: SelectedImage<T::Attachment>,
    mut state: S,
) -> Result<String, ExchangeError>
where
    T: ChatTransport,
    S: StateHandle,
{
    if !is_image_type(&image.mime) {
        state.update(|s| s.push_text(Sender::Bot, UPLOAD_NOT_IMAGE_MESSAGE));
        return Err(ExchangeError::Rejected(format!(
            "unsupported file type '{}'",
            image.mime
        )));
    }

    let entry = state.update(|s| s.push_image(image.preview_url.clone()));

    match session.transport.upload(&image.attachment, &session.id).await {
        Ok(reply) => {
            let file_id = reply.file_id;
            state.update(|s| {
                s.set_upload_state(
                    entry,
                    UploadState::Confirmed {
                        file_id: file_id.clone(),
                    },
                )
            });
            let marker = upload_marker(&file_id);
            if state.update(|s| s.defer_notice(&marker)) {
                debug!("Upload notification for {file_id} queued behind the current exchange");
            } else if let Err(e) = send_text(session, marker, state).await {
                debug!("Upload notification for {file_id} not delivered: {e}");
            }
            Ok(file_id)
        }
        Err(e) => {
            warn!("Image upload failed: {e}");
            state.update(|s| {
                s.set_upload_state(
                    entry,
                    UploadState::Failed {
                        reason: e.to_string(),
                    },
                );
                s.push_text(Sender::Bot, UPLOAD_FAILED_MESSAGE);
            });
            Err(e)
        }
    }
}
