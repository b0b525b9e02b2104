use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing::{debug, info, warn};

use crate::api::HttpTransport;
use crate::components::FILE_INPUT_ID;
use crate::exchange::{self, SelectedImage};
use crate::interop::{self, WidgetCommand};
use crate::monitor;
use crate::mount::HostDocument;
use crate::session::ChatSession;
use crate::state::ChatState;

pub type WidgetSession = ChatSession<HttpTransport>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    /// Leave the key to the textarea (Shift+Enter becomes a newline).
    Passthrough,
}

pub fn key_action(key: &Key, shift: bool) -> KeyAction {
    match key {
        Key::Enter if !shift => KeyAction::Submit,
        _ => KeyAction::Passthrough,
    }
}

/// Carry out one host-page or UI command against the mounted widget.
pub fn apply(command: WidgetCommand, session: Rc<WidgetSession>, mut state: Signal<ChatState>) {
    match command {
        WidgetCommand::Toggle => {
            let first_open = state.write().toggle_panel();
            if first_open {
                spawn_check(session, state);
            }
        }
        WidgetCommand::Open => {
            let first_open = state.write().open_panel();
            if first_open {
                spawn_check(session, state);
            }
        }
        WidgetCommand::Close => state.write().close_panel(),
        WidgetCommand::ToggleExpand => state.write().toggle_expand(),
        WidgetCommand::Send => {
            spawn(async move {
                exchange::send(&session, state).await.ok();
            });
        }
        WidgetCommand::SendText(text) => {
            spawn(async move {
                exchange::send_text(&session, text, state).await.ok();
            });
        }
        WidgetCommand::HandleFileUpload => upload_selected(session, state),
        WidgetCommand::HealthCheck(reply) => {
            spawn(async move {
                let online = monitor::check(&session, state).await;
                if reply.send(online).is_err() {
                    debug!("Health check caller went away");
                }
            });
        }
        WidgetCommand::Destroy => destroy(&session),
    }
}

fn spawn_check(session: Rc<WidgetSession>, state: Signal<ChatState>) {
    spawn(async move {
        monitor::check(&session, state).await;
    });
}

fn upload_selected(session: Rc<WidgetSession>, state: Signal<ChatState>) {
    let Some(file) = interop::selected_file(FILE_INPUT_ID) else {
        debug!("No file selected");
        return;
    };
    interop::clear_file_input(FILE_INPUT_ID);

    let preview_url = interop::object_url(&file).unwrap_or_else(|e| {
        warn!("{e}");
        String::new()
    });
    let image = SelectedImage {
        mime: file.type_(),
        attachment: file,
        preview_url,
    };
    spawn(async move {
        exchange::handle_file_upload(&session, image, state).await.ok();
    });
}

/// Stop background work and take the widget off the page.
pub fn destroy(session: &WidgetSession) {
    if session.is_torn_down() {
        return;
    }
    session.teardown();
    interop::clear_command_sink();
    interop::remove_global_api();
    if let Some(document) = interop::document() {
        document.remove_root(&session.config.root_id);
    }
    info!("Chat widget destroyed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_submits() {
        assert_eq!(key_action(&Key::Enter, false), KeyAction::Submit);
    }

    #[test]
    fn shift_enter_inserts_newline() {
        assert_eq!(key_action(&Key::Enter, true), KeyAction::Passthrough);
    }

    #[test]
    fn other_keys_pass_through() {
        assert_eq!(
            key_action(&Key::Character("a".to_string()), false),
            KeyAction::Passthrough
        );
        assert_eq!(key_action(&Key::Tab, false), KeyAction::Passthrough);
    }
}
