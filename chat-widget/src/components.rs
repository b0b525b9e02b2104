use std::rc::Rc;

use chat_types::{Sender, UploadState};
use dioxus::prelude::*;
use dioxus_logger::tracing::{debug, error, info};
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;

use crate::api::{ChatTransport, HttpTransport};
use crate::config::WidgetConfig;
use crate::controller::{self, key_action, KeyAction, WidgetSession};
use crate::interop::{self, WidgetCommand};
use crate::markup::{parse_message, Inline};
use crate::monitor;
use crate::session::ChatSession;
use crate::state::{ChatEntry, ChatState, EntryBody};
use crate::styles::WIDGET_STYLES;

pub const INPUT_ID: &str = "chat-widget-input";
pub const MESSAGES_ID: &str = "chat-widget-messages";
pub const FILE_INPUT_ID: &str = "chat-widget-file";

/// Lets the open animation finish before the textarea grabs focus.
const FOCUS_DELAY_MS: u32 = 300;

/// Root of the widget. Expects a [`WidgetConfig`] in context.
#[component]
pub fn WidgetApp() -> Element {
    let config = use_context::<WidgetConfig>();
    let session: Rc<WidgetSession> = use_context_provider(|| {
        let transport = HttpTransport::new(&config);
        Rc::new(ChatSession::new(config.clone(), transport))
    });
    let state = use_context_provider(|| Signal::new(ChatState::default()));

    let commands = use_coroutine({
        let session = session.clone();
        move |mut rx: UnboundedReceiver<WidgetCommand>| {
            let session = session.clone();
            async move {
                while let Some(command) = rx.next().await {
                    controller::apply(command, session.clone(), state);
                }
            }
        }
    });

    {
        let session = session.clone();
        use_drop(move || {
            session.teardown();
        });
    }

    // One-time startup: global API, first check, keep-alive, auto-open.
    use_effect({
        let session = session.clone();
        move || {
            interop::register_command_sink(commands.tx());
            if let Err(e) = interop::install_global_api() {
                error!("Failed to install window.{}: {e}", interop::GLOBAL_API_NAME);
            }
            start_background(session.clone(), state);
            info!("Chat widget loaded (session {})", session.id);
        }
    });

    let transcript = use_memo(move || {
        let state = state.read();
        (state.entries.len(), state.typing)
    });
    use_effect(move || {
        transcript();
        interop::scroll_to_end(MESSAGES_ID);
    });

    let focus_requests = use_memo(move || state.read().focus_requests);
    use_effect(move || {
        if focus_requests() == 0 {
            return;
        }
        spawn(async move {
            TimeoutFuture::new(FOCUS_DELAY_MS).await;
            interop::focus_element(INPUT_ID);
        });
    });

    let open = state.read().panel.open;

    rsx! {
        div {
            class: "cw-root",
            style { {WIDGET_STYLES} }
            if !open {
                ToggleButton {}
            }
            ChatPanel {
                agent_name: config.agent_name.clone(),
                logo_url: config.logo_url.clone(),
            }
        }
    }
}

fn start_background(session: Rc<WidgetSession>, mut state: Signal<ChatState>) {
    {
        let session = session.clone();
        spawn(async move {
            monitor::check(&session, state).await;
            match session.transport.fetch_remote_config().await {
                Ok(remote) => {
                    if let Some(model) = remote.model.as_deref() {
                        debug!("Chat back-end model: {model}");
                    }
                    session.set_company_info(remote.company_info);
                }
                Err(e) => debug!("Remote widget config unavailable: {e}"),
            }
        });
    }

    let interval = session.config.keepalive_interval_ms;
    let probe_session = session.clone();
    let (handle, keepalive) = monitor::abortable_keepalive(monitor::keepalive_loop(
        move || TimeoutFuture::new(interval),
        move || {
            let session = probe_session.clone();
            async move {
                monitor::check(&session, state).await;
            }
        },
    ));
    session.attach_keepalive(handle);
    spawn(async move {
        if keepalive.await.is_err() {
            debug!("Keep-alive stopped");
        }
    });

    if let Some(delay) = session.config.auto_open_delay_ms {
        spawn(async move {
            TimeoutFuture::new(delay).await;
            if session.is_torn_down() {
                return;
            }
            let first_open = state.write().auto_open();
            if first_open {
                monitor::check(&session, state).await;
            }
        });
    }
}

#[component]
fn ToggleButton() -> Element {
    let commands = use_coroutine_handle::<WidgetCommand>();

    rsx! {
        button {
            class: "cw-toggle",
            r#type: "button",
            aria_label: "Open chat",
            onclick: move |_| commands.send(WidgetCommand::Toggle),
            svg {
                width: "24",
                height: "24",
                view_box: "0 0 24 24",
                fill: "none",
                path {
                    d: "M20 2H4C2.9 2 2 2.9 2 4V22L6 18H20C21.1 18 22 17.1 22 16V4C22 2.9 21.1 2 20 2ZM20 16H6L4 18V4H20V16Z",
                    fill: "white",
                }
                circle { cx: "9", cy: "11", r: "1.5", fill: "#00A859" }
                circle { cx: "12", cy: "11", r: "1.5", fill: "#00A859" }
                circle { cx: "15", cy: "11", r: "1.5", fill: "#00A859" }
            }
            span { "Chat" }
        }
    }
}

#[component]
fn ChatPanel(agent_name: String, logo_url: String) -> Element {
    let state = use_context::<Signal<ChatState>>();
    let commands = use_coroutine_handle::<WidgetCommand>();
    let mut logo_failed = use_signal(|| false);

    let (entries, typing, panel, status) = {
        let state = state.read();
        (
            state.entries.clone(),
            state.typing,
            state.panel,
            state.connection_status(),
        )
    };

    let mut panel_class = String::from("cw-panel");
    if panel.open {
        panel_class.push_str(" active");
    }
    if panel.expanded {
        panel_class.push_str(" expanded");
    }

    rsx! {
        div {
            class: "{panel_class}",

            div {
                class: "cw-header",
                div {
                    class: "cw-header-left",
                    if !logo_failed() {
                        img {
                            class: "cw-logo",
                            src: "{logo_url}",
                            alt: "Logo",
                            onerror: move |_| logo_failed.set(true),
                        }
                    }
                    div {
                        class: "cw-header-info",
                        h3 { "{agent_name}" }
                        p {
                            class: "cw-status",
                            span {
                                class: "cw-status-dot",
                                style: "background: {status.color()};",
                            }
                            "{status.label()}"
                        }
                    }
                }
                div {
                    class: "cw-header-actions",
                    button {
                        class: "cw-icon-btn",
                        r#type: "button",
                        title: if panel.expanded { "Restore" } else { "Expand" },
                        onclick: move |_| commands.send(WidgetCommand::ToggleExpand),
                        if panel.expanded { "⤡" } else { "⤢" }
                    }
                    button {
                        class: "cw-icon-btn",
                        r#type: "button",
                        title: "Close",
                        onclick: move |_| commands.send(WidgetCommand::Close),
                        "×"
                    }
                }
            }

            div {
                id: MESSAGES_ID,
                class: "cw-messages",
                WelcomeMessage { agent_name: agent_name.clone() }
                for entry in entries {
                    MessageEntry { key: "{entry.id}", entry: entry.clone() }
                }
                if typing {
                    TypingIndicator {}
                }
            }

            InputArea {}
        }
    }
}

#[component]
fn WelcomeMessage(agent_name: String) -> Element {
    rsx! {
        div {
            class: "cw-message cw-bot",
            div {
                class: "cw-content",
                p { "Hello! I'm {agent_name}, sales manager at Hebei Xinbang Packaging Materials Co., Ltd. 👋" }
                p { "I can help you:" }
                ul {
                    li { "Find the right eco-friendly water-based glue" }
                    li { "Get technical product specifications" }
                    li { "Solve production and application problems" }
                    li { "Request quotes and samples" }
                }
                p { "How can I help you today? 😊" }
            }
        }
    }
}

#[component]
fn MessageEntry(entry: ChatEntry) -> Element {
    let row_class = match entry.sender {
        Sender::User => "cw-message cw-user",
        Sender::Bot => "cw-message cw-bot",
    };

    match entry.body {
        EntryBody::Text(text) => rsx! {
            div {
                class: row_class,
                div {
                    class: "cw-content",
                    {parse_message(&text).into_iter().map(render_inline)}
                }
            }
        },
        EntryBody::Image {
            preview_url,
            upload,
        } => rsx! {
            div {
                class: row_class,
                ImageBubble { preview_url, upload }
            }
        },
    }
}

fn render_inline(node: Inline) -> Element {
    match node {
        Inline::Text(text) => rsx! { "{text}" },
        Inline::Bold(children) => rsx! {
            strong { {children.into_iter().map(render_inline)} }
        },
        Inline::Link(url) => rsx! {
            a {
                href: "{url}",
                target: "_blank",
                rel: "noopener noreferrer",
                "{url}"
            }
        },
        Inline::LineBreak => rsx! {
            br {}
        },
    }
}

#[component]
fn ImageBubble(preview_url: String, upload: UploadState) -> Element {
    let (class, label) = match upload {
        UploadState::Pending => ("cw-image pending", "Uploading..."),
        UploadState::Confirmed { .. } => ("cw-image", "Sent"),
        UploadState::Failed { .. } => ("cw-image failed", "Upload failed"),
    };

    rsx! {
        div {
            class,
            if !preview_url.is_empty() {
                img { src: "{preview_url}", alt: "Uploaded image" }
            }
            span { class: "cw-image-state", "{label}" }
        }
    }
}

#[component]
fn TypingIndicator() -> Element {
    rsx! {
        div {
            class: "cw-message cw-bot",
            div {
                class: "cw-typing",
                span {}
                span {}
                span {}
            }
        }
    }
}

#[component]
fn InputArea() -> Element {
    let mut state = use_context::<Signal<ChatState>>();
    let commands = use_coroutine_handle::<WidgetCommand>();

    let (draft, input_enabled, can_send) = {
        let state = state.read();
        (state.draft.clone(), state.input_enabled, state.can_send())
    };

    let onkeydown = use_callback(move |e: KeyboardEvent| {
        if key_action(&e.key(), e.modifiers().shift()) == KeyAction::Submit {
            e.prevent_default();
            commands.send(WidgetCommand::Send);
        }
    });

    let oninput = use_callback(move |e: FormEvent| {
        state.write().set_draft(e.value());
    });

    rsx! {
        div {
            class: "cw-input-area",
            input {
                id: FILE_INPUT_ID,
                class: "cw-file-input",
                r#type: "file",
                accept: "image/*",
                onchange: move |_| commands.send(WidgetCommand::HandleFileUpload),
            }
            label {
                class: "cw-attach",
                r#for: FILE_INPUT_ID,
                title: "Send an image",
                "📎"
            }
            textarea {
                id: INPUT_ID,
                class: "cw-input",
                placeholder: "Type your question...",
                rows: "2",
                value: "{draft}",
                disabled: !input_enabled,
                oninput,
                onkeydown,
            }
            button {
                class: "cw-send",
                r#type: "button",
                disabled: !can_send,
                onclick: move |_| commands.send(WidgetCommand::Send),
                svg {
                    width: "20",
                    height: "20",
                    view_box: "0 0 24 24",
                    fill: "none",
                    path { d: "M2.01 21L23 12 2.01 3 2 10l15 2-15 2z", fill: "white" }
                }
            }
        }
    }
}
