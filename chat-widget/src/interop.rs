//! Browser glue: the `window.chatWidget` surface and small DOM helpers.

use std::cell::RefCell;

use futures::channel::mpsc::UnboundedSender;
use futures::channel::oneshot;
use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{window, Document, Element, File, HtmlElement, HtmlInputElement, Url};

/// Property the widget installs on `window` for host-page scripts.
pub const GLOBAL_API_NAME: &str = "chatWidget";

/// A call made through the global surface, queued for the mounted widget.
#[derive(Debug)]
pub enum WidgetCommand {
    Toggle,
    Open,
    Close,
    ToggleExpand,
    Send,
    SendText(String),
    /// Upload whatever is selected in the widget's file input.
    HandleFileUpload,
    HealthCheck(oneshot::Sender<bool>),
    Destroy,
}

thread_local! {
    static COMMAND_SINK: RefCell<Option<UnboundedSender<WidgetCommand>>> = RefCell::new(None);
}

pub fn register_command_sink(sink: UnboundedSender<WidgetCommand>) {
    COMMAND_SINK.with(|slot| *slot.borrow_mut() = Some(sink));
}

pub fn clear_command_sink() {
    COMMAND_SINK.with(|slot| slot.borrow_mut().take());
}

/// Queue a command for the widget. Returns `false` if nothing is listening.
pub fn dispatch(command: WidgetCommand) -> bool {
    COMMAND_SINK.with(|slot| match slot.borrow().as_ref() {
        Some(sink) => sink.unbounded_send(command).is_ok(),
        None => {
            log::warn!("chatWidget call ignored, widget is not mounted");
            false
        }
    })
}

/// Install `window.chatWidget`.
pub fn install_global_api() -> Result<(), String> {
    let window = window().ok_or_else(|| "no global `window` exists".to_string())?;
    let api = Object::new();

    bind_command(&api, "toggle", || WidgetCommand::Toggle)?;
    bind_command(&api, "open", || WidgetCommand::Open)?;
    bind_command(&api, "close", || WidgetCommand::Close)?;
    bind_command(&api, "toggleExpand", || WidgetCommand::ToggleExpand)?;
    bind_command(&api, "send", || WidgetCommand::Send)?;
    bind_command(&api, "handleFileUpload", || WidgetCommand::HandleFileUpload)?;
    bind_command(&api, "destroy", || WidgetCommand::Destroy)?;

    let send_text = Closure::wrap(Box::new(move |text: JsValue| match text.as_string() {
        Some(text) => {
            dispatch(WidgetCommand::SendText(text));
        }
        None => log::warn!("chatWidget.sendText expects a string"),
    }) as Box<dyn FnMut(JsValue)>);
    set_property(&api, "sendText", send_text.as_ref())?;
    send_text.forget();

    let health_check = Closure::wrap(Box::new(move || -> Promise {
        let (reply, verdict) = oneshot::channel();
        dispatch(WidgetCommand::HealthCheck(reply));
        future_to_promise(async move {
            // A dropped command resolves as offline.
            let online = verdict.await.unwrap_or(false);
            Ok(JsValue::from_bool(online))
        })
    }) as Box<dyn FnMut() -> Promise>);
    set_property(&api, "healthCheck", health_check.as_ref())?;
    health_check.forget();

    set_property(&window, GLOBAL_API_NAME, &api)
}

pub fn remove_global_api() {
    let Some(window) = window() else {
        return;
    };
    if let Err(e) = Reflect::delete_property(&window, &JsValue::from_str(GLOBAL_API_NAME)) {
        log::warn!("Failed to remove window.{GLOBAL_API_NAME}: {e:?}");
    }
}

fn bind_command(api: &Object, name: &str, command: fn() -> WidgetCommand) -> Result<(), String> {
    let callback = Closure::wrap(Box::new(move || {
        dispatch(command());
    }) as Box<dyn FnMut()>);
    set_property(api, name, callback.as_ref())?;
    // The host page may call these for as long as it lives.
    callback.forget();
    Ok(())
}

fn set_property(target: &JsValue, name: &str, value: &JsValue) -> Result<(), String> {
    Reflect::set(target, &JsValue::from_str(name), value)
        .map(|_| ())
        .map_err(|e| format!("Failed to set {name}: {e:?}"))
}

pub fn document() -> Option<Document> {
    window()?.document()
}

fn element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Run `f` once the DOM is parsed, immediately if it already is.
pub fn on_document_ready(f: impl FnOnce() + 'static) {
    let Some(document) = document() else {
        log::error!("No document available, widget not started");
        return;
    };
    if document.ready_state() != "loading" {
        f();
        return;
    }

    let callback = Closure::once_into_js(f);
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        log::error!("Failed to wait for DOMContentLoaded: {e:?}");
    }
}

pub fn focus_element(id: &str) {
    let Some(element) = element_by_id(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
        return;
    };
    if let Err(e) = element.focus() {
        log::debug!("Failed to focus #{id}: {e:?}");
    }
}

pub fn scroll_to_end(id: &str) {
    if let Some(element) = element_by_id(id) {
        element.set_scroll_top(element.scroll_height());
    }
}

fn file_input(id: &str) -> Option<HtmlInputElement> {
    element_by_id(id)?.dyn_into::<HtmlInputElement>().ok()
}

/// First file selected in the `<input type="file">` with this id.
pub fn selected_file(input_id: &str) -> Option<File> {
    file_input(input_id)?.files()?.get(0)
}

/// Reset the file input so picking the same file again fires `change`.
pub fn clear_file_input(input_id: &str) {
    if let Some(input) = file_input(input_id) {
        input.set_value("");
    }
}

/// Local `blob:` URL for previewing a file before it is uploaded.
pub fn object_url(file: &File) -> Result<String, String> {
    Url::create_object_url_with_blob(file).map_err(|e| format!("Failed to create preview URL: {e:?}"))
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;

    use super::*;

    #[test]
    fn dispatch_reaches_registered_sink() {
        let (tx, mut rx) = mpsc::unbounded();
        register_command_sink(tx);

        assert!(dispatch(WidgetCommand::Open));
        assert!(dispatch(WidgetCommand::SendText("hello".to_string())));

        assert!(matches!(rx.try_next(), Ok(Some(WidgetCommand::Open))));
        match rx.try_next() {
            Ok(Some(WidgetCommand::SendText(text))) => assert_eq!(text, "hello"),
            other => panic!("unexpected command {other:?}"),
        }
        clear_command_sink();
    }

    #[test]
    fn dispatch_without_widget_is_dropped() {
        clear_command_sink();
        assert!(!dispatch(WidgetCommand::Toggle));
    }

    #[test]
    fn dropped_health_check_resolves_offline() {
        clear_command_sink();
        let (reply, verdict) = oneshot::channel();
        dispatch(WidgetCommand::HealthCheck(reply));
        assert!(!futures::executor::block_on(verdict).unwrap_or(false));
    }

    #[test]
    fn closed_sink_reports_failure() {
        let (tx, rx) = mpsc::unbounded();
        register_command_sink(tx);
        drop(rx);
        assert!(!dispatch(WidgetCommand::Close));
        clear_command_sink();
    }
}
