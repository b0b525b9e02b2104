//! Browser tests, run with `wasm-pack test --headless --firefox chat-widget`.
#![cfg(target_arch = "wasm32")]

use chat_types::{ChatRequest, SessionId};
use chat_widget::config::{WidgetConfig, HOST_CONFIG_GLOBAL};
use chat_widget::interop;
use chat_widget::mount::{mount_root, HostDocument, MountOutcome};
use chat_widget::{ChatTransport, ExchangeError, HttpTransport};
use js_sys::{Function, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn mount_is_idempotent_on_a_real_page() {
    let doc = document();
    let id = "chat-widget-test-root";

    assert_eq!(mount_root(&doc, id), Ok(MountOutcome::Mounted));
    assert_eq!(mount_root(&doc, id), Ok(MountOutcome::AlreadyMounted));

    let root = doc.get_element_by_id(id).unwrap();
    assert_eq!(root.tag_name(), "DIV");

    assert!(doc.remove_root(id));
    assert!(!doc.has_element(id));
}

#[wasm_bindgen_test]
fn host_page_overrides_are_read_from_window() {
    let window = web_sys::window().unwrap();
    let overrides = JSON::parse(r#"{"chatUrl": "http://localhost:5000/api/chat", "autoOpen": false}"#)
        .unwrap();
    Reflect::set(&window, &JsValue::from_str(HOST_CONFIG_GLOBAL), &overrides).unwrap();

    let config = WidgetConfig::from_host_page();
    assert_eq!(config.chat_url, "http://localhost:5000/api/chat");
    assert_eq!(config.upload_url, "http://localhost:5000/api/upload");
    assert_eq!(config.auto_open_delay_ms, None);

    Reflect::delete_property(&window, &JsValue::from_str(HOST_CONFIG_GLOBAL)).unwrap();
    assert_eq!(WidgetConfig::from_host_page(), WidgetConfig::default());
}

#[wasm_bindgen_test]
fn global_api_exposes_every_operation() {
    let window = web_sys::window().unwrap();
    interop::install_global_api().unwrap();

    let api = Reflect::get(&window, &JsValue::from_str(interop::GLOBAL_API_NAME)).unwrap();
    for name in [
        "toggle",
        "open",
        "close",
        "send",
        "toggleExpand",
        "sendText",
        "handleFileUpload",
        "healthCheck",
        "destroy",
    ] {
        let member = Reflect::get(&api, &JsValue::from_str(name)).unwrap();
        assert!(member.is_instance_of::<Function>(), "missing chatWidget.{name}");
    }

    interop::remove_global_api();
    let api = Reflect::get(&window, &JsValue::from_str(interop::GLOBAL_API_NAME)).unwrap();
    assert!(api.is_undefined());
}

#[wasm_bindgen_test]
async fn health_check_without_widget_resolves_offline() {
    interop::install_global_api().unwrap();
    let window = web_sys::window().unwrap();
    let api = Reflect::get(&window, &JsValue::from_str(interop::GLOBAL_API_NAME)).unwrap();
    let health_check: Function = Reflect::get(&api, &JsValue::from_str("healthCheck"))
        .unwrap()
        .dyn_into()
        .unwrap();

    let promise: js_sys::Promise = health_check.call0(&api).unwrap().dyn_into().unwrap();
    let online = wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
    assert_eq!(online.as_bool(), Some(false));

    interop::remove_global_api();
}

#[wasm_bindgen_test]
async fn unanswered_request_gives_up_at_the_timeout() {
    // Non-routable address: the connection neither completes nor answers.
    let config = WidgetConfig::from_overrides_json(
        r#"{"chatUrl": "http://10.255.255.1:81/api/chat", "requestTimeoutMs": 50}"#,
    )
    .unwrap();
    let transport = HttpTransport::new(&config);
    let request = ChatRequest::message("hello".to_string(), &SessionId("session-1-test".to_string()));

    let err = transport.post_chat(&request).await.unwrap_err();

    // Some sandboxes refuse the address outright instead of letting it hang.
    assert!(
        matches!(err, ExchangeError::Timeout { ms: 50 } | ExchangeError::Network(_)),
        "unexpected error {err:?}"
    );
}
