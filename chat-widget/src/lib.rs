pub mod api;
pub mod components;
pub mod config;
pub mod controller;
pub mod exchange;
pub mod interop;
pub mod markup;
pub mod monitor;
pub mod mount;
pub mod session;
pub mod state;
pub mod styles;

use std::sync::Once;

use dioxus::prelude::*;
use dioxus_logger::tracing::{error, info, Level};
use wasm_bindgen::prelude::*;

pub use api::{ChatTransport, ExchangeError, HttpTransport};
pub use components::WidgetApp;
pub use config::WidgetConfig;
pub use session::ChatSession;
pub use state::ChatState;

use mount::MountOutcome;

static LOGGING: Once = Once::new();

/// Mount the widget into the host page.
///
/// Waits for `DOMContentLoaded` if the document is still loading. Calling it
/// again once the widget is on the page does nothing.
#[wasm_bindgen(js_name = initChatWidget)]
pub fn init() {
    LOGGING.call_once(|| {
        wasm_logger::init(wasm_logger::Config::default());
        dioxus_logger::init(Level::INFO).ok();
    });
    interop::on_document_ready(launch_widget);
}

fn launch_widget() {
    let config = WidgetConfig::from_host_page();
    let Some(document) = interop::document() else {
        error!("No document available, chat widget not mounted");
        return;
    };

    match mount::mount_root(&document, &config.root_id) {
        Ok(MountOutcome::AlreadyMounted) => info!("Chat widget already loaded"),
        Ok(MountOutcome::Mounted) => {
            let root_id = config.root_id.clone();
            LaunchBuilder::new()
                .with_cfg(dioxus_web::Config::new().rootname(root_id))
                .with_context(config)
                .launch(WidgetApp);
        }
        Err(e) => error!("Failed to mount chat widget: {e}"),
    }
}
