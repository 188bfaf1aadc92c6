//! WebAssembly service worker core for HFA web push notifications.
//!
//! Compiled to WASM and loaded from a thin JS service worker file that
//! forwards each worker event into an exported handler and hands the
//! returned promise to `event.waitUntil()`, so the browser keeps the
//! worker alive until the asynchronous work settles:
//!
//! ```js
//! import init, * as worker from "./hfa_push_worker.js";
//!
//! self.addEventListener("install", () => worker.handleInstall());
//! self.addEventListener("activate", (e) => e.waitUntil(worker.handleActivate()));
//! self.addEventListener("push", (e) => e.waitUntil(worker.handlePush(e)));
//! self.addEventListener("notificationclick", (e) => e.waitUntil(worker.handleNotificationClick(e)));
//! self.addEventListener("notificationclose", (e) => worker.handleNotificationClose(e));
//! self.addEventListener("sync", (e) => e.waitUntil(worker.handleSync(e.tag)));
//! ```
//!
//! # Event Flow
//!
//! ```text
//! Push service delivers push event
//!     ↓
//! handlePush: read payload text, classify by markers,
//!             showNotification with the HFA payload
//!     ↓
//! User taps the notification
//!     ↓
//! handleNotificationClick: close, then focus an open HFA window
//!                          or open a new one at "/"
//! ```
//!
//! Handlers are stateless across events; all real rendering and window
//! management is delegated to the browser.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub mod browser;
pub mod handlers;
pub mod host;
pub mod payload;

pub use handlers::{ClickOutcome, PushBody, BACKGROUND_SYNC_TAG};
pub use host::{NotificationHandle, ShimError, WindowSession, WorkerHost};
pub use payload::{MessageCategory, NotificationAction, NotificationData, NotificationPayload};

use browser::{BrowserHost, NotificationEvent, PushEvent};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Panic messages and log lines go to the browser console.
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("[Worker] Service worker core loaded");
}

/// `install` listener body.
#[wasm_bindgen(js_name = "handleInstall")]
pub fn handle_install() {
    handlers::on_install(&BrowserHost::from_global());
}

/// `activate` listener body. The returned promise goes to
/// `event.waitUntil()`; a failed claim rejects it.
#[wasm_bindgen(js_name = "handleActivate")]
pub fn handle_activate() -> js_sys::Promise {
    future_to_promise(async move {
        handlers::on_activate(&BrowserHost::from_global()).await?;
        Ok(JsValue::UNDEFINED)
    })
}

/// `push` listener body. Always resolves: payload and display
/// failures are logged, never surfaced.
#[wasm_bindgen(js_name = "handlePush")]
pub fn handle_push(event: &PushEvent) -> js_sys::Promise {
    let body = match event.payload_text() {
        None => PushBody::Empty,
        Some(Ok(text)) => PushBody::Text(text),
        Some(Err(err)) => PushBody::Unreadable(err),
    };

    future_to_promise(async move {
        handlers::on_push(&BrowserHost::from_global(), body).await;
        Ok(JsValue::UNDEFINED)
    })
}

/// `notificationclick` listener body. Focus/open failures reject the
/// returned promise and land in the browser's unhandled-rejection
/// reporting.
#[wasm_bindgen(js_name = "handleNotificationClick")]
pub fn handle_notification_click(event: &NotificationEvent) -> js_sys::Promise {
    let action = event.action_id();
    let notification = event.notification_handle();

    future_to_promise(async move {
        let host = BrowserHost::from_global();
        handlers::on_notification_click(&host, &notification, action.as_deref()).await?;
        Ok(JsValue::UNDEFINED)
    })
}

/// `notificationclose` listener body.
#[wasm_bindgen(js_name = "handleNotificationClose")]
pub fn handle_notification_close(event: &NotificationEvent) {
    handlers::on_notification_close(&event.notification_tag());
}

/// `sync` listener body.
#[wasm_bindgen(js_name = "handleSync")]
pub fn handle_sync(tag: &str) -> js_sys::Promise {
    let tag = tag.to_string();
    future_to_promise(async move {
        handlers::on_sync(&tag).await;
        Ok(JsValue::UNDEFINED)
    })
}

/// Test function to verify WASM loads correctly.
#[wasm_bindgen]
pub fn ping() -> String {
    "hfa-push-worker loaded".to_string()
}
