//! Browser-backed host implementation.
//!
//! Extern declarations for the pieces of the service worker global
//! scope the shim touches, plus the [`WorkerHost`] implementation over
//! them. Method calls are structural, so only the members we actually
//! use are declared.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::host::{NotificationHandle, ShimError, WindowSession, WorkerHost};
use crate::payload::NotificationPayload;

#[wasm_bindgen]
extern "C" {
    /// The worker's `self` (ServiceWorkerGlobalScope).
    pub type ServiceWorkerGlobalScope;

    #[wasm_bindgen(method, getter)]
    fn registration(this: &ServiceWorkerGlobalScope) -> ServiceWorkerRegistration;

    #[wasm_bindgen(method, getter)]
    fn clients(this: &ServiceWorkerGlobalScope) -> Clients;

    #[wasm_bindgen(method, getter)]
    fn location(this: &ServiceWorkerGlobalScope) -> WorkerLocation;

    #[wasm_bindgen(method, js_name = "skipWaiting")]
    fn skip_waiting(this: &ServiceWorkerGlobalScope) -> js_sys::Promise;

    pub type ServiceWorkerRegistration;

    #[wasm_bindgen(method, js_name = "showNotification")]
    fn show_notification(
        this: &ServiceWorkerRegistration,
        title: &str,
        options: &JsValue,
    ) -> js_sys::Promise;

    pub type Clients;

    #[wasm_bindgen(method, js_name = "matchAll")]
    fn match_all(this: &Clients, options: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = "openWindow")]
    fn open_window(this: &Clients, url: &str) -> js_sys::Promise;

    #[wasm_bindgen(method)]
    fn claim(this: &Clients) -> js_sys::Promise;

    pub type WorkerLocation;

    #[wasm_bindgen(method, getter)]
    fn origin(this: &WorkerLocation) -> String;

    /// A window client returned by `clients.matchAll`.
    pub type WindowClient;

    #[wasm_bindgen(method, getter)]
    fn url(this: &WindowClient) -> String;

    #[wasm_bindgen(method)]
    fn focus(this: &WindowClient) -> js_sys::Promise;

    /// The browser notification attached to click/close events.
    pub type Notification;

    #[wasm_bindgen(method)]
    fn close(this: &Notification);

    #[wasm_bindgen(method, getter)]
    fn tag(this: &Notification) -> String;

    /// `PushEvent` as delivered to the push listener.
    pub type PushEvent;

    #[wasm_bindgen(method, getter)]
    fn data(this: &PushEvent) -> Option<PushMessageData>;

    pub type PushMessageData;

    /// `text()` throws when the payload bytes are not decodable.
    #[wasm_bindgen(method, catch)]
    fn text(this: &PushMessageData) -> Result<String, JsValue>;

    /// `NotificationEvent` for click/close listeners.
    pub type NotificationEvent;

    #[wasm_bindgen(method, getter)]
    fn action(this: &NotificationEvent) -> String;

    #[wasm_bindgen(method, getter)]
    fn notification(this: &NotificationEvent) -> Notification;
}

impl PushEvent {
    /// Read the event's payload text, if any.
    pub fn payload_text(&self) -> Option<Result<String, String>> {
        self.data().map(|data| data.text().map_err(js_err))
    }
}

impl NotificationEvent {
    /// Action id, with the default tap (empty string) normalized away.
    pub fn action_id(&self) -> Option<String> {
        let action = self.action();
        if action.is_empty() {
            None
        } else {
            Some(action)
        }
    }

    /// The originating notification.
    pub fn notification_handle(&self) -> Notification {
        self.notification()
    }

    /// Tag of the originating notification.
    pub fn notification_tag(&self) -> String {
        self.notification().tag()
    }
}

/// Render a rejected `JsValue` for error messages.
fn js_err(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// [`WorkerHost`] backed by the live service worker global scope.
pub struct BrowserHost {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserHost {
    /// Capture the worker global scope.
    pub fn from_global() -> Self {
        Self {
            scope: js_sys::global().unchecked_into(),
        }
    }
}

#[async_trait(?Send)]
impl WorkerHost for BrowserHost {
    type Session = WindowClient;

    fn origin(&self) -> String {
        self.scope.location().origin()
    }

    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    async fn show_notification(&self, payload: &NotificationPayload) -> Result<(), ShimError> {
        let options = serde_wasm_bindgen::to_value(payload)
            .map_err(|e| ShimError::Display(e.to_string()))?;

        let promise = self
            .scope
            .registration()
            .show_notification(&payload.title, &options);
        JsFuture::from(promise)
            .await
            .map_err(|e| ShimError::Display(js_err(e)))?;
        Ok(())
    }

    async fn window_sessions(&self) -> Result<Vec<WindowClient>, ShimError> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"type".into(), &"window".into())
            .map_err(|e| ShimError::SessionLookup(js_err(e)))?;
        js_sys::Reflect::set(&options, &"includeUncontrolled".into(), &JsValue::TRUE)
            .map_err(|e| ShimError::SessionLookup(js_err(e)))?;

        let matched = JsFuture::from(self.scope.clients().match_all(&options.into()))
            .await
            .map_err(|e| ShimError::SessionLookup(js_err(e)))?;

        Ok(js_sys::Array::from(&matched)
            .iter()
            .map(|client| client.unchecked_into::<WindowClient>())
            .collect())
    }

    async fn open_window(&self, path: &str) -> Result<(), ShimError> {
        JsFuture::from(self.scope.clients().open_window(path))
            .await
            .map_err(|e| ShimError::OpenWindow(js_err(e)))?;
        Ok(())
    }

    fn skip_waiting(&self) {
        // The returned promise resolves on the browser's own schedule;
        // nothing observable depends on it.
        let _ = self.scope.skip_waiting();
    }

    async fn claim_sessions(&self) -> Result<(), ShimError> {
        JsFuture::from(self.scope.clients().claim())
            .await
            .map_err(|e| ShimError::Claim(js_err(e)))?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl WindowSession for WindowClient {
    fn url(&self) -> String {
        WindowClient::url(self)
    }

    async fn focus(&self) -> Result<(), ShimError> {
        JsFuture::from(WindowClient::focus(self))
            .await
            .map_err(|e| ShimError::Focus(js_err(e)))?;
        Ok(())
    }
}

impl NotificationHandle for Notification {
    fn close(&self) {
        Notification::close(self);
    }
}
