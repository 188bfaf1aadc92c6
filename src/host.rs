//! Host runtime seam.
//!
//! Traits abstracting the service worker APIs the event handlers call,
//! so the handlers stay testable off-browser. `browser::BrowserHost`
//! is the production implementation over the live worker global scope.

use async_trait::async_trait;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::payload::NotificationPayload;

/// Shim errors, surfaced to the host as rejected pending operations.
#[derive(Error, Debug)]
pub enum ShimError {
    #[error("Failed to display notification: {0}")]
    Display(String),
    #[error("Failed to enumerate window sessions: {0}")]
    SessionLookup(String),
    #[error("Failed to focus window session: {0}")]
    Focus(String),
    #[error("Failed to open window: {0}")]
    OpenWindow(String),
    #[error("Failed to claim sessions: {0}")]
    Claim(String),
}

impl From<ShimError> for JsValue {
    fn from(err: ShimError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// An open window or tab reachable from the worker.
#[async_trait(?Send)]
pub trait WindowSession {
    /// URL the session is currently displaying.
    fn url(&self) -> String;

    /// Bring the session to the foreground.
    async fn focus(&self) -> Result<(), ShimError>;
}

/// Service worker host APIs used by the event handlers.
///
/// Futures are not `Send`: the worker is single-threaded and the
/// production implementation holds `JsValue`s.
#[async_trait(?Send)]
pub trait WorkerHost {
    type Session: WindowSession;

    /// Origin this worker is registered under.
    fn origin(&self) -> String;

    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> u64;

    /// Ask the host to render a system notification.
    async fn show_notification(&self, payload: &NotificationPayload) -> Result<(), ShimError>;

    /// Enumerate open window sessions, including ones not yet
    /// controlled by this worker.
    async fn window_sessions(&self) -> Result<Vec<Self::Session>, ShimError>;

    /// Open a new window at `path`.
    async fn open_window(&self, path: &str) -> Result<(), ShimError>;

    /// Activate this worker immediately instead of waiting for
    /// existing sessions to close.
    fn skip_waiting(&self);

    /// Take control of all currently open sessions.
    async fn claim_sessions(&self) -> Result<(), ShimError>;
}

/// Handle to a displayed notification.
pub trait NotificationHandle {
    /// Close the notification.
    fn close(&self);
}
