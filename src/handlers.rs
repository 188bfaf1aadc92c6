//! Event handlers: one function per worker event kind.
//!
//! Each handler is a pure reaction to a single event description and
//! calls through the [`WorkerHost`](crate::host::WorkerHost) seam.
//! There is no state shared across invocations; ordering between
//! events is whatever the browser delivers.
//!
//! Failure semantics follow the event kind: push payload and display
//! failures are logged and swallowed (the worker never crashes over a
//! missed notification), while click and activate failures propagate
//! so they reject the pending operation the browser is awaiting.

use crate::host::{NotificationHandle, ShimError, WindowSession, WorkerHost};
use crate::payload::{NotificationPayload, OPEN_URL};

/// Sync event tag that triggers the background sync helper.
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

/// Inbound push payload as read off the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushBody {
    /// The event carried no data.
    Empty,
    /// Event data read as text.
    Text(String),
    /// Event data was present but text extraction threw.
    Unreadable(String),
}

/// What a notification click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An existing window session on our origin was focused.
    Focused,
    /// No matching session; a new window was opened.
    Opened,
    /// The notification was closed and nothing else happened.
    ClosedOnly,
}

/// Install: take over immediately instead of waiting for existing
/// sessions to close.
pub fn on_install<H: WorkerHost>(host: &H) {
    log::info!("[Worker] Installing, skipping waiting phase");
    host.skip_waiting();
}

/// Activate: take control of currently open sessions. The caller must
/// keep the event pending until this settles.
pub async fn on_activate<H: WorkerHost>(host: &H) -> Result<(), ShimError> {
    host.claim_sessions().await?;
    log::info!("[Worker] Activated, sessions claimed");
    Ok(())
}

/// Push: build a payload from the inbound body and ask the host to
/// display it.
///
/// Both failure modes are non-fatal: an unreadable payload falls back
/// to the defaults, and a display failure is logged without retry.
pub async fn on_push<H: WorkerHost>(host: &H, body: PushBody) {
    let mut payload = NotificationPayload::new(host.now_millis());

    match body {
        PushBody::Empty => {}
        PushBody::Text(text) => {
            log::info!("[Push] Received: {text}");
            payload.apply_message(&text);
        }
        PushBody::Unreadable(err) => {
            log::error!("[Push] Failed to read payload, using defaults: {err}");
        }
    }

    match host.show_notification(&payload).await {
        Ok(()) => log::info!("[Push] Notification displayed (tag {})", payload.tag),
        Err(err) => log::error!("[Push] {err}"),
    }
}

/// Notification click: close the notification, then route the action.
///
/// "open" and the default tap focus an existing session on our origin
/// if one is open, else open a new window at the root. "dismiss" and
/// unknown actions stop after the close.
pub async fn on_notification_click<H, N>(
    host: &H,
    notification: &N,
    action: Option<&str>,
) -> Result<ClickOutcome, ShimError>
where
    H: WorkerHost,
    N: NotificationHandle,
{
    notification.close();

    match action {
        Some("open") | None => {
            let origin = host.origin();
            for session in host.window_sessions().await? {
                if session.url().contains(&origin) {
                    session.focus().await?;
                    log::info!("[Click] Focused existing session");
                    return Ok(ClickOutcome::Focused);
                }
            }
            host.open_window(OPEN_URL).await?;
            log::info!("[Click] Opened new window at {OPEN_URL}");
            Ok(ClickOutcome::Opened)
        }
        Some("dismiss") => {
            log::info!("[Click] Notification dismissed");
            Ok(ClickOutcome::ClosedOnly)
        }
        Some(other) => {
            log::warn!("[Click] Unknown action {other:?}, ignoring");
            Ok(ClickOutcome::ClosedOnly)
        }
    }
}

/// Notification close: observability only.
pub fn on_notification_close(tag: &str) {
    log::info!("[Close] Notification closed (tag {tag})");
}

/// Background sync: only the designated tag does anything.
pub async fn on_sync(tag: &str) {
    log::info!("[Sync] Sync event (tag {tag})");
    if tag == BACKGROUND_SYNC_TAG {
        run_background_sync().await;
    }
}

/// Sync data when the device comes back online.
///
/// Placeholder: push delivery is the push service's responsibility, so
/// there is nothing to transfer yet.
async fn run_background_sync() {
    log::info!("[Sync] Background sync complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{DEFAULT_BODY, SOUND_PATH};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TEST_ORIGIN: &str = "https://hfa.example.com";
    const TEST_NOW: u64 = 1_700_000_000_000;

    #[derive(Clone)]
    struct MockSession {
        url: String,
        focused: Rc<RefCell<bool>>,
    }

    impl MockSession {
        fn new(url: &str) -> Self {
            Self {
                url: url.to_string(),
                focused: Rc::new(RefCell::new(false)),
            }
        }
    }

    #[async_trait(?Send)]
    impl WindowSession for MockSession {
        fn url(&self) -> String {
            self.url.clone()
        }

        async fn focus(&self) -> Result<(), ShimError> {
            *self.focused.borrow_mut() = true;
            Ok(())
        }
    }

    /// Recording host: captures every outbound call for assertions.
    struct MockHost {
        sessions: Vec<MockSession>,
        shown: RefCell<Vec<NotificationPayload>>,
        opened: RefCell<Vec<String>>,
        skip_waiting_calls: RefCell<u32>,
        claimed: RefCell<bool>,
        fail_display: bool,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                sessions: Vec::new(),
                shown: RefCell::new(Vec::new()),
                opened: RefCell::new(Vec::new()),
                skip_waiting_calls: RefCell::new(0),
                claimed: RefCell::new(false),
                fail_display: false,
            }
        }

        fn with_sessions(sessions: Vec<MockSession>) -> Self {
            Self {
                sessions,
                ..Self::new()
            }
        }

        fn failing_display() -> Self {
            Self {
                fail_display: true,
                ..Self::new()
            }
        }

        fn shown(&self) -> Vec<NotificationPayload> {
            self.shown.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl WorkerHost for MockHost {
        type Session = MockSession;

        fn origin(&self) -> String {
            TEST_ORIGIN.to_string()
        }

        fn now_millis(&self) -> u64 {
            TEST_NOW
        }

        async fn show_notification(
            &self,
            payload: &NotificationPayload,
        ) -> Result<(), ShimError> {
            if self.fail_display {
                return Err(ShimError::Display("permission denied".to_string()));
            }
            self.shown.borrow_mut().push(payload.clone());
            Ok(())
        }

        async fn window_sessions(&self) -> Result<Vec<MockSession>, ShimError> {
            Ok(self.sessions.clone())
        }

        async fn open_window(&self, path: &str) -> Result<(), ShimError> {
            self.opened.borrow_mut().push(path.to_string());
            Ok(())
        }

        fn skip_waiting(&self) {
            *self.skip_waiting_calls.borrow_mut() += 1;
        }

        async fn claim_sessions(&self) -> Result<(), ShimError> {
            *self.claimed.borrow_mut() = true;
            Ok(())
        }
    }

    struct MockNotification {
        closed: Rc<RefCell<bool>>,
    }

    impl MockNotification {
        fn new() -> Self {
            Self {
                closed: Rc::new(RefCell::new(false)),
            }
        }

        fn is_closed(&self) -> bool {
            *self.closed.borrow()
        }
    }

    impl NotificationHandle for MockNotification {
        fn close(&self) {
            *self.closed.borrow_mut() = true;
        }
    }

    // === Push ===

    #[tokio::test]
    async fn test_push_without_data_shows_default_notification() {
        let host = MockHost::new();

        on_push(&host, PushBody::Empty).await;

        let shown = host.shown();
        assert_eq!(shown.len(), 1, "exactly one notification displayed");
        assert_eq!(shown[0].title, "HFA Notification");
        assert_eq!(shown[0].tag, "general");
        assert_eq!(shown[0].body, DEFAULT_BODY);
        assert!(!shown[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_push_thread_message_classified() {
        let host = MockHost::new();

        on_push(&host, PushBody::Text("💬 Coach: ice time moved".to_string())).await;

        let shown = host.shown();
        assert_eq!(shown[0].title, "New Thread Message");
        assert_eq!(shown[0].tag, "thread-message");
        assert_eq!(shown[0].body, "💬 Coach: ice time moved");
        assert_eq!(shown[0].sound, SOUND_PATH, "same sound as every category");
    }

    #[tokio::test]
    async fn test_push_gear_update_classified() {
        let host = MockHost::new();

        on_push(&host, PushBody::Text("🎽 Socks restocked".to_string())).await;

        let shown = host.shown();
        assert_eq!(shown[0].title, "Gear Update");
        assert_eq!(shown[0].tag, "gear-update");
    }

    #[tokio::test]
    async fn test_push_unreadable_data_falls_back_to_defaults() {
        let host = MockHost::new();

        on_push(&host, PushBody::Unreadable("not utf-8".to_string())).await;

        // Read failure is non-fatal: the default notification still shows.
        let shown = host.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "HFA Notification");
        assert_eq!(shown[0].body, DEFAULT_BODY);
    }

    #[tokio::test]
    async fn test_push_display_failure_is_swallowed() {
        let host = MockHost::failing_display();

        // Must not panic and must not propagate.
        on_push(&host, PushBody::Text("💬 hello".to_string())).await;

        assert!(host.shown().is_empty());
    }

    #[tokio::test]
    async fn test_push_payload_timestamp_from_host_clock() {
        let host = MockHost::new();

        on_push(&host, PushBody::Empty).await;

        assert_eq!(host.shown()[0].data.timestamp, TEST_NOW);
    }

    // === Notification click ===

    #[tokio::test]
    async fn test_click_dismiss_only_closes() {
        let host = MockHost::with_sessions(vec![MockSession::new(
            "https://hfa.example.com/roster",
        )]);
        let notification = MockNotification::new();

        let outcome = on_notification_click(&host, &notification, Some("dismiss"))
            .await
            .expect("dismiss click");

        assert_eq!(outcome, ClickOutcome::ClosedOnly);
        assert!(notification.is_closed());
        assert!(!*host.sessions[0].focused.borrow(), "no session focused");
        assert!(host.opened.borrow().is_empty(), "no window opened");
    }

    #[tokio::test]
    async fn test_click_open_focuses_matching_session() {
        let sessions = vec![
            MockSession::new("https://other.example.net/page"),
            MockSession::new("https://hfa.example.com/schedule"),
        ];
        let host = MockHost::with_sessions(sessions);
        let notification = MockNotification::new();

        let outcome = on_notification_click(&host, &notification, Some("open"))
            .await
            .expect("open click");

        assert_eq!(outcome, ClickOutcome::Focused);
        assert!(notification.is_closed());
        assert!(!*host.sessions[0].focused.borrow(), "foreign origin skipped");
        assert!(*host.sessions[1].focused.borrow(), "matching session focused");
        assert!(host.opened.borrow().is_empty(), "no new window when focusing");
    }

    #[tokio::test]
    async fn test_click_default_tap_behaves_like_open() {
        let host = MockHost::with_sessions(vec![MockSession::new(
            "https://hfa.example.com/",
        )]);
        let notification = MockNotification::new();

        let outcome = on_notification_click(&host, &notification, None)
            .await
            .expect("default tap");

        assert_eq!(outcome, ClickOutcome::Focused);
        assert!(*host.sessions[0].focused.borrow());
    }

    #[tokio::test]
    async fn test_click_open_without_matching_session_opens_window() {
        let host = MockHost::with_sessions(vec![MockSession::new(
            "https://other.example.net/page",
        )]);
        let notification = MockNotification::new();

        let outcome = on_notification_click(&host, &notification, Some("open"))
            .await
            .expect("open click");

        assert_eq!(outcome, ClickOutcome::Opened);
        assert_eq!(*host.opened.borrow(), vec![OPEN_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_click_open_with_no_sessions_opens_window() {
        let host = MockHost::new();
        let notification = MockNotification::new();

        let outcome = on_notification_click(&host, &notification, None)
            .await
            .expect("default tap");

        assert_eq!(outcome, ClickOutcome::Opened);
        assert_eq!(host.opened.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_click_unknown_action_only_closes() {
        let host = MockHost::with_sessions(vec![MockSession::new(
            "https://hfa.example.com/",
        )]);
        let notification = MockNotification::new();

        let outcome = on_notification_click(&host, &notification, Some("archive"))
            .await
            .expect("unknown action");

        assert_eq!(outcome, ClickOutcome::ClosedOnly);
        assert!(notification.is_closed());
        assert!(!*host.sessions[0].focused.borrow());
    }

    // === Lifecycle ===

    #[test]
    fn test_install_skips_waiting() {
        let host = MockHost::new();

        on_install(&host);

        assert_eq!(*host.skip_waiting_calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_activate_claims_sessions() {
        let host = MockHost::new();

        on_activate(&host).await.expect("activate");

        assert!(*host.claimed.borrow());
    }

    // === Background sync ===

    #[tokio::test]
    async fn test_sync_with_designated_tag_resolves() {
        // Resolves without throwing and without observable transfer.
        on_sync(BACKGROUND_SYNC_TAG).await;
    }

    #[tokio::test]
    async fn test_sync_with_other_tag_is_ignored() {
        on_sync("periodic-cleanup").await;
    }
}
