//! Notification payload model and message classification.
//!
//! One `NotificationPayload` is built per push event, classified by
//! inspecting the message text for category markers, handed to the
//! display call once, and discarded. Serialized field names match the
//! browser's Notification options shape, so the struct can be passed
//! to `showNotification` directly.

use serde::{Deserialize, Serialize};

/// Notification icon (192px app icon).
pub const ICON_PATH: &str = "/icons/Icon-192.png";
/// Status bar badge (96px app icon).
pub const BADGE_PATH: &str = "/icons/Icon-96.png";
/// Large notification image (512px app icon).
pub const IMAGE_PATH: &str = "/icons/Icon-512.png";
/// HFA notification sound, shared by every message category.
pub const SOUND_PATH: &str = "/sounds/hfasound.mp3";
/// Vibration pattern in milliseconds.
pub const VIBRATION_PATTERN: [u32; 3] = [200, 100, 200];
/// Body text shown when a push event carries no readable payload.
pub const DEFAULT_BODY: &str = "You have a new message";
/// Click destination for the default tap and the "open" action.
pub const OPEN_URL: &str = "/";

/// Marker substring for thread messages. Checked before the gear
/// marker, so a message carrying both classifies as a thread message.
const THREAD_MESSAGE_MARKER: &str = "💬";
/// Marker substring for gear updates.
const GEAR_UPDATE_MARKER: &str = "🎽";

/// Message category, derived from marker substrings in the body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    ThreadMessage,
    GearUpdate,
    General,
}

impl MessageCategory {
    /// Classify message text by markers, in fixed priority order.
    pub fn classify(text: &str) -> Self {
        if text.contains(THREAD_MESSAGE_MARKER) {
            MessageCategory::ThreadMessage
        } else if text.contains(GEAR_UPDATE_MARKER) {
            MessageCategory::GearUpdate
        } else {
            MessageCategory::General
        }
    }

    /// Notification title for this category.
    pub fn title(&self) -> &'static str {
        match self {
            MessageCategory::ThreadMessage => "New Thread Message",
            MessageCategory::GearUpdate => "Gear Update",
            MessageCategory::General => "HFA Notification",
        }
    }

    /// Notification tag for this category. Same-tag notifications
    /// replace each other in the browser's notification tray.
    pub fn tag(&self) -> &'static str {
        match self {
            MessageCategory::ThreadMessage => "thread-message",
            MessageCategory::GearUpdate => "gear-update",
            MessageCategory::General => "general",
        }
    }
}

/// A notification action button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Action id reported back on `notificationclick`.
    pub action: String,
    /// Button label.
    pub title: String,
    /// Button icon path.
    pub icon: String,
}

/// Opaque data attached to the notification, available to the click
/// handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    /// Click destination.
    pub url: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: u64,
}

/// Options object for a single `showNotification` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub image: String,
    pub sound: String,
    pub vibrate: Vec<u32>,
    pub tag: String,
    pub renotify: bool,
    #[serde(rename = "requireInteraction")]
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
    pub data: NotificationData,
}

impl NotificationPayload {
    /// Default payload for a push event received at `now_millis`.
    pub fn new(now_millis: u64) -> Self {
        Self {
            title: MessageCategory::General.title().to_string(),
            body: DEFAULT_BODY.to_string(),
            icon: ICON_PATH.to_string(),
            badge: BADGE_PATH.to_string(),
            image: IMAGE_PATH.to_string(),
            sound: SOUND_PATH.to_string(),
            vibrate: VIBRATION_PATTERN.to_vec(),
            tag: MessageCategory::General.tag().to_string(),
            renotify: true,
            require_interaction: false,
            actions: vec![
                NotificationAction {
                    action: "open".to_string(),
                    title: "Open App".to_string(),
                    icon: "/icons/open.png".to_string(),
                },
                NotificationAction {
                    action: "dismiss".to_string(),
                    title: "Dismiss".to_string(),
                    icon: "/icons/dismiss.png".to_string(),
                },
            ],
            data: NotificationData {
                url: OPEN_URL.to_string(),
                timestamp: now_millis,
            },
        }
    }

    /// Apply inbound message text: the body becomes the raw text and
    /// title/tag follow the marker classification.
    ///
    /// Every branch assigns the same HFA sound. The per-branch
    /// assignment is the customization point for future per-category
    /// sounds.
    pub fn apply_message(&mut self, text: &str) {
        self.body = text.to_string();

        let category = MessageCategory::classify(text);
        self.title = category.title().to_string();
        self.tag = category.tag().to_string();
        match category {
            MessageCategory::ThreadMessage => {
                self.sound = SOUND_PATH.to_string();
            }
            MessageCategory::GearUpdate => {
                self.sound = SOUND_PATH.to_string();
            }
            MessageCategory::General => {
                self.sound = SOUND_PATH.to_string();
            }
        }
    }
}
