//! In-browser smoke tests, run with `wasm-pack test --headless`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use hfa_push_worker::payload::NotificationPayload;
use hfa_push_worker::{handle_sync, ping, BACKGROUND_SYNC_TAG};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn ping_reports_loaded() {
    assert!(ping().contains("loaded"));
}

#[wasm_bindgen_test]
fn payload_serializes_to_plain_object() {
    let payload = NotificationPayload::new(1_700_000_000_000);
    let options = serde_wasm_bindgen::to_value(&payload).expect("payload to JsValue");

    assert!(options.is_object(), "showNotification needs a plain object");
    let tag = js_sys::Reflect::get(&options, &"tag".into()).expect("tag field");
    assert_eq!(tag.as_string().as_deref(), Some("general"));
}

#[wasm_bindgen_test]
async fn sync_promise_resolves() {
    let result = wasm_bindgen_futures::JsFuture::from(handle_sync(BACKGROUND_SYNC_TAG)).await;
    assert!(result.is_ok(), "background sync must resolve");
}
