#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter, prelude::*};
use tracing_appender::rolling;

use serde_json::{json, Value};
use tool_catalog::models::{ToolInput, WireItem};

static START: Once = Once::new();
static _GUARD: Lazy<std::sync::Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> =
    Lazy::new(|| std::sync::Mutex::new(None));

/// Initialize test environment: dotenv and tracing (stderr + file).
/// Idempotent: safe to call multiple times.
pub fn init() {
    START.call_once(|| {
        let _ = dotenvy::dotenv();
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .expect("env filter");

        // Daily rotating log file separate from app runtime logs
        let file_appender = rolling::daily("logs", "tests.log");
        let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
        *_GUARD.lock().unwrap() = Some(guard); // retain guard for lifetime

        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(file_nb);

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init();

        tracing::info!(target="test_init", "Test tracing initialized (stderr + rotating file)");
    });
}

/// 1x1 PNG の base64 (署名部分)
pub const PNG_B64: &str = "iVBORw0KGgo=";

pub fn png_item(label: &str) -> Value {
    json!({
        "label": label,
        "image": { "data": format!("data:image/png;base64,{PNG_B64}"), "typeFile": "image/png" }
    })
}

pub fn tool_json(name: &str, acronym: &str, items: Vec<Value>) -> Value {
    json!({ "name": name, "acronym": acronym, "category": "Security", "items": items })
}

pub fn tool_input(name: &str, acronym: &str, labels: &[&str]) -> ToolInput {
    let items = labels.iter().map(|l| png_item(l)).collect();
    serde_json::from_value(tool_json(name, acronym, items)).expect("valid tool input")
}

pub fn label(item: &WireItem) -> Option<&str> {
    item.fields.get("label").and_then(Value::as_str)
}
