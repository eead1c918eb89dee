// Event Services
// Inbound IPC channels and outbound event sinks

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;

use crate::services::WindowId;

/// Channel a window uses to announce a color theme change
pub const CHANGE_COLOR_THEME_CHANNEL: &str = "changeColorTheme";

pub type IpcHandler = Box<dyn Fn(WindowId, &Value) + Send + Sync>;

/// Source of messages sent by windows to the shell
pub trait IpcListener: Send + Sync {
    fn on(&self, channel: &str, handler: IpcHandler);
}

/// In-process IPC bus
#[derive(Default)]
pub struct LocalIpcBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn Fn(WindowId, &Value) + Send + Sync>>>>,
}

impl LocalIpcBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a message to every handler on `channel`, returning how many ran
    pub fn send(&self, channel: &str, window_id: WindowId, payload: &Value) -> usize {
        // Handlers run without the lock held so they may register further handlers
        let handlers = match self.handlers.read() {
            Ok(handlers) => handlers.get(channel).cloned().unwrap_or_default(),
            Err(_) => return 0,
        };

        if handlers.is_empty() {
            log::debug!("No IPC handler registered for '{channel}'");
        }

        for handler in &handlers {
            handler(window_id, payload);
        }

        handlers.len()
    }
}

impl IpcListener for LocalIpcBus {
    fn on(&self, channel: &str, handler: IpcHandler) {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers
                .entry(channel.to_string())
                .or_default()
                .push(Arc::from(handler));
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &str, payload: Value);
}

pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &str, _payload: Value) {}
}

pub fn emit_event<T: Serialize>(sink: &dyn EventSink, event: &str, payload: &T) {
    if let Ok(value) = serde_json::to_value(payload) {
        sink.emit(event, value);
    }
}
