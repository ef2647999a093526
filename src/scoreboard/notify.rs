/// Publishing to presentation surface channels
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::host::PresentationSurface;

/// Forwards show/hide/data calls to the surface and remembers which
/// channels it has made visible
pub struct NotificationBridge {
    surface: Arc<dyn PresentationSurface>,
    visible: HashMap<String, bool>,
}

impl NotificationBridge {
    pub fn new(surface: Arc<dyn PresentationSurface>) -> Self {
        Self {
            surface,
            visible: HashMap::new(),
        }
    }

    pub fn show(&mut self, channel: &str, payload: &str) {
        tracing::debug!("show {} {}", channel, payload);
        self.surface.show(channel, payload);
        self.visible.insert(channel.to_string(), true);
    }

    pub fn hide(&mut self, channel: &str) {
        tracing::debug!("hide {}", channel);
        self.surface.hide(channel);
        self.visible.insert(channel.to_string(), false);
    }

    /// Replace the channel's data; with `force_visible` also show it if hidden
    pub fn notify(&mut self, channel: &str, payload: &str, force_visible: bool) {
        self.surface.send(channel, payload);
        if force_visible && !self.is_visible(channel) {
            self.show(channel, payload);
        }
    }

    /// Serialize `value` and show it; serialization failures are logged and dropped
    pub fn show_value<T: Serialize>(&mut self, channel: &str, value: &T) {
        if let Some(payload) = encode(channel, value) {
            self.show(channel, &payload);
        }
    }

    /// Serialize `value` and notify with it
    pub fn notify_value<T: Serialize>(&mut self, channel: &str, value: &T, force_visible: bool) {
        if let Some(payload) = encode(channel, value) {
            self.notify(channel, &payload, force_visible);
        }
    }

    /// Last visibility this bridge set on the channel
    pub fn is_visible(&self, channel: &str) -> bool {
        self.visible.get(channel).copied().unwrap_or(false)
    }
}

fn encode<T: Serialize>(channel: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!("Failed to encode payload for {}: {}", channel, e);
            None
        }
    }
}
