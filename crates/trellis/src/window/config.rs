//! Window configuration and builder.
//!
//! `WindowConfig` collects everything needed to create a root window and
//! its host view. It can be built in code or loaded from TOML:
//!
//! ```
//! use trellis::WindowConfig;
//!
//! let config = WindowConfig::from_toml_str(r#"
//!     title = "Synth"
//!     width = 640
//!     height = 360
//!     zoom = 1.5
//!     focus_activation_ms = 500
//! "#).unwrap();
//! assert_eq!(config.title(), "Synth");
//! assert_eq!(config.zoom(), 1.5);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::event::EventType;
use crate::host::{ViewConfig, WorldType};
use crate::widget::DEFAULT_FOCUS_DELAY;

/// Default timeout of one `run` iteration.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_millis(20);

/// Configuration for creating a root window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    title: String,
    /// Root extends in toolkit units.
    width: u32,
    height: u32,
    resizable: bool,
    /// Host pixels per toolkit unit.
    zoom: f64,
    /// Native parent window for embedded (plugin) views.
    parent: Option<u64>,
    world_type: WorldType,
    /// Default pointer-focus activation time.
    focus_activation_ms: u64,
    /// Event types allowed to merge unless a widget overrides it.
    #[serde(deserialize_with = "deserialize_event_mask")]
    merge: EventType,
    /// How long one `run` iteration waits for host input.
    update_timeout_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("trellis")
    }
}

impl WindowConfig {
    /// Create a configuration with the given title and defaults elsewhere.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 400,
            height: 300,
            resizable: true,
            zoom: 1.0,
            parent: None,
            world_type: WorldType::Program,
            focus_activation_ms: DEFAULT_FOCUS_DELAY.as_millis() as u64,
            merge: EventType::MERGEABLE,
            update_timeout_ms: DEFAULT_UPDATE_TIMEOUT.as_millis() as u64,
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Set the root extends.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set the zoom factor. Non-positive or non-finite values are ignored.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
        self
    }

    /// Embed the view into a native parent window.
    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_world_type(mut self, world_type: WorldType) -> Self {
        self.world_type = world_type;
        self
    }

    pub fn with_focus_activation(mut self, delay: Duration) -> Self {
        self.focus_activation_ms = delay.as_millis() as u64;
        self
    }

    /// Set the event types allowed to merge by default.
    pub fn with_merge_mask(mut self, mask: EventType) -> Self {
        self.merge = mask;
        self
    }

    pub fn with_update_timeout(mut self, timeout: Duration) -> Self {
        self.update_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }

    pub fn parent(&self) -> Option<u64> {
        self.parent
    }

    pub fn world_type(&self) -> WorldType {
        self.world_type
    }

    pub fn focus_activation(&self) -> Duration {
        Duration::from_millis(self.focus_activation_ms)
    }

    pub fn merge_mask(&self) -> EventType {
        self.merge
    }

    pub fn update_timeout(&self) -> Duration {
        Duration::from_millis(self.update_timeout_ms)
    }

    /// Host view parameters; the view size includes the zoom.
    pub fn view_config(&self) -> ViewConfig {
        let zoom = self.zoom();
        ViewConfig {
            title: self.title.clone(),
            width: (f64::from(self.width) * zoom).ceil() as u32,
            height: (f64::from(self.height) * zoom).ceil() as u32,
            resizable: self.resizable,
            parent: self.parent,
            world_type: self.world_type,
        }
    }
}

/// Event masks are written as lists of type names:
/// `merge = ["expose", "motion"]`.
fn deserialize_event_mask<'de, D>(deserializer: D) -> Result<EventType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    let mut mask = EventType::empty();
    for name in names {
        let bit = event_type_by_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown event type `{name}`")))?;
        mask |= bit;
    }
    Ok(mask)
}

fn event_type_by_name(name: &str) -> Option<EventType> {
    let kind = match name {
        "configure" => EventType::CONFIGURE_REQUEST,
        "expose" => EventType::EXPOSE_REQUEST,
        "close" => EventType::CLOSE_REQUEST,
        "key_press" => EventType::KEY_PRESS,
        "key_release" => EventType::KEY_RELEASE,
        "button_press" => EventType::BUTTON_PRESS,
        "button_release" => EventType::BUTTON_RELEASE,
        "button_click" => EventType::BUTTON_CLICK,
        "motion" => EventType::POINTER_MOTION,
        "drag" => EventType::POINTER_DRAG,
        "wheel" => EventType::WHEEL_SCROLL,
        "value" => EventType::VALUE_CHANGED,
        "focus_in" => EventType::POINTER_FOCUS_IN,
        "focus_out" => EventType::POINTER_FOCUS_OUT,
        "message" => EventType::MESSAGE,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WindowConfig::new("x");
        assert_eq!(config.focus_activation(), Duration::from_millis(200));
        assert_eq!(config.update_timeout(), Duration::from_millis(20));
        assert_eq!(config.merge_mask(), EventType::MERGEABLE);
        assert_eq!(config.world_type(), WorldType::Program);
    }

    #[test]
    fn test_toml_merge_mask_and_world() {
        let config = WindowConfig::from_toml_str(
            r#"
            merge = ["expose", "wheel"]
            world_type = "module"
            parent = 4242
            "#,
        )
        .unwrap();
        assert_eq!(config.merge_mask(), EventType::EXPOSE_REQUEST | EventType::WHEEL_SCROLL);
        assert_eq!(config.world_type(), WorldType::Module);
        assert_eq!(config.parent(), Some(4242));
        assert_eq!(config.title(), "trellis");
    }

    #[test]
    fn test_unknown_event_name_is_rejected() {
        assert!(WindowConfig::from_toml_str(r#"merge = ["bogus"]"#).is_err());
    }

    #[test]
    fn test_view_config_applies_zoom() {
        let view = WindowConfig::new("z").with_size(100, 50).with_zoom(2.0).view_config();
        assert_eq!((view.width, view.height), (200, 100));
    }

    #[test]
    fn test_invalid_zoom_ignored() {
        assert_eq!(WindowConfig::new("z").with_zoom(-1.0).zoom(), 1.0);
    }
}
