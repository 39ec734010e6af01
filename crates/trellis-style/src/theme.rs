//! Themes: per-widget styles registered at the root.
//!
//! A theme maps widget URIDs to styles and carries a `defaults` style used
//! when neither the widget's own style nor its theme entry defines a key.
//!
//! Themes load from TOML:
//!
//! ```toml
//! name = "night"
//!
//! [defaults]
//! fgcolors = ["#C0C0C0", "#FFFFFF"]
//!
//! [widgets."urn:example:dial"]
//! background = "#202020"
//! border = { line = { color = "#000000", width = 1.0 }, radius = 4.0 }
//!
//! [widgets."urn:example:dial".knob]
//! size = 12.0
//! ```
//!
//! Keys are URIs or the short aliases from [`keys`](crate::keys). Values of
//! well-known keys must have the matching shape; other values are inferred:
//! hex strings become colors, other strings text, numbers numbers, arrays
//! color maps and tables nested styles.

use std::collections::HashMap;
use std::path::Path;

use trellis_core::logging::targets;
use trellis_core::{urid, Urid};
use trellis_render::Color;

use crate::error::{StyleError, StyleResult};
use crate::keys::{self, KeyKind};
use crate::style::Style;
use crate::value::{Border, ColorMap, Fill, Font, Line, StyleProperty, StyleValue};

/// A named collection of widget styles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Theme {
    name: String,
    defaults: Style,
    widgets: HashMap<Urid, Style>,
}

impl Theme {
    /// An empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The built-in dark theme.
    pub fn builtin() -> Self {
        let defaults = Style::new()
            .with(keys::background(), Fill::None)
            .with(keys::border(), Border::default())
            .with(keys::font(), Font::default())
            .with(
                keys::fgcolors(),
                ColorMap::new([
                    Color::from_rgb8(0xC0, 0xC0, 0xC0),
                    Color::from_rgb8(0xFF, 0xFF, 0xFF),
                    Color::from_rgb8(0x60, 0x60, 0x60),
                    Color::from_rgb8(0x20, 0x20, 0x20),
                ]),
            )
            .with(keys::bgcolors(), ColorMap::from_base(Color::from_rgb8(0x40, 0x40, 0x40)))
            .with(
                keys::txcolors(),
                ColorMap::new([
                    Color::from_rgb8(0xE0, 0xE0, 0xE0),
                    Color::WHITE,
                    Color::from_rgb8(0x80, 0x80, 0x80),
                    Color::from_rgb8(0x40, 0x40, 0x40),
                ]),
            );

        let window = Style::new()
            .with(keys::background(), Fill::Solid(Color::from_rgb8(0x10, 0x10, 0x10)))
            .with(
                keys::border(),
                Border::new(Line { color: Color::BLACK, width: 0.0 }, 0.0, 0.0, 0.0),
            );

        let mut theme = Self {
            name: "builtin".to_owned(),
            defaults,
            widgets: HashMap::new(),
        };
        theme.set_widget_style(urid(keys::WINDOW_URI), window);
        theme
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn defaults(&self) -> &Style {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut Style {
        &mut self.defaults
    }

    /// Register (or replace) the style for a widget key.
    pub fn set_widget_style(&mut self, widget: Urid, style: Style) {
        self.widgets.insert(widget, style);
    }

    pub fn widget_style(&self, widget: Urid) -> Option<&Style> {
        self.widgets.get(&widget)
    }

    /// Overlay another theme on this one.
    pub fn merge(&mut self, other: &Theme) {
        self.defaults.merge(&other.defaults);
        for (widget, style) in &other.widgets {
            self.widgets.entry(*widget).or_default().merge(style);
        }
    }

    /// Resolve `key` for a widget: its local style first, then the theme
    /// entry for `widget`, then the theme defaults.
    pub fn resolve<'a>(&'a self, local: &'a Style, widget: Urid, key: Urid) -> Option<&'a StyleValue> {
        local
            .get(key)
            .or_else(|| self.widget_style(widget).and_then(|s| s.get(key)))
            .or_else(|| self.defaults.get(key))
    }

    /// Typed [`resolve`](Self::resolve). Sources holding `key` with another
    /// kind are skipped.
    pub fn resolve_as<'a, T: StyleProperty>(
        &'a self,
        local: &'a Style,
        widget: Urid,
        key: Urid,
    ) -> Option<&'a T> {
        let found = local
            .get_as::<T>(key)
            .or_else(|| self.widget_style(widget).and_then(|s| s.get_as::<T>(key)))
            .or_else(|| self.defaults.get_as::<T>(key));
        if found.is_none() {
            tracing::trace!(target: targets::STYLE, %widget, %key, "style key not found");
        }
        found
    }

    /// Parse a theme from TOML.
    pub fn from_toml_str(source: &str) -> StyleResult<Self> {
        let doc: toml::Table = toml::from_str(source)?;
        let mut theme = Theme::new(doc.get("name").and_then(|v| v.as_str()).unwrap_or("unnamed"));

        for (key, value) in doc {
            match (key.as_str(), value) {
                ("name", _) => {}
                ("defaults", toml::Value::Table(table)) => theme.defaults = style_from_table(table)?,
                ("widgets", toml::Value::Table(table)) => {
                    for (widget, value) in table {
                        let toml::Value::Table(table) = value else {
                            return Err(StyleError::invalid_value(widget, "expected a table"));
                        };
                        let id = key_urid(&widget)?;
                        theme.widgets.insert(id, style_from_table(table)?);
                    }
                }
                (other, _) => {
                    tracing::warn!(target: targets::STYLE, key = other, "ignoring unknown theme entry");
                }
            }
        }

        tracing::debug!(
            target: targets::STYLE,
            name = %theme.name,
            widgets = theme.widgets.len(),
            "loaded theme"
        );
        Ok(theme)
    }

    /// Read and parse a TOML theme file.
    pub fn from_file(path: impl AsRef<Path>) -> StyleResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| StyleError::io(path, e))?;
        Self::from_toml_str(&source)
    }
}

fn key_urid(name: &str) -> StyleResult<Urid> {
    let uri = keys::expand(name.trim());
    if uri.is_empty() {
        return Err(StyleError::InvalidKey { key: name.to_owned() });
    }
    Ok(urid(uri))
}

fn style_from_table(table: toml::Table) -> StyleResult<Style> {
    let mut style = Style::new();
    for (name, value) in table {
        let id = key_urid(&name)?;
        let value = value_from_toml(&name, keys::expand(name.trim()), value)?;
        style.set(id, value);
    }
    Ok(style)
}

fn typed<T: serde::de::DeserializeOwned>(name: &str, value: toml::Value) -> StyleResult<T> {
    value
        .try_into()
        .map_err(|e: toml::de::Error| StyleError::invalid_value(name, e.message()))
}

fn value_from_toml(name: &str, uri: &str, value: toml::Value) -> StyleResult<StyleValue> {
    if let Some(kind) = keys::kind_of(uri) {
        return Ok(match kind {
            KeyKind::Fill => StyleValue::Fill(typed(name, value)?),
            KeyKind::Border => StyleValue::Border(typed(name, value)?),
            KeyKind::Font => StyleValue::Font(typed(name, value)?),
            KeyKind::ColorMap => StyleValue::ColorMap(typed(name, value)?),
        });
    }

    match value {
        toml::Value::String(s) => Ok(match Color::from_hex(&s) {
            Some(color) if s.starts_with('#') => StyleValue::Color(color),
            _ => StyleValue::Text(s),
        }),
        toml::Value::Integer(i) => Ok(StyleValue::Number(i as f64)),
        toml::Value::Float(f) => Ok(StyleValue::Number(f)),
        array @ toml::Value::Array(_) => Ok(StyleValue::ColorMap(typed(name, array)?)),
        toml::Value::Table(table) => Ok(StyleValue::Style(style_from_table(table)?)),
        other => Err(StyleError::invalid_value(
            name,
            format!("unsupported {} value", other.type_str()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let widget = urid("urn:trellis:test#resolve-widget");
        let key = keys::fgcolors();

        let mut theme = Theme::builtin();
        let from_defaults = theme.resolve_as::<ColorMap>(&Style::new(), widget, key).cloned();
        assert!(from_defaults.is_some());

        let themed = ColorMap::new([Color::RED]);
        theme.set_widget_style(widget, Style::new().with(key, themed.clone()));
        assert_eq!(theme.resolve_as::<ColorMap>(&Style::new(), widget, key), Some(&themed));

        let local = Style::new().with(key, ColorMap::new([Color::BLUE]));
        assert_eq!(
            theme.resolve_as::<ColorMap>(&local, widget, key).map(|m| m.get(Default::default())),
            Some(Color::BLUE)
        );
    }

    #[test]
    fn test_resolve_skips_wrong_kind() {
        let widget = urid("urn:trellis:test#wrong-kind");
        let theme = Theme::builtin();
        let local = Style::new().with(keys::font(), 3.0);
        assert_eq!(theme.resolve_as::<Font>(&local, widget, keys::font()), Some(&Font::default()));
    }

    #[test]
    fn test_parse_theme() {
        let theme = Theme::from_toml_str(
            r##"
            name = "night"

            [defaults]
            background = "#202020"
            "urn:trellis:test#gap" = 4

            [widgets."urn:trellis:test#dial"]
            border = { line = { color = "#FF0000", width = 2.0 }, radius = 3.0 }
            label = "Gain"

            [widgets."urn:trellis:test#dial".knob]
            tint = "#00FF00"
            "##,
        )
        .unwrap();

        assert_eq!(theme.name(), "night");
        assert_eq!(
            theme.defaults().get_as::<Fill>(keys::background()),
            Some(&Fill::Solid(Color::from_rgb8(0x20, 0x20, 0x20)))
        );
        assert_eq!(
            theme.defaults().get(urid("urn:trellis:test#gap")),
            Some(&StyleValue::Number(4.0))
        );

        let dial = theme.widget_style(urid("urn:trellis:test#dial")).unwrap();
        let border = dial.get_as::<Border>(keys::border()).unwrap();
        assert_eq!(border.line.color, Color::RED);
        assert_eq!(border.radius, 3.0);
        assert_eq!(border.padding, 0.0);
        assert_eq!(dial.get_as::<String>(urid("label")).map(String::as_str), Some("Gain"));
        assert_eq!(
            dial.get_path(&[urid("knob"), urid("tint")]),
            Some(&StyleValue::Color(Color::GREEN))
        );
    }

    #[test]
    fn test_wrong_shape_for_known_key() {
        let err = Theme::from_toml_str("[defaults]\nborder = \"#FFFFFF\"\n").unwrap_err();
        assert!(matches!(err, StyleError::InvalidValue { ref property, .. } if property == "border"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Theme::from_toml_str("[widgets.\"\"]\nx = 1\n").unwrap_err();
        assert!(matches!(err, StyleError::InvalidKey { .. }));
    }

    #[test]
    fn test_merge_themes() {
        let widget = urid("urn:trellis:test#merge");
        let mut base = Theme::builtin();
        let mut overlay = Theme::new("overlay");
        overlay.set_widget_style(widget, Style::new().with(keys::font(), Font { size: 20.0, ..Font::default() }));
        base.merge(&overlay);
        assert_eq!(
            base.resolve_as::<Font>(&Style::new(), widget, keys::font()).map(|f| f.size),
            Some(20.0)
        );
    }
}
