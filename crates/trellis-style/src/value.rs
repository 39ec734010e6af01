//! Style property values.

use std::fmt;

use serde::{Deserialize, Serialize};
use trellis_render::Color;

use crate::style::Style;

/// Widget status selecting an entry of a [`ColorMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Normal,
    Active,
    Inactive,
    Off,
}

impl Status {
    fn index(self) -> usize {
        match self {
            Status::Normal => 0,
            Status::Active => 1,
            Status::Inactive => 2,
            Status::Off => 3,
        }
    }
}

/// Colors indexed by [`Status`].
///
/// Missing entries fall back to the `Normal` color.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap {
    colors: Vec<Color>,
}

impl ColorMap {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    /// Build the four status colors from one base color.
    pub fn from_base(base: Color) -> Self {
        Self::new([
            base,
            base.illuminated(1.333),
            base.illuminated(0.666),
            base.illuminated(0.333),
        ])
    }

    /// The color for `status`, or transparent for an empty map.
    pub fn get(&self, status: Status) -> Color {
        self.colors
            .get(status.index())
            .or_else(|| self.colors.first())
            .copied()
            .unwrap_or(Color::TRANSPARENT)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Font description consumed by text-drawing widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    pub slant: FontSlant,
    pub weight: FontWeight,
    pub size: f64,
    pub align: TextAlign,
    pub valign: TextVAlign,
    pub line_spacing: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "sans".to_owned(),
            slant: FontSlant::Normal,
            weight: FontWeight::Normal,
            size: 12.0,
            align: TextAlign::Left,
            valign: TextVAlign::Middle,
            line_spacing: 1.25,
        }
    }
}

/// A stroked line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Line {
    pub color: Color,
    pub width: f64,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0.0,
        }
    }
}

/// Widget border: outer margin, the line, inner padding, corner radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub line: Line,
    pub margin: f64,
    pub padding: f64,
    pub radius: f64,
}

impl Border {
    pub fn new(line: Line, margin: f64, padding: f64, radius: f64) -> Self {
        Self {
            line,
            margin,
            padding,
            radius,
        }
    }

    /// Space the border takes up on each side.
    pub fn total_width(&self) -> f64 {
        self.margin + self.line.width + self.padding
    }
}

/// Background fill.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Fill {
    #[default]
    None,
    Solid(Color),
}

impl Fill {
    pub fn color(&self) -> Option<Color> {
        match self {
            Fill::None => None,
            Fill::Solid(c) => Some(*c),
        }
    }
}

impl TryFrom<String> for Fill {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("none") {
            return Ok(Fill::None);
        }
        Color::try_from(value).map(Fill::Solid)
    }
}

impl From<Fill> for String {
    fn from(fill: Fill) -> Self {
        match fill {
            Fill::None => "none".to_owned(),
            Fill::Solid(c) => c.to_string(),
        }
    }
}

/// Any value a style can hold under a URID key.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Color(Color),
    ColorMap(ColorMap),
    Font(Font),
    Border(Border),
    Fill(Fill),
    Number(f64),
    Text(String),
    /// A nested style.
    Style(Style),
}

impl StyleValue {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            StyleValue::Color(_) => "color",
            StyleValue::ColorMap(_) => "colormap",
            StyleValue::Font(_) => "font",
            StyleValue::Border(_) => "border",
            StyleValue::Fill(_) => "fill",
            StyleValue::Number(_) => "number",
            StyleValue::Text(_) => "text",
            StyleValue::Style(_) => "style",
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Color(c) => write!(f, "{c}"),
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Text(t) => write!(f, "{t:?}"),
            StyleValue::Style(s) => write!(f, "style({} entries)", s.len()),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Typed access to a [`StyleValue`] variant.
pub trait StyleProperty: Sized {
    fn from_value(value: &StyleValue) -> Option<&Self>;
    fn into_value(self) -> StyleValue;
}

macro_rules! style_property {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl StyleProperty for $ty {
                fn from_value(value: &StyleValue) -> Option<&Self> {
                    match value {
                        StyleValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn into_value(self) -> StyleValue {
                    StyleValue::$variant(self)
                }
            }

            impl From<$ty> for StyleValue {
                fn from(v: $ty) -> Self {
                    StyleValue::$variant(v)
                }
            }
        )*
    };
}

style_property! {
    Color => Color,
    ColorMap => ColorMap,
    Font => Font,
    Border => Border,
    Fill => Fill,
    f64 => Number,
    String => Text,
    Style => Style,
}
