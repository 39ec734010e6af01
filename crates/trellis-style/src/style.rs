//! URID-keyed property maps.

use std::collections::BTreeMap;

use trellis_core::Urid;

use crate::value::{StyleProperty, StyleValue};

/// A mapping from URID keys to style values.
///
/// Values may themselves be styles, which gives themes their hierarchy.
/// Styles are only ever queried; nothing is inherited by mutation.
///
/// ```
/// use trellis_core::urid;
/// use trellis_render::Color;
/// use trellis_style::Style;
///
/// let key = urid("urn:example:style#accent");
/// let style = Style::new().with(key, Color::RED);
/// assert_eq!(style.get_as::<Color>(key), Some(&Color::RED));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    props: BTreeMap<Urid, StyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: Urid, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: Urid, value: impl Into<StyleValue>) -> Option<StyleValue> {
        self.props.insert(key, value.into())
    }

    pub fn remove(&mut self, key: Urid) -> Option<StyleValue> {
        self.props.remove(&key)
    }

    pub fn get(&self, key: Urid) -> Option<&StyleValue> {
        self.props.get(&key)
    }

    /// Typed lookup; `None` when absent or of another kind.
    pub fn get_as<T: StyleProperty>(&self, key: Urid) -> Option<&T> {
        self.get(key).and_then(T::from_value)
    }

    /// Follow a chain of nested styles. The last key names the value.
    pub fn get_path(&self, path: &[Urid]) -> Option<&StyleValue> {
        let (last, parents) = path.split_last()?;
        let mut style = self;
        for key in parents {
            style = style.get_as::<Style>(*key)?;
        }
        style.get(*last)
    }

    /// The nested style under `key`, if any.
    pub fn substyle(&self, key: Urid) -> Option<&Style> {
        self.get_as::<Style>(key)
    }

    pub fn contains(&self, key: Urid) -> bool {
        self.props.contains_key(&key)
    }

    /// Overlay `other` on top of this style. Nested styles are merged
    /// recursively; every other value in `other` replaces the current one.
    pub fn merge(&mut self, other: &Style) {
        for (key, value) in &other.props {
            if let (Some(StyleValue::Style(mine)), StyleValue::Style(theirs)) =
                (self.props.get_mut(key), value)
            {
                mine.merge(theirs);
                continue;
            }
            self.props.insert(*key, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Urid, &StyleValue)> {
        self.props.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}
