//! Well-known style keys.
//!
//! Each key is a URI; the functions intern it in the process-wide URID table.
//! Theme files may use the short alias (`"background"`) or the full URI.

use trellis_core::{urid, Urid};

pub const BACKGROUND_URI: &str = "urn:trellis:style#background";
pub const BORDER_URI: &str = "urn:trellis:style#border";
pub const FONT_URI: &str = "urn:trellis:style#font";
pub const FGCOLORS_URI: &str = "urn:trellis:style#fgColors";
pub const BGCOLORS_URI: &str = "urn:trellis:style#bgColors";
pub const TXCOLORS_URI: &str = "urn:trellis:style#txColors";

/// Theme key of the root window.
pub const WINDOW_URI: &str = "urn:trellis:widget#window";

/// The kind of value a well-known key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyKind {
    Fill,
    Border,
    Font,
    ColorMap,
}

const WELL_KNOWN: &[(&str, &str, KeyKind)] = &[
    ("background", BACKGROUND_URI, KeyKind::Fill),
    ("border", BORDER_URI, KeyKind::Border),
    ("font", FONT_URI, KeyKind::Font),
    ("fgcolors", FGCOLORS_URI, KeyKind::ColorMap),
    ("bgcolors", BGCOLORS_URI, KeyKind::ColorMap),
    ("txcolors", TXCOLORS_URI, KeyKind::ColorMap),
];

/// Expand a short alias to its URI; anything else is returned as is.
pub fn expand(name: &str) -> &str {
    WELL_KNOWN
        .iter()
        .find(|(alias, _, _)| *alias == name)
        .map_or(name, |(_, uri, _)| *uri)
}

pub(crate) fn kind_of(uri: &str) -> Option<KeyKind> {
    WELL_KNOWN.iter().find(|(_, u, _)| *u == uri).map(|(_, _, kind)| *kind)
}

pub fn background() -> Urid {
    urid(BACKGROUND_URI)
}

pub fn border() -> Urid {
    urid(BORDER_URI)
}

pub fn font() -> Urid {
    urid(FONT_URI)
}

pub fn fgcolors() -> Urid {
    urid(FGCOLORS_URI)
}

pub fn bgcolors() -> Urid {
    urid(BGCOLORS_URI)
}

pub fn txcolors() -> Urid {
    urid(TXCOLORS_URI)
}
