//! Key codes.
//!
//! Keys are UTF-32 code points. Keys without a character (function keys,
//! arrows, modifiers) use codes from the private-use area starting at
//! [`SPECIAL_BASE`], so they never collide with text.

/// First special key code.
pub const SPECIAL_BASE: u32 = 0xE000;

pub const BACKSPACE: u32 = 0x08;
pub const TAB: u32 = 0x09;
pub const ENTER: u32 = 0x0D;
pub const ESCAPE: u32 = 0x1B;
pub const DELETE: u32 = 0x7F;
pub const SPACE: u32 = 0x20;

pub const F1: u32 = SPECIAL_BASE + 1;
pub const F2: u32 = SPECIAL_BASE + 2;
pub const F3: u32 = SPECIAL_BASE + 3;
pub const F4: u32 = SPECIAL_BASE + 4;
pub const F5: u32 = SPECIAL_BASE + 5;
pub const F6: u32 = SPECIAL_BASE + 6;
pub const F7: u32 = SPECIAL_BASE + 7;
pub const F8: u32 = SPECIAL_BASE + 8;
pub const F9: u32 = SPECIAL_BASE + 9;
pub const F10: u32 = SPECIAL_BASE + 10;
pub const F11: u32 = SPECIAL_BASE + 11;
pub const F12: u32 = SPECIAL_BASE + 12;
pub const LEFT: u32 = SPECIAL_BASE + 13;
pub const UP: u32 = SPECIAL_BASE + 14;
pub const RIGHT: u32 = SPECIAL_BASE + 15;
pub const DOWN: u32 = SPECIAL_BASE + 16;
pub const PAGE_UP: u32 = SPECIAL_BASE + 17;
pub const PAGE_DOWN: u32 = SPECIAL_BASE + 18;
pub const HOME: u32 = SPECIAL_BASE + 19;
pub const END: u32 = SPECIAL_BASE + 20;
pub const INSERT: u32 = SPECIAL_BASE + 21;
pub const SHIFT_L: u32 = SPECIAL_BASE + 22;
pub const SHIFT_R: u32 = SPECIAL_BASE + 23;
pub const CTRL_L: u32 = SPECIAL_BASE + 24;
pub const CTRL_R: u32 = SPECIAL_BASE + 25;
pub const ALT_L: u32 = SPECIAL_BASE + 26;
pub const ALT_R: u32 = SPECIAL_BASE + 27;
pub const SUPER_L: u32 = SPECIAL_BASE + 28;
pub const SUPER_R: u32 = SPECIAL_BASE + 29;
pub const MENU: u32 = SPECIAL_BASE + 30;
pub const CAPS_LOCK: u32 = SPECIAL_BASE + 31;
pub const SCROLL_LOCK: u32 = SPECIAL_BASE + 32;
pub const NUM_LOCK: u32 = SPECIAL_BASE + 33;
pub const PRINT_SCREEN: u32 = SPECIAL_BASE + 34;
pub const PAUSE: u32 = SPECIAL_BASE + 35;

/// Upper bound (exclusive) of the special range.
pub const SPECIAL_END: u32 = SPECIAL_BASE + 0x100;

/// Wildcard for keyboard grabs: a grab on `ANY` receives every key.
pub const ANY: u32 = u32::MAX;

/// Whether `key` is in the special-key range.
pub fn is_special(key: u32) -> bool {
    (SPECIAL_BASE..SPECIAL_END).contains(&key)
}

/// Whether `key` is a control character.
pub fn is_control(key: u32) -> bool {
    key < 0x20 || key == DELETE
}

/// Whether `key` produces text. Printable keys reach widgets through the
/// host's text path instead of the raw key path.
pub fn is_printable(key: u32) -> bool {
    !is_control(key) && !is_special(key) && key != ANY && char::from_u32(key).is_some()
}
