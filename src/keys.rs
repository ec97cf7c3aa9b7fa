//! The key table: names of non-printable keys and the [`Key`]s they resolve to.
//!
//! Tokens that do not appear in the table are not keys; callers write them as
//! literal text instead.

use std::fmt;

/// A special key that can be pressed on the HID keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Delete,
    Home,
    End,
    Insert,
    PageUp,
    PageDown,
    Escape,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Space,
    Tab,
    Enter,
    Pause,
    CapsLock,
    NumLock,
    PrintScreen,
    ScrollLock,
    Application,
    Gui,
    Shift,
    Alt,
    Control,
}

/// Every name the script language accepts for a special key.
///
/// Several names map to the same key. `FN` is the Option key, which shares the
/// Alt usage.
static KEY_TABLE: &[(&str, Key)] = &[
    ("DELETE", Key::Delete),
    ("HOME", Key::Home),
    ("END", Key::End),
    ("INSERT", Key::Insert),
    ("PAGEUP", Key::PageUp),
    ("PAGEDOWN", Key::PageDown),
    ("ESC", Key::Escape),
    ("ESCAPE", Key::Escape),
    ("UPARROW", Key::Up),
    ("UP", Key::Up),
    ("DOWNARROW", Key::Down),
    ("DOWN", Key::Down),
    ("LEFTARROW", Key::Left),
    ("LEFT", Key::Left),
    ("RIGHTARROW", Key::Right),
    ("RIGHT", Key::Right),
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
    ("SPACE", Key::Space),
    ("TAB", Key::Tab),
    ("ENTER", Key::Enter),
    ("BREAK", Key::Pause),
    ("PAUSE", Key::Pause),
    ("CAPSLOCK", Key::CapsLock),
    ("NUMLOCK", Key::NumLock),
    ("PRINTSCREEN", Key::PrintScreen),
    ("SCROLLLOCK", Key::ScrollLock),
    ("FN", Key::Alt),
    ("MENU", Key::Application),
    ("WINDOWS", Key::Gui),
    ("GUI", Key::Gui),
    ("SHIFT", Key::Shift),
    ("ALT", Key::Alt),
    ("CONTROL", Key::Control),
    ("CTRL", Key::Control),
];

/// Look up a special key by its script name.
///
/// Matching is exact and case-sensitive: `"ENTER"` resolves, `"enter"` does not.
///
/// # Example
///
/// ```
/// use keyscript::keys::{resolve, Key};
///
/// assert_eq!(resolve("UPARROW"), Some(Key::Up));
/// assert_eq!(resolve("UP"), Some(Key::Up));
/// assert_eq!(resolve("hello"), None);
/// ```
pub fn resolve(name: &str) -> Option<Key> {
    KEY_TABLE
        .iter()
        .find(|(key_name, _)| *key_name == name)
        .map(|(_, key)| *key)
}

impl Key {
    /// USB HID usage ID (keyboard/keypad page) for this key.
    pub const fn usage(self) -> u8 {
        match self {
            Key::Enter => 0x28,
            Key::Escape => 0x29,
            Key::Tab => 0x2B,
            Key::Space => 0x2C,
            Key::CapsLock => 0x39,
            Key::F1 => 0x3A,
            Key::F2 => 0x3B,
            Key::F3 => 0x3C,
            Key::F4 => 0x3D,
            Key::F5 => 0x3E,
            Key::F6 => 0x3F,
            Key::F7 => 0x40,
            Key::F8 => 0x41,
            Key::F9 => 0x42,
            Key::F10 => 0x43,
            Key::F11 => 0x44,
            Key::F12 => 0x45,
            Key::PrintScreen => 0x46,
            Key::ScrollLock => 0x47,
            Key::Pause => 0x48,
            Key::Insert => 0x49,
            Key::Home => 0x4A,
            Key::PageUp => 0x4B,
            Key::Delete => 0x4C,
            Key::End => 0x4D,
            Key::PageDown => 0x4E,
            Key::Right => 0x4F,
            Key::Left => 0x50,
            Key::Down => 0x51,
            Key::Up => 0x52,
            Key::NumLock => 0x53,
            Key::Application => 0x65,
            Key::Control => 0xE0,
            Key::Shift => 0xE1,
            Key::Alt => 0xE2,
            Key::Gui => 0xE3,
        }
    }

    /// Flag bit for the HID modifier byte, or 0 for any non-modifier key.
    pub const fn modifier_bit(self) -> u8 {
        match self {
            Key::Control => 0x01,
            Key::Shift => 0x02,
            Key::Alt => 0x04,
            Key::Gui => 0x08,
            _ => 0,
        }
    }

    pub const fn is_modifier(self) -> bool {
        self.modifier_bit() != 0
    }
}

impl fmt::Display for Key {
    /// Writes the canonical script name of the key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Delete => "DELETE",
            Key::Home => "HOME",
            Key::End => "END",
            Key::Insert => "INSERT",
            Key::PageUp => "PAGEUP",
            Key::PageDown => "PAGEDOWN",
            Key::Escape => "ESCAPE",
            Key::Up => "UP",
            Key::Down => "DOWN",
            Key::Left => "LEFT",
            Key::Right => "RIGHT",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::F4 => "F4",
            Key::F5 => "F5",
            Key::F6 => "F6",
            Key::F7 => "F7",
            Key::F8 => "F8",
            Key::F9 => "F9",
            Key::F10 => "F10",
            Key::F11 => "F11",
            Key::F12 => "F12",
            Key::Space => "SPACE",
            Key::Tab => "TAB",
            Key::Enter => "ENTER",
            Key::Pause => "PAUSE",
            Key::CapsLock => "CAPSLOCK",
            Key::NumLock => "NUMLOCK",
            Key::PrintScreen => "PRINTSCREEN",
            Key::ScrollLock => "SCROLLLOCK",
            Key::Application => "MENU",
            Key::Gui => "GUI",
            Key::Shift => "SHIFT",
            Key::Alt => "ALT",
            Key::Control => "CONTROL",
        };
        f.write_str(name)
    }
}
