//! Linux USB HID gadget backend.
//!
//! Writes 8-byte boot-protocol keyboard reports (modifier byte, reserved byte,
//! six key slots) to a gadget device such as `/dev/hidg0`. Text is typed
//! through a US layout.

use super::{Modifiers, SharedKeyboard, SharedLayout};
use crate::device::{Keyboard, Layout};
use crate::keys::Key;
use anyhow::{Context, Result, anyhow};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Number of non-modifier keys a boot report can carry at once.
pub const ROLLOVER: usize = 6;

const LEFT_SHIFT_BIT: u8 = 0x02;

/// A boot-protocol keyboard report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootReport {
    pub modifiers: u8,
    pub keys: [u8; ROLLOVER],
}

impl BootReport {
    /// Add a key usage to the first free slot. Returns false if every slot is taken.
    pub fn add(&mut self, usage: u8) -> bool {
        if self.keys.contains(&usage) {
            return true;
        }
        match self.keys.iter_mut().find(|slot| **slot == 0) {
            Some(slot) => {
                *slot = usage;
                true
            }
            None => false,
        }
    }

    pub fn to_bytes(self) -> [u8; 8] {
        let k = self.keys;
        [self.modifiers, 0, k[0], k[1], k[2], k[3], k[4], k[5]]
    }
}

/// A key usage and whether Shift must be held to produce a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub usage: u8,
    pub shift: bool,
}

/// Map a character to the keystroke that types it on a US keyboard.
pub fn us_keystroke(c: char) -> Option<KeyStroke> {
    let plain = |usage| Some(KeyStroke { usage, shift: false });
    let shifted = |usage| Some(KeyStroke { usage, shift: true });
    match c {
        'a'..='z' => plain(0x04 + (c as u8 - b'a')),
        'A'..='Z' => shifted(0x04 + (c as u8 - b'A')),
        '1'..='9' => plain(0x1E + (c as u8 - b'1')),
        '0' => plain(0x27),
        '!' => shifted(0x1E),
        '@' => shifted(0x1F),
        '#' => shifted(0x20),
        '$' => shifted(0x21),
        '%' => shifted(0x22),
        '^' => shifted(0x23),
        '&' => shifted(0x24),
        '*' => shifted(0x25),
        '(' => shifted(0x26),
        ')' => shifted(0x27),
        '\n' => plain(Key::Enter.usage()),
        '\t' => plain(Key::Tab.usage()),
        ' ' => plain(Key::Space.usage()),
        '-' => plain(0x2D),
        '_' => shifted(0x2D),
        '=' => plain(0x2E),
        '+' => shifted(0x2E),
        '[' => plain(0x2F),
        '{' => shifted(0x2F),
        ']' => plain(0x30),
        '}' => shifted(0x30),
        '\\' => plain(0x31),
        '|' => shifted(0x31),
        ';' => plain(0x33),
        ':' => shifted(0x33),
        '\'' => plain(0x34),
        '"' => shifted(0x34),
        '`' => plain(0x35),
        '~' => shifted(0x35),
        ',' => plain(0x36),
        '<' => shifted(0x36),
        '.' => plain(0x37),
        '>' => shifted(0x37),
        '/' => plain(0x38),
        '?' => shifted(0x38),
        _ => None,
    }
}

/// A HID gadget keyboard writing reports to `W`.
pub struct HidGadget<W: Write> {
    sink: W,
    modifiers: Modifiers,
    report: BootReport,
}

impl HidGadget<File> {
    /// Open a gadget device node for writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .with_context(|| format!("Failed to open HID gadget: {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> HidGadget<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            modifiers: Modifiers::default(),
            report: BootReport::default(),
        }
    }

    pub fn split(self) -> (SharedKeyboard<Self>, SharedLayout<Self>) {
        super::split(self)
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    fn send(&mut self, report: BootReport) -> Result<()> {
        debug!(report = ?report.to_bytes(), "hid report");
        self.sink
            .write_all(&report.to_bytes())
            .context("Failed to write HID report")?;
        self.sink.flush().context("Failed to flush HID report")?;
        Ok(())
    }

    fn held_report(&self) -> BootReport {
        BootReport {
            modifiers: self.modifiers.bits(),
            ..self.report
        }
    }
}

impl<W: Write> Keyboard for HidGadget<W> {
    fn press(&mut self, key: Key) -> Result<()> {
        if key.is_modifier() {
            self.modifiers.hold(key);
        } else if !self.report.add(key.usage()) {
            return Err(anyhow!("More than {ROLLOVER} keys held at once (pressing {key})"));
        }
        self.send(self.held_report())
    }

    fn release_all(&mut self) -> Result<()> {
        self.modifiers.clear();
        self.report = BootReport::default();
        self.send(BootReport::default())
    }
}

impl<W: Write> Layout for HidGadget<W> {
    fn write(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            let stroke =
                us_keystroke(c).ok_or_else(|| anyhow!("Cannot type {c:?} on a US layout"))?;
            let held = self.held_report();
            let mut report = held;
            if stroke.shift {
                report.modifiers |= LEFT_SHIFT_BIT;
            }
            if !report.add(stroke.usage) {
                return Err(anyhow!("More than {ROLLOVER} keys held at once (typing {c:?})"));
            }
            self.send(report)?;
            self.send(held)?;
        }
        Ok(())
    }
}
