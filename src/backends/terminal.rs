//! Terminal backend: translates key presses into the byte sequences a
//! terminal program would receive from an xterm-style emulator.
//!
//! Held modifiers shape whatever is sent next. CTRL turns letters into control
//! codes, ALT prefixes ESC, SHIFT upper-cases. Navigation and function keys
//! carry modifiers as an xterm parameter (`ESC [ 1 ; 5 A` for CTRL+UP).

use super::{Modifiers, SharedKeyboard, SharedLayout};
use crate::device::{Keyboard, Layout};
use crate::keys::Key;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::warn;

const ESC: u8 = 0x1b;

/// How a key is encoded before modifiers are applied.
#[derive(Debug, Clone, Copy)]
enum Sequence {
    /// Fixed bytes (`\r`, `\t`, ...).
    Raw(&'static [u8]),
    /// `ESC [ <final>`, e.g. arrows.
    Csi(u8),
    /// `ESC O <final>`, F1–F4.
    Ss3(u8),
    /// `ESC [ <n> ~`, e.g. DELETE, PAGEUP, F5–F12.
    Tilde(u8),
}

fn sequence(key: Key) -> Option<Sequence> {
    use Sequence::*;
    let seq = match key {
        Key::Enter => Raw(b"\r"),
        Key::Tab => Raw(b"\t"),
        Key::Escape => Raw(b"\x1b"),
        Key::Space => Raw(b" "),
        Key::Up => Csi(b'A'),
        Key::Down => Csi(b'B'),
        Key::Right => Csi(b'C'),
        Key::Left => Csi(b'D'),
        Key::Home => Csi(b'H'),
        Key::End => Csi(b'F'),
        Key::Insert => Tilde(2),
        Key::Delete => Tilde(3),
        Key::PageUp => Tilde(5),
        Key::PageDown => Tilde(6),
        Key::F1 => Ss3(b'P'),
        Key::F2 => Ss3(b'Q'),
        Key::F3 => Ss3(b'R'),
        Key::F4 => Ss3(b'S'),
        Key::F5 => Tilde(15),
        Key::F6 => Tilde(17),
        Key::F7 => Tilde(18),
        Key::F8 => Tilde(19),
        Key::F9 => Tilde(20),
        Key::F10 => Tilde(21),
        Key::F11 => Tilde(23),
        Key::F12 => Tilde(24),
        _ => return None,
    };
    Some(seq)
}

/// xterm modifier parameter: 1 + shift(1) + alt(2) + ctrl(4).
fn modifier_param(mods: Modifiers) -> u8 {
    1 + u8::from(mods.contains(Key::Shift))
        + 2 * u8::from(mods.contains(Key::Alt))
        + 4 * u8::from(mods.contains(Key::Control))
}

/// Bytes sent for pressing `key` with `mods` held, or `None` if a terminal has
/// no way to express the key.
pub fn key_bytes(key: Key, mods: Modifiers) -> Option<Vec<u8>> {
    let param = modifier_param(mods);
    let bytes = match sequence(key)? {
        Sequence::Raw(raw) => {
            let mut out = Vec::with_capacity(raw.len() + 1);
            if mods.contains(Key::Alt) {
                out.push(ESC);
            }
            match (key, mods.contains(Key::Shift), mods.contains(Key::Control)) {
                (Key::Tab, true, _) => out.extend_from_slice(b"\x1b[Z"),
                (Key::Space, _, true) => out.push(0),
                _ => out.extend_from_slice(raw),
            }
            out
        }
        Sequence::Csi(last) | Sequence::Ss3(last) if param > 1 => {
            format!("\x1b[1;{param}{}", last as char).into_bytes()
        }
        Sequence::Csi(last) => vec![ESC, b'[', last],
        Sequence::Ss3(last) => vec![ESC, b'O', last],
        Sequence::Tilde(n) if param > 1 => format!("\x1b[{n};{param}~").into_bytes(),
        Sequence::Tilde(n) => format!("\x1b[{n}~").into_bytes(),
    };
    Some(bytes)
}

/// Control code for CTRL plus `c`, if there is one.
fn control_code(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        ' ' | '@' => Some(0x00),
        '[' => Some(0x1b),
        '\\' => Some(0x1c),
        ']' => Some(0x1d),
        '^' => Some(0x1e),
        '_' => Some(0x1f),
        '?' => Some(0x7f),
        _ => None,
    }
}

/// Bytes sent for typing `text` with `mods` held.
pub fn text_bytes(text: &str, mods: Modifiers) -> Vec<u8> {
    if mods.is_empty() {
        return text.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(text.len() * 2);
    let mut utf8 = [0u8; 4];
    for c in text.chars() {
        if mods.contains(Key::Alt) {
            out.push(ESC);
        }
        let c = if mods.contains(Key::Shift) {
            c.to_ascii_uppercase()
        } else {
            c
        };
        match control_code(c).filter(|_| mods.contains(Key::Control)) {
            Some(code) => out.push(code),
            None => out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes()),
        }
    }
    out
}

/// A terminal on the other end of a byte stream, usually a [`PtySession`](crate::pty::PtySession).
pub struct Terminal<W: Write> {
    sink: W,
    modifiers: Modifiers,
}

impl<W: Write> Terminal<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            modifiers: Modifiers::default(),
        }
    }

    pub fn split(self) -> (SharedKeyboard<Self>, SharedLayout<Self>) {
        super::split(self)
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink
            .write_all(bytes)
            .context("Failed to write to terminal")?;
        self.sink.flush().context("Failed to flush terminal")?;
        Ok(())
    }
}

impl<W: Write> Keyboard for Terminal<W> {
    fn press(&mut self, key: Key) -> Result<()> {
        if key == Key::Gui {
            warn!(%key, "no terminal equivalent, ignoring");
            return Ok(());
        }
        if key.is_modifier() {
            self.modifiers.hold(key);
            return Ok(());
        }
        match key_bytes(key, self.modifiers) {
            Some(bytes) => self.send(&bytes),
            None => {
                warn!(%key, "no terminal equivalent, ignoring");
                Ok(())
            }
        }
    }

    fn release_all(&mut self) -> Result<()> {
        self.modifiers.clear();
        Ok(())
    }
}

impl<W: Write> Layout for Terminal<W> {
    fn write(&mut self, text: &str) -> Result<()> {
        let bytes = text_bytes(text, self.modifiers);
        self.send(&bytes)
    }
}
