//! The [`Keyboard`] and [`Layout`] traits the engine drives.
//!
//! A backend implements both. The keyboard presses individual special keys and
//! releases everything at once; the layout turns literal text into keystrokes
//! for its locale.

use crate::keys::Key;
use anyhow::Result;

/// A HID keyboard report sink.
pub trait Keyboard {
    /// Press `key` and keep it held until [`release_all`](Self::release_all).
    fn press(&mut self, key: Key) -> Result<()>;

    /// Release every key currently held.
    fn release_all(&mut self) -> Result<()>;
}

/// Types literal text.
pub trait Layout {
    fn write(&mut self, text: &str) -> Result<()>;
}

impl<K: Keyboard + ?Sized> Keyboard for &mut K {
    fn press(&mut self, key: Key) -> Result<()> {
        (**self).press(key)
    }

    fn release_all(&mut self) -> Result<()> {
        (**self).release_all()
    }
}

impl<K: Keyboard + ?Sized> Keyboard for Box<K> {
    fn press(&mut self, key: Key) -> Result<()> {
        (**self).press(key)
    }

    fn release_all(&mut self) -> Result<()> {
        (**self).release_all()
    }
}

impl<L: Layout + ?Sized> Layout for &mut L {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }
}

impl<L: Layout + ?Sized> Layout for Box<L> {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }
}
