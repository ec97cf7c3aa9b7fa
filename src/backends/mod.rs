//! Concrete keyboard/layout backends.
//!
//! Every backend is one device type implementing both [`Keyboard`] and
//! [`Layout`], since typing text usually has to see which modifiers are held.
//! [`split`] hands out the two halves the [`Engine`](crate::Engine) wants,
//! both pointing at the same device.

pub mod hidg;
pub mod log;
pub mod terminal;

use crate::device::{Keyboard, Layout};
use crate::keys::Key;
use anyhow::Result;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// The keyboard half of a [`split`] device.
pub struct SharedKeyboard<T>(Rc<RefCell<T>>);

/// The layout half of a [`split`] device.
pub struct SharedLayout<T>(Rc<RefCell<T>>);

/// Share one device between a keyboard handle and a layout handle.
pub fn split<T>(device: T) -> (SharedKeyboard<T>, SharedLayout<T>) {
    let device = Rc::new(RefCell::new(device));
    (SharedKeyboard(device.clone()), SharedLayout(device))
}

impl<T> SharedKeyboard<T> {
    pub fn device(&self) -> Ref<'_, T> {
        self.0.borrow()
    }
}

impl<T> SharedLayout<T> {
    pub fn device(&self) -> Ref<'_, T> {
        self.0.borrow()
    }
}

impl<T: Keyboard> Keyboard for SharedKeyboard<T> {
    fn press(&mut self, key: Key) -> Result<()> {
        self.0.borrow_mut().press(key)
    }

    fn release_all(&mut self) -> Result<()> {
        self.0.borrow_mut().release_all()
    }
}

impl<T: Layout> Layout for SharedLayout<T> {
    fn write(&mut self, text: &str) -> Result<()> {
        self.0.borrow_mut().write(text)
    }
}

/// Modifier keys currently held, as a HID modifier byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers(u8);

impl Modifiers {
    pub fn hold(&mut self, key: Key) {
        self.0 |= key.modifier_bit();
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, key: Key) -> bool {
        key.is_modifier() && self.0 & key.modifier_bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers() {
        let mut mods = Modifiers::default();
        assert!(mods.is_empty());
        mods.hold(Key::Control);
        mods.hold(Key::Shift);
        mods.hold(Key::Enter);
        assert_eq!(mods.bits(), 0x03);
        assert!(mods.contains(Key::Control));
        assert!(!mods.contains(Key::Alt));
        assert!(!mods.contains(Key::Enter));
        mods.clear();
        assert!(mods.is_empty());
    }
}
