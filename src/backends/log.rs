//! A dry-run backend that only logs what would be sent.

use super::{Modifiers, SharedKeyboard, SharedLayout};
use crate::device::{Keyboard, Layout};
use crate::keys::Key;
use anyhow::Result;
use tracing::info;

/// Logs every press, release and write at info level.
#[derive(Debug, Default)]
pub struct LogDevice {
    held: Vec<Key>,
    modifiers: Modifiers,
    writes: usize,
    presses: usize,
}

impl LogDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn split(self) -> (SharedKeyboard<Self>, SharedLayout<Self>) {
        super::split(self)
    }

    /// Keys pressed since the last release.
    pub fn held(&self) -> &[Key] {
        &self.held
    }

    pub fn presses(&self) -> usize {
        self.presses
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Keyboard for LogDevice {
    fn press(&mut self, key: Key) -> Result<()> {
        info!(%key, usage = key.usage(), "press");
        self.modifiers.hold(key);
        self.held.push(key);
        self.presses += 1;
        Ok(())
    }

    fn release_all(&mut self) -> Result<()> {
        if !self.held.is_empty() {
            info!(held = ?self.held, "release all");
        }
        self.held.clear();
        self.modifiers.clear();
        Ok(())
    }
}

impl Layout for LogDevice {
    fn write(&mut self, text: &str) -> Result<()> {
        info!(text, modifiers = self.modifiers.bits(), "write");
        self.writes += 1;
        Ok(())
    }
}
