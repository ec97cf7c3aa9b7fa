//! The key emitter: routes line tokens to the keyboard or the layout.

use crate::device::{Keyboard, Layout};
use crate::keys;
use anyhow::Result;
use tracing::warn;

/// Owns the keyboard and layout backends and presses tokens through them.
pub struct Emitter<K, L> {
    keyboard: K,
    layout: L,
}

impl<K: Keyboard, L: Layout> Emitter<K, L> {
    pub fn new(keyboard: K, layout: L) -> Self {
        Self { keyboard, layout }
    }

    /// Press `token` if it names a special key, otherwise type it as text.
    pub fn press_or_write(&mut self, token: &str) -> Result<()> {
        match keys::resolve(token) {
            Some(key) => self.keyboard.press(key),
            None => self.layout.write(token),
        }
    }

    pub fn release_all(&mut self) -> Result<()> {
        self.keyboard.release_all()
    }

    /// Press every token in order, then release them together.
    ///
    /// If a press fails part-way, held keys are released before the error is
    /// returned.
    pub fn chord<'t>(&mut self, tokens: impl IntoIterator<Item = &'t str>) -> Result<()> {
        for token in tokens {
            if let Err(err) = self.press_or_write(token) {
                if let Err(release_err) = self.keyboard.release_all() {
                    warn!(error = %release_err, "release after failed press also failed");
                }
                return Err(err);
            }
        }
        self.keyboard.release_all()
    }

    /// Type `text`, then release everything.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        if let Err(err) = self.layout.write(text) {
            if let Err(release_err) = self.keyboard.release_all() {
                warn!(error = %release_err, "release after failed write also failed");
            }
            return Err(err);
        }
        self.keyboard.release_all()
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn into_parts(self) -> (K, L) {
        (self.keyboard, self.layout)
    }
}
