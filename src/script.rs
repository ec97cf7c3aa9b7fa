//! The script store: trimmed, non-empty lines and a cursor over them.

use anyhow::{Context as _, Result};
use std::path::Path;

/// One stored script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source text.
    pub number: usize,
    pub text: String,
}

/// An ordered sequence of script lines consumed through a forward-only cursor.
///
/// Lines are never removed; the cursor only moves towards the end.
#[derive(Debug, Clone, Default)]
pub struct Script {
    lines: Vec<Line>,
    cursor: usize,
}

impl Script {
    /// Build a script from already-split lines.
    ///
    /// Each line is trimmed of surrounding whitespace (including a trailing
    /// `\r` or `\n`), and lines that end up empty are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use keyscript::Script;
    ///
    /// let script = Script::load(["STRING hi\r\n", "   ", "ENTER"]);
    /// assert_eq!(script.len(), 2);
    /// ```
    pub fn load<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let text = raw.as_ref().trim();
                (!text.is_empty()).then(|| Line {
                    number: idx + 1,
                    text: text.to_string(),
                })
            })
            .collect();
        Self { lines, cursor: 0 }
    }

    /// Build a script from in-memory text.
    pub fn parse_str(content: &str) -> Self {
        Self::load(content.lines())
    }

    /// Read a script file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;
        Ok(Self::parse_str(&content))
    }

    /// Whether any unconsumed line is left.
    pub fn remaining(&self) -> bool {
        self.cursor < self.lines.len()
    }

    /// The line the cursor points at, without consuming it.
    pub fn peek(&self) -> Option<&Line> {
        self.lines.get(self.cursor)
    }

    /// Consume and return the next line, or `None` once exhausted.
    pub fn next_line(&mut self) -> Option<&Line> {
        let line = self.lines.get(self.cursor)?;
        self.cursor += 1;
        Some(line)
    }

    /// Index of the next unconsumed line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trims_and_drops_blank_lines() {
        let script = Script::load(["  REM hi  ", "", "\r", "STRING x\r\n", "\tENTER"]);
        let texts: Vec<_> = script.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["REM hi", "STRING x", "ENTER"]);
    }

    #[test]
    fn test_source_line_numbers_survive_dropping() {
        let script = Script::parse_str("\n\nDELAY 10\n\nENTER\n");
        assert_eq!(script.lines()[0].number, 3);
        assert_eq!(script.lines()[1].number, 5);
    }

    #[test]
    fn test_cursor_advances_until_exhausted() {
        let mut script = Script::parse_str("A\nB");
        assert!(script.remaining());
        assert_eq!(script.next_line().map(|l| l.text.clone()), Some("A".into()));
        assert_eq!(script.peek().map(|l| l.text.as_str()), Some("B"));
        assert_eq!(script.next_line().map(|l| l.text.clone()), Some("B".into()));
        assert!(!script.remaining());
        assert!(script.next_line().is_none());
        assert!(script.next_line().is_none());
        assert_eq!(script.cursor(), 2);
    }

    #[test]
    fn test_empty_script() {
        let script = Script::parse_str("\n   \n");
        assert!(script.is_empty());
        assert!(!script.remaining());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Script::from_file("/nonexistent/payload.txt").unwrap_err();
        assert!(err.to_string().contains("Failed to read script file"));
    }
}
