//! The [`Command`] type a script line classifies into.

use std::time::Duration;

/// One classified script line, carrying its typed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `REM ...`: a comment.
    Rem,
    /// `DEFAULT_DELAY n` / `DEFAULTDELAY n`: pause applied after every later command.
    DefaultDelay(Duration),
    /// `DELAY n`: a one-off pause on top of the default delay.
    Delay(Duration),
    /// `STRING text`: literal text typed through the layout.
    String(String),
    /// `REPEAT n`: replay the last substantive line `n` more times.
    Repeat(u32),
    /// Anything else: tokens pressed together, then released at once.
    Keys(Vec<String>),
}

impl Command {
    pub const REM: &'static str = "REM";
    pub const DEFAULT_DELAY: &'static str = "DEFAULT_DELAY";
    pub const DEFAULTDELAY: &'static str = "DEFAULTDELAY";
    pub const DELAY: &'static str = "DELAY";
    pub const STRING: &'static str = "STRING";
    pub const REPEAT: &'static str = "REPEAT";

    /// Whether a later `REPEAT` may replay this command.
    ///
    /// Comments and `REPEAT` itself are never repeat targets.
    pub fn is_repeatable(&self) -> bool {
        !matches!(self, Command::Rem | Command::Repeat(_))
    }

    /// Whether executing this command touches the keyboard.
    pub fn emits(&self) -> bool {
        matches!(self, Command::String(_) | Command::Keys(_))
    }

    /// Short name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Rem => Self::REM,
            Command::DefaultDelay(_) => Self::DEFAULT_DELAY,
            Command::Delay(_) => Self::DELAY,
            Command::String(_) => Self::STRING,
            Command::Repeat(_) => Self::REPEAT,
            Command::Keys(_) => "KEYS",
        }
    }
}
