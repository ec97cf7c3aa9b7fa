//! # Keyscript
//!
//! A non-blocking interpreter for keystroke-injection scripts.
//!
//! A script is a flat list of lines. Each line is either a command (`DELAY`,
//! `STRING`, `REPEAT`, ...) or a set of keys pressed together. The [`Engine`]
//! runs the script one line per [`Engine::step`] call and never sleeps: timing
//! is a deadline checked against a monotonic clock, so the caller can drive it
//! from any periodic loop alongside other work.
//!
//! ## Quick start
//!
//! ```
//! use keyscript::backends::log::LogDevice;
//! use keyscript::{Engine, Script, Status};
//!
//! let script = Script::parse_str("REM open a run dialog\nGUI r\nSTRING notepad\nENTER\n");
//! let (keyboard, layout) = LogDevice::new().split();
//! let mut engine = Engine::new(script, keyboard, layout);
//!
//! while engine.step()? != Status::Finished {
//!     // other periodic work goes here
//! }
//! # Ok::<(), keyscript::Error>(())
//! ```
//!
//! ## Script syntax
//!
//! | Line | Effect |
//! |------|--------|
//! | `REM text` | Comment |
//! | `DEFAULT_DELAY n` / `DEFAULTDELAY n` | Wait `n` ms after every later command |
//! | `DELAY n` | Wait an extra `n` ms before the next line |
//! | `STRING text` | Type `text` literally |
//! | `REPEAT n` | Replay the last non-comment line `n` more times |
//! | `CTRL ALT DELETE` | Press the named keys together, then release them |
//!
//! Key names (`ENTER`, `GUI`, `UPARROW`, ...) are listed in [`keys`]. A word
//! that is not a key name is typed as text, so `CTRL c` presses CTRL and
//! types `c`.
//!
//! ## Backends
//!
//! The engine talks to a [`Keyboard`] and a [`Layout`]. The [`backends`]
//! module provides a terminal backend for driving a program in a PTY, a USB
//! HID gadget backend, and a logging dry-run backend.

pub mod backends;
pub mod clock;
pub mod command;
pub mod device;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod keys;
pub mod parser;
pub mod pty;
pub mod pty_reader;
pub mod script;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use command::Command;
pub use device::{Keyboard, Layout};
pub use engine::{Engine, State, Status};
pub use error::{Error, ParseError};
pub use keys::Key;
pub use parser::parse_line;
pub use script::{Line, Script};
