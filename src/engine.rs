//! The execution state machine.
//!
//! [`Engine::step`] advances a script by at most one line and never sleeps.
//! Timing is a deadline compared against a [`Clock`]: a step taken before the
//! deadline does nothing, so the caller can interleave other periodic work.

use crate::clock::{Clock, MonotonicClock};
use crate::command::Command;
use crate::device::{Keyboard, Layout};
use crate::emitter::Emitter;
use crate::error::Error;
use crate::parser::parse_line;
use crate::script::{Line, Script};
use anyhow::Context as _;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of a successful [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The script still has work, possibly after a wait.
    Continue,
    /// The script is exhausted. Every later step returns this again.
    Finished,
}

/// Where the engine is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the scheduled deadline.
    Idle,
    /// Due to run the next line.
    Ready,
    /// Due to replay the last line for a `REPEAT`.
    Repeating,
    /// Finished or aborted.
    Done,
}

/// Runs a keystroke script one step at a time against a keyboard and layout.
pub struct Engine<K, L, C = MonotonicClock> {
    script: Script,
    emitter: Emitter<K, L>,
    clock: C,
    default_delay: Duration,
    wait_until: Instant,
    repeat_count: u32,
    last_line: Option<Line>,
    done: bool,
}

impl<K: Keyboard, L: Layout> Engine<K, L> {
    /// Create an engine timed by the system monotonic clock.
    pub fn new(script: Script, keyboard: K, layout: L) -> Self {
        Self::with_clock(script, keyboard, layout, MonotonicClock)
    }
}

impl<K: Keyboard, L: Layout, C: Clock> Engine<K, L, C> {
    /// Create an engine timed by `clock`. The first step is due immediately.
    pub fn with_clock(script: Script, keyboard: K, layout: L, clock: C) -> Self {
        let wait_until = clock.now();
        Self {
            script,
            emitter: Emitter::new(keyboard, layout),
            clock,
            default_delay: Duration::ZERO,
            wait_until,
            repeat_count: 0,
            last_line: None,
            done: false,
        }
    }

    /// Advance the script by one unit of work.
    ///
    /// Before the scheduled deadline this returns [`Status::Continue`] and does
    /// nothing else. Otherwise it replays the last line if a `REPEAT` is
    /// pending, or executes the next script line.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] if the line is malformed; the cursor stays on that
    /// line. [`Error::Device`] if the keyboard or layout fails.
    pub fn step(&mut self) -> Result<Status, Error> {
        if self.done {
            return Ok(Status::Finished);
        }

        let now = self.clock.now();
        if now < self.wait_until {
            return Ok(Status::Continue);
        }

        if self.repeat_count > 0 {
            if let Some(line) = self.last_line.clone() {
                self.repeat_count -= 1;
                debug!(line = line.number, remaining = self.repeat_count, "repeat");
                let command = classify(&line)?;
                self.execute(now, &line, command)?;
                return Ok(Status::Continue);
            }
            self.repeat_count = 0;
        }

        let Some(line) = self.script.peek().cloned() else {
            self.finish()?;
            return Ok(Status::Finished);
        };
        let command = classify(&line)?;
        self.script.next_line();
        if command.is_repeatable() {
            self.last_line = Some(line.clone());
        }
        self.execute(now, &line, command)?;
        Ok(Status::Continue)
    }

    /// Drive [`step`](Self::step) on a fixed tick until the script finishes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use keyscript::backends::log::LogDevice;
    /// use keyscript::{Engine, Script};
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let script = Script::parse_str("DEFAULT_DELAY 100\nSTRING hello\nENTER\n");
    ///     let (keyboard, layout) = LogDevice::new().split();
    ///     let mut engine = Engine::new(script, keyboard, layout);
    ///     engine.run(Duration::from_millis(1)).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&mut self, tick: Duration) -> Result<(), Error> {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if self.step()? == Status::Finished {
                return Ok(());
            }
        }
    }

    /// Stop the run early: release every key and report done from now on.
    pub fn abort(&mut self) -> Result<(), Error> {
        if !self.done {
            info!(cursor = self.script.cursor(), "script aborted");
        }
        self.done = true;
        self.repeat_count = 0;
        self.emitter
            .release_all()
            .context("Failed to release keys on abort")?;
        Ok(())
    }

    pub fn state(&self) -> State {
        if self.done {
            State::Done
        } else if self.clock.now() < self.wait_until {
            State::Idle
        } else if self.repeat_count > 0 && self.last_line.is_some() {
            State::Repeating
        } else {
            State::Ready
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    /// The instant before which [`step`](Self::step) does nothing.
    pub fn wait_until(&self) -> Instant {
        self.wait_until
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// The line a `REPEAT` would replay.
    pub fn last_line(&self) -> Option<&Line> {
        self.last_line.as_ref()
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn keyboard(&self) -> &K {
        self.emitter.keyboard()
    }

    pub fn layout(&self) -> &L {
        self.emitter.layout()
    }

    pub fn into_parts(self) -> (K, L) {
        self.emitter.into_parts()
    }

    fn execute(&mut self, now: Instant, line: &Line, command: Command) -> Result<(), Error> {
        debug!(line = line.number, command = command.name(), text = %line.text, "execute");
        match command {
            Command::Rem => {}
            Command::DefaultDelay(delay) => {
                self.default_delay = delay;
                self.wait_until = now + delay;
            }
            Command::Delay(delay) => {
                self.wait_until = now + self.default_delay + delay;
            }
            Command::String(text) => {
                self.emitter
                    .type_text(&text)
                    .with_context(|| format!("line {}: {}", line.number, line.text))?;
                self.wait_until = now + self.default_delay;
            }
            Command::Repeat(count) => {
                if self.last_line.is_some() {
                    self.repeat_count = count;
                } else {
                    warn!(line = line.number, "REPEAT with nothing to repeat, ignoring");
                }
            }
            Command::Keys(tokens) => {
                self.emitter
                    .chord(tokens.iter().map(String::as_str))
                    .with_context(|| format!("line {}: {}", line.number, line.text))?;
                self.wait_until = now + self.default_delay;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.emitter
            .release_all()
            .context("Failed to release keys at end of script")?;
        self.done = true;
        self.repeat_count = 0;
        self.last_line = None;
        info!(lines = self.script.len(), "script finished");
        Ok(())
    }
}

fn classify(line: &Line) -> Result<Command, Error> {
    parse_line(&line.text).map_err(|source| Error::Parse {
        line: line.number,
        text: line.text.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::keys::Key;
    use anyhow::Result;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        presses: usize,
        releases: usize,
    }

    impl Keyboard for Counter {
        fn press(&mut self, _key: Key) -> Result<()> {
            self.presses += 1;
            Ok(())
        }

        fn release_all(&mut self) -> Result<()> {
            self.releases += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Writes(usize);

    impl Layout for Writes {
        fn write(&mut self, _text: &str) -> Result<()> {
            self.0 += 1;
            Ok(())
        }
    }

    fn engine(source: &str) -> (Engine<Counter, Writes, Rc<ManualClock>>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let engine = Engine::with_clock(
            Script::parse_str(source),
            Counter::default(),
            Writes::default(),
            clock.clone(),
        );
        (engine, clock)
    }

    #[test]
    fn test_states() {
        let (mut engine, clock) = engine("DEFAULT_DELAY 10\nA\nREPEAT 1");
        assert_eq!(engine.state(), State::Ready);
        engine.step().unwrap();
        assert_eq!(engine.state(), State::Idle);
        clock.advance(Duration::from_millis(10));
        engine.step().unwrap();
        clock.advance(Duration::from_millis(10));
        engine.step().unwrap();
        assert_eq!(engine.state(), State::Repeating);
        engine.step().unwrap();
        clock.advance(Duration::from_millis(10));
        assert_eq!(engine.step().unwrap(), Status::Finished);
        assert_eq!(engine.state(), State::Done);
    }

    #[test]
    fn test_default_delay_applies_to_its_own_step() {
        let (mut engine, clock) = engine("DEFAULT_DELAY 300\nENTER");
        let start = clock.now();
        engine.step().unwrap();
        assert_eq!(engine.wait_until(), start + Duration::from_millis(300));
        assert_eq!(engine.default_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_repeat_without_target_is_ignored() {
        let (mut engine, _clock) = engine("REM nothing yet\nREPEAT 5\nENTER");
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.repeat_count(), 0);
        engine.step().unwrap();
        assert_eq!(engine.keyboard().presses, 1);
        assert_eq!(engine.step().unwrap(), Status::Finished);
    }

    #[test]
    fn test_parse_error_keeps_cursor() {
        let (mut engine, _clock) = engine("ENTER\nREPEAT x\nENTER");
        engine.step().unwrap();
        for _ in 0..3 {
            match engine.step() {
                Err(Error::Parse { line, text, .. }) => {
                    assert_eq!(line, 2);
                    assert_eq!(text, "REPEAT x");
                }
                other => panic!("expected parse error, got {other:?}"),
            }
            assert_eq!(engine.script().cursor(), 1);
        }
    }

    #[test]
    fn test_abort_releases_and_finishes() {
        let (mut engine, _clock) = engine("ENTER\nENTER");
        engine.step().unwrap();
        engine.abort().unwrap();
        assert!(engine.is_done());
        assert_eq!(engine.keyboard().releases, 2);
        assert_eq!(engine.step().unwrap(), Status::Finished);
        assert_eq!(engine.keyboard().presses, 1);
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let mut engine = Engine::new(
            Script::parse_str("DEFAULT_DELAY 5\nSTRING hi\nDELAY 5\nENTER\nREPEAT 2"),
            Counter::default(),
            Writes::default(),
        );
        engine.run(Duration::from_millis(1)).await.unwrap();
        assert!(engine.is_done());
        assert_eq!(engine.layout().0, 1);
        assert_eq!(engine.keyboard().presses, 3);
    }
}
