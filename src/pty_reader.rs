use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;
use tracing::debug;

/// Collects PTY output on a background thread so the driver loop can forward
/// it without blocking.
pub struct OutputForwarder {
    rx: Receiver<Vec<u8>>,
}

impl OutputForwarder {
    /// Spawn the reader thread.
    pub fn spawn<R: Read + Send + 'static>(mut reader: R) -> Self {
        let (tx, rx) = channel();

        thread::spawn(move || {
            let mut buffer = [0u8; 4096];
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buffer[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "PTY reader stopped");
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    /// Copy everything received so far to `out`. Returns the number of bytes
    /// forwarded.
    pub fn forward(&self, out: &mut impl Write) -> Result<usize> {
        let mut total = 0;
        loop {
            match self.rx.try_recv() {
                Ok(data) => {
                    out.write_all(&data).context("Failed to forward PTY output")?;
                    total += data.len();
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if total > 0 {
            out.flush().context("Failed to flush PTY output")?;
        }
        Ok(total)
    }
}
