use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use keyscript::backends::hidg::HidGadget;
use keyscript::backends::log::LogDevice;
use keyscript::backends::terminal::Terminal;
use keyscript::pty::PtySession;
use keyscript::pty_reader::OutputForwarder;
use keyscript::{Engine, Keyboard, Layout, Script, Status};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Type into a program running in a pseudo-terminal
    Pty,
    /// Only log the keys that would be sent
    Log,
    /// Write USB HID reports to a Linux gadget device
    Hidg,
}

#[derive(Parser, Debug)]
#[command(
    name = "keyscript",
    about = "Run a keystroke-injection script against a keyboard backend",
    version
)]
struct Args {
    /// Path to the script file
    #[arg(short, long)]
    script: PathBuf,

    /// Where keystrokes are sent
    #[arg(short, long, value_enum, default_value_t = Backend::Pty)]
    backend: Backend,

    /// Program to run in the PTY (pty backend)
    #[arg(short, long)]
    command: Option<String>,

    /// HID gadget device node (hidg backend)
    #[arg(long, default_value = "/dev/hidg0")]
    device: PathBuf,

    /// Interval between interpreter steps, in milliseconds
    #[arg(long, default_value_t = 1)]
    tick_ms: u64,

    /// Pause before the first step, in milliseconds
    #[arg(long, default_value_t = 100)]
    start_delay_ms: u64,

    /// How long to keep forwarding program output after the script ends, in milliseconds
    #[arg(long, default_value_t = 500)]
    linger_ms: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Arguments to pass to the command
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

type Device = (Box<dyn Keyboard>, Box<dyn Layout>, Option<OutputForwarder>);

fn open_backend(args: &Args) -> Result<Device> {
    match args.backend {
        Backend::Pty => {
            let Some(command) = &args.command else {
                bail!("--command is required with the pty backend");
            };
            let (session, reader) = PtySession::spawn(command, &args.args)?;
            let (keyboard, layout) = Terminal::new(session).split();
            Ok((
                Box::new(keyboard),
                Box::new(layout),
                Some(OutputForwarder::spawn(reader)),
            ))
        }
        Backend::Log => {
            let (keyboard, layout) = LogDevice::new().split();
            Ok((Box::new(keyboard), Box::new(layout), None))
        }
        Backend::Hidg => {
            let (keyboard, layout) = HidGadget::open(&args.device)?.split();
            Ok((Box::new(keyboard), Box::new(layout), None))
        }
    }
}

fn forward_output(output: Option<&OutputForwarder>) -> Result<()> {
    if let Some(output) = output {
        output.forward(&mut std::io::stdout().lock())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let script = Script::from_file(&args.script)?;
    info!(path = %args.script.display(), lines = script.len(), "loaded script");

    let (keyboard, layout, output) = open_backend(&args).context("Failed to open backend")?;
    let mut engine = Engine::new(script, keyboard, layout);

    // Give the host time to notice the device before the first keystroke.
    tokio::time::sleep(Duration::from_millis(args.start_delay_ms)).await;

    let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                warn!("interrupted, releasing keys");
                engine.abort()?;
                break;
            }
            _ = ticker.tick() => {}
        }

        forward_output(output.as_ref())?;

        match engine.step() {
            Ok(Status::Continue) => {}
            Ok(Status::Finished) => break,
            Err(err) => {
                if let Err(release_err) = engine.abort() {
                    error!(error = %release_err, "failed to release keys");
                }
                return Err(err).context("Failed to execute script");
            }
        }
    }

    if output.is_some() {
        tokio::time::sleep(Duration::from_millis(args.linger_ms)).await;
        forward_output(output.as_ref())?;
    }

    Ok(())
}
