//! lifehack binary
//!
//! Launches Digital, loads the Game of Life program and renders the board in
//! the terminal until interrupted.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lifehack::config::{readout_span, DEFAULT_READOUT_START};
use lifehack::poller::wait_or_shutdown;
use lifehack::protocol::Command;
use lifehack::render::{run_display, Palette, TerminalRenderer};
use lifehack::{Client, Config, LifeError, Poller, Simulator};
use parking_lot::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Conway's Game of Life on the Digital simulator
#[derive(Parser, Debug)]
#[command(name = "lifehack")]
#[command(about = "Run a Game of Life program in Digital and render its memory")]
#[command(version)]
struct Args {
    /// Path to .hex file to be run [default: ./example/Conway32.hex]
    #[arg(short, long)]
    program: Option<PathBuf>,

    /// Path to Digital executable (.jar or .exe)
    #[arg(short, long, env = "DIGITAL_PATH")]
    digital: Option<PathBuf>,

    /// Circuit file handed to Digital on launch
    #[arg(short, long)]
    circuit: Option<PathBuf>,

    /// Address of Digital's remote interface (host:port)
    #[arg(short, long, default_value = "localhost:41114")]
    server: String,

    /// Bound on one request/response exchange, in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Delay between readouts, in milliseconds
    #[arg(long, default_value = "10")]
    poll_ms: u64,

    /// Cells per side of the square board
    #[arg(short, long, default_value = "32", value_parser = clap::value_parser!(u16).range(1..=256))]
    grid_size: u16,

    /// Time Digital gets to open its port, in milliseconds
    #[arg(long, default_value = "3000")]
    startup_delay_ms: u64,

    /// Glyph for live cells
    #[arg(long, default_value = "█")]
    alive: char,

    /// Glyph for dead cells
    #[arg(long, default_value = " ")]
    dead: char,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lifehack=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> lifehack::Result<()> {
    tracing::info!("lifehack v{}", lifehack::VERSION);

    let program = match args.program {
        Some(path) => path,
        None => std::env::current_dir()?.join("example").join("Conway32.hex"),
    };

    let digital = args.digital.ok_or_else(|| {
        LifeError::Config(
            "Digital path not specified. Please either:\n  \
             1. Set the DIGITAL_PATH environment variable, or\n  \
             2. Use the -d flag: -d /path/to/Digital.jar"
                .to_string(),
        )
    })?;

    let grid_size = usize::from(args.grid_size);
    let (readout_start, readout_end) =
        readout_span(DEFAULT_READOUT_START, grid_size * grid_size)?;
    let config = Config::builder()
        .server_addr(&args.server)
        .timeout(Duration::from_millis(args.timeout_ms))
        .poll_interval(Duration::from_millis(args.poll_ms))
        .startup_delay(Duration::from_millis(args.startup_delay_ms))
        .grid_size(grid_size)
        .readout_range(readout_start, readout_end)
        .build();

    let simulator = Arc::new(Mutex::new(Simulator::launch(
        &digital,
        args.circuit.as_deref(),
    )?));

    // Set up Ctrl+C / SIGTERM handler; Digital must not outlive us
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        let digital = Arc::clone(&simulator);
        let installed = ctrlc::set_handler(move || {
            tracing::info!("Received shutdown signal");
            flag.store(true, Ordering::Relaxed);
            if let Err(e) = digital.lock().kill() {
                tracing::warn!("Failed to stop Digital: {}", e);
            }
        });
        if let Err(e) = installed {
            simulator.lock().kill()?;
            return Err(LifeError::Config(format!(
                "cannot install signal handler: {}",
                e
            )));
        }
    }

    let palette = Palette {
        alive: args.alive,
        dead: args.dead,
    };
    let outcome = session(&config, &program, palette, &shutdown);

    simulator.lock().kill()?;
    outcome
}

/// Load the program, then poll and render until shutdown
///
/// Failures before polling starts are fatal; readout failures are not.
fn session(
    config: &Config,
    program: &Path,
    palette: Palette,
    shutdown: &Arc<AtomicBool>,
) -> lifehack::Result<()> {
    tracing::info!("Waiting for Digital server to start...");
    if wait_or_shutdown(config.startup_delay, shutdown) {
        return Ok(());
    }

    let client = Client::from_config(config);
    let response = client.send(&Command::start(program))?;
    tracing::info!("Start response: {}", response);

    if wait_or_shutdown(config.settle_delay, shutdown) {
        return Ok(());
    }

    let (poller, rx) = Poller::new(client, config).spawn(Arc::clone(shutdown))?;

    let mut renderer = TerminalRenderer::new(std::io::stdout().lock(), palette);
    let drawn = run_display(&rx, &mut renderer, shutdown, Duration::from_millis(100));

    shutdown.store(true, Ordering::Relaxed);
    drop(rx);
    match poller.join() {
        Ok(stats) => tracing::info!(
            "Rendered {} boards ({} readouts ok, {} failed)",
            renderer.frames(),
            stats.successes,
            stats.failures
        ),
        Err(_) => tracing::warn!("Poller thread panicked"),
    }

    drawn.map(|_| ())
}
