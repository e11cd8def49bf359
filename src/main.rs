use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use falling_catch::compute::{init_state, tick};
use falling_catch::config::Settings;
use falling_catch::display;
use falling_catch::entities::{Direction, GameState, GameStatus};
use falling_catch::input::{next_command, Command};

#[derive(Parser, Debug)]
#[command(name = "falling-catch")]
#[command(about = "Dodge the falling enemies, catch the falling items")]
struct Cli {
    /// Seed for the random number generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Drop collected items from memory every N ticks
    #[arg(long)]
    compact_every: Option<u64>,
    /// Write tracing output to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

enum Outcome {
    Finished,
    Quit,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> Result<Outcome> {
    let frame_len = state.settings.frame_duration();

    loop {
        let frame_start = Instant::now();

        let input: Option<Direction> = match next_command(rx) {
            Some(Command::Quit) => return Ok(Outcome::Quit),
            Some(Command::Move(dir)) => Some(dir),
            None => None,
        };

        *state = tick(state, input, rng);
        display::render(out, state)?;

        if state.status == GameStatus::Over {
            return Ok(Outcome::Finished);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let settings = Settings {
        compact_every: cli.compact_every,
        ..Settings::default()
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = init_state(settings, &mut rng)?;
    info!(seed = ?cli.seed, entities = state.entities.len(), "session started");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;

    // Raw mode is on from here: every path below must reach the restore block.
    let result = prepare_terminal(&mut out).and_then(|()| play(&mut out, &mut state, &mut rng));

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match result? {
        Outcome::Finished => println!("Game Over! Score: {}", state.score),
        Outcome::Quit => println!("Quit. Score: {}", state.score),
    }
    info!(frame = state.frame, score = state.score, "session ended");
    Ok(())
}

fn prepare_terminal<W: Write>(out: &mut W) -> Result<()> {
    out.execute(terminal::EnterAlternateScreen)
        .context("entering alternate screen")?;
    out.execute(cursor::Hide)?;
    Ok(())
}

/// Start the input reader, run the session and hold the final frame.
fn play<W: Write>(out: &mut W, state: &mut GameState, rng: &mut StdRng) -> Result<Outcome> {
    // Blocking reads live on their own thread so the loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let outcome = game_loop(out, state, &rx, rng)?;
    if let Outcome::Finished = outcome {
        thread::sleep(state.settings.end_delay);
    }
    Ok(outcome)
}
