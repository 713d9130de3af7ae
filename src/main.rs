//! Terminal Typing Toucan runner (default binary).
//!
//! Crossterm for input, the framebuffer view for output, a log file for
//! tracing since the terminal itself is in raw mode.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use typing_toucan::core::Session;
use typing_toucan::input::map_event;
use typing_toucan::store::{open_store, StoreConfig};
use typing_toucan::term::{FrameBuffer, Screen, Viewport};
use typing_toucan::{App, Cli, Flow};

const FRAME: Duration = Duration::from_millis(16);

fn init_logging(config: &StoreConfig, verbose: bool) -> Result<()> {
    let path = config.log_file();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store_config = cli.store_config();
    init_logging(&store_config, cli.verbose)?;

    let store = open_store(&store_config)?;
    let seed = cli.seed();
    let source = cli.build_source(seed)?;
    let session = Session::new(cli.session_config(seed), source, store.clone())
        .context("invalid game configuration")?;
    let mut app = App::new(session, store);
    if cli.reset_scores {
        app.session_mut().reset_high_scores();
        tracing::info!("high scores reset");
    }

    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut app, &mut screen);

    // Always try to restore terminal state.
    let _ = screen.exit();
    tracing::info!("bye");
    result
}

fn run(app: &mut App, screen: &mut Screen) -> Result<()> {
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_frame = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.render_into(Viewport::new(w, h), &mut fb);
        screen.draw_swap(&mut fb)?;
        if app.take_bell() {
            screen.bell()?;
        }

        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            // Drain everything queued so fast typing is not rate-limited by frames.
            loop {
                let ev = event::read()?;
                match ev {
                    Event::Resize(..) => screen.invalidate(),
                    Event::FocusLost => app.focus_lost(),
                    _ => {}
                }
                if let Some(input) = map_event(&ev) {
                    if app.handle(input) == Flow::Exit {
                        return Ok(());
                    }
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        app.tick(delta);
    }
}
