//! touchstick demo - drive the virtual joystick from a terminal
//!
//! Runs the frame loop at the configured refresh rate and feeds gesture
//! events from a REPL, or runs a scripted headless drag with `--frames`.

use anyhow::Result;
use clap::Parser;
use colored::*;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use touchstick::cli::{self, parse_drag};
use touchstick::config::{AppConfig, ConfigWatcher};
use touchstick::{
    Character, ConsoleRenderer, FrameLoop, InputSlot, JoystickHandle, JoystickInput, PositionSlot,
};

/// Virtual touch joystick driving a character sprite
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "touchstick.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Run this many frames headless instead of starting the REPL
    #[arg(long)]
    frames: Option<u64>,

    /// Drag held during the headless run, as "dx,dy"
    #[arg(long, value_parser = parse_drag, allow_hyphen_values = true, requires = "frames")]
    drag: Option<(f32, f32)>,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting touchstick...");

    if args.write_config {
        let config = AppConfig::load_or_default(&args.config).await?;
        config.save(&args.config).await?;
        println!("{} {}", "Wrote".green(), args.config);
        return Ok(());
    }

    // Hot reload only makes sense for a file that exists
    let (watcher, config) = if Path::new(&args.config).exists() {
        let (watcher, config) = ConfigWatcher::new(args.config.clone()).await?;
        info!("Configuration file: {}", args.config);
        (Some(watcher), config)
    } else {
        info!("No config file at {}, using defaults", args.config);
        (None, AppConfig::default())
    };

    let input = InputSlot::new();
    let position = PositionSlot::default();

    let joystick = JoystickInput::new(config.joystick.clone(), Some(input.listener()))?;
    let joystick: JoystickHandle = Arc::new(Mutex::new(joystick));

    let character = Character::new(config.character.clone(), position.clone())?;
    let frame_loop = FrameLoop::new(character, input, ConsoleRenderer::new(), config.frame.refresh_hz)?
        .with_joystick(joystick.clone());

    info!(
        "Joystick max travel {} | character {}x{} at speed {}",
        joystick.lock().max_distance(),
        config.character.size,
        config.character.size,
        config.character.speed
    );

    match args.frames {
        Some(frames) => run_headless(frame_loop, joystick, frames, args.drag),
        None => run_interactive(frame_loop, joystick, position, watcher).await,
    }
}

fn run_headless(
    mut frame_loop: FrameLoop<ConsoleRenderer>,
    joystick: JoystickHandle,
    frames: u64,
    drag: Option<(f32, f32)>,
) -> Result<()> {
    let dt = 1.0 / frame_loop.refresh_hz() as f32;

    if let Some((dx, dy)) = drag {
        let mut joystick = joystick.lock();
        joystick.on_drag_start();
        joystick.on_drag_update(dx, dy);
    }

    for _ in 0..frames {
        frame_loop.tick_once(dt);
    }

    joystick.lock().on_drag_end();

    let end = frame_loop.character().position();
    println!(
        "{} after {} frames: ({:.2}, {:.2})",
        "Final position".bold().cyan(),
        frame_loop.frames(),
        end.x,
        end.y
    );
    Ok(())
}

async fn run_interactive(
    mut frame_loop: FrameLoop<ConsoleRenderer>,
    joystick: JoystickHandle,
    position: PositionSlot,
    mut watcher: Option<ConfigWatcher>,
) -> Result<()> {
    println!("{}", "Type 'help' for gesture commands".bright_white());

    let repl = tokio::task::spawn_blocking(move || cli::run_repl(joystick, position));

    let shutdown = async {
        tokio::select! {
            res = repl => match res {
                Ok(Ok(())) => info!("Console closed"),
                Ok(Err(e)) => warn!("Console error: {:#}", e),
                Err(e) => warn!("Console task failed: {}", e),
            },
            _ = shutdown_signal() => {}
        }
    };

    let ticks = frame_loop.run(shutdown, watcher.as_mut()).await;

    info!(
        "touchstick shutdown complete ({} frames, {} rendered)",
        ticks,
        frame_loop.renderer().rendered()
    );
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
