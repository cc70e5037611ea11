//! Command-line gesture REPL
//!
//! Stands in for a touch screen: each command feeds one gesture event to
//! the joystick while the frame loop keeps running in the background.

use anyhow::{bail, Context, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::frame::JoystickHandle;
use crate::shared::PositionSlot;

/// One REPL command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Drag { dx: f32, dy: f32 },
    End,
    State,
    Help,
    Quit,
}

/// Parse a REPL line such as `drag 30 -12`
pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        bail!("empty command");
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" | "down" => Command::Start,
        "drag" | "move" => {
            let dx = parse_number(parts.next(), "dx")?;
            let dy = parse_number(parts.next(), "dy")?;
            Command::Drag { dx, dy }
        }
        "end" | "up" | "release" => Command::End,
        "state" | "s" => Command::State,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };

    if parts.next().is_some() {
        bail!("too many arguments for '{}'", word);
    }
    Ok(command)
}

fn parse_number(token: Option<&str>, name: &str) -> Result<f32> {
    let token = token.with_context(|| format!("missing {}", name))?;
    let value: f32 = token
        .parse()
        .with_context(|| format!("{} must be a number, got '{}'", name, token))?;
    if !value.is_finite() {
        bail!("{} must be finite", name);
    }
    Ok(value)
}

/// Parse a `dx,dy` pair for `--drag`
pub fn parse_drag(value: &str) -> std::result::Result<(f32, f32), String> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| format!("expected 'dx,dy', got '{}'", value))?;
    let dx: f32 = dx.trim().parse().map_err(|_| format!("invalid dx '{}'", dx))?;
    let dy: f32 = dy.trim().parse().map_err(|_| format!("invalid dy '{}'", dy))?;
    if !dx.is_finite() || !dy.is_finite() {
        return Err("drag components must be finite".to_string());
    }
    Ok((dx, dy))
}

/// Apply a command; returns the text to print
pub fn execute(command: Command, joystick: &JoystickHandle, position: &PositionSlot) -> String {
    match command {
        Command::Start => {
            joystick.lock().on_drag_start();
            "drag started".to_string()
        }
        Command::Drag { dx, dy } => {
            let mut joystick = joystick.lock();
            if !joystick.is_active() {
                return "no active drag (use 'start' first)".yellow().to_string();
            }
            joystick.on_drag_update(dx, dy);
            let out = joystick.output();
            format!("input = ({:.3}, {:.3})", out.x, out.y)
        }
        Command::End => {
            joystick.lock().on_drag_end();
            "released, input = (0, 0)".to_string()
        }
        Command::State => {
            let joystick = joystick.lock();
            let pos = position.load();
            let offset = joystick.stick_offset();
            let out = joystick.output();
            format!(
                "{} {:?}  {} ({:.3}, {:.3})  {} ({:.1}, {:.1})  {} ({:.1}, {:.1})",
                "state".bold(),
                joystick.state(),
                "input".bold(),
                out.x,
                out.y,
                "stick".bold(),
                offset.x,
                offset.y,
                "position".bold(),
                pos.x,
                pos.y,
            )
        }
        Command::Help => [
            "start            begin a drag",
            "drag <dx> <dy>   move the finger to (dx, dy) from the drag origin",
            "end              release the stick",
            "state            show joystick and character state",
            "quit             exit",
        ]
        .join("\n"),
        Command::Quit => "bye".to_string(),
    }
}

/// Read gesture commands until `quit`, EOF or Ctrl-C
pub fn run_repl(joystick: JoystickHandle, position: PositionSlot) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("touchstick> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match parse_command(&line) {
                    Ok(command) => {
                        println!("{}", execute(command, &joystick, &position));
                        if command == Command::Quit {
                            break;
                        }
                    }
                    Err(e) => println!("{} {:#}", "error:".red(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    // Never leave the character running after the console goes away
    joystick.lock().on_drag_end();
    Ok(())
}
