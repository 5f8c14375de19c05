use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result};

use pronav_app::control;
use pronav_app::state::AppState;
use pronav_core::commands::PlayerCommand;
use pronav_core::constants::PARK_TIMEOUT_MS;
use pronav_sim::engine::SimConfig;

const PARK_TIMEOUT: Duration = Duration::from_millis(PARK_TIMEOUT_MS);

/// Reads `PRONAV_CONFIG` as JSON, falling back to defaults.
fn load_config() -> SimConfig {
    let Ok(json) = std::env::var("PRONAV_CONFIG") else {
        return SimConfig::default();
    };
    serde_json::from_str(&json).unwrap_or_else(|err| {
        log::warn!("invalid PRONAV_CONFIG, using defaults: {err}");
        SimConfig::default()
    })
}

fn print_status(state: &AppState) -> Result<()> {
    match control::get_snapshot(state).map_err(anyhow::Error::msg)? {
        Some(snapshot) => println!("{}", control::summarize(&snapshot)),
        None => println!("no frame yet"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("pronav=info"))
        .init();

    let config = load_config().sanitized();
    let frame_duration = Duration::from_secs_f64(config.dt);
    let state = AppState::new();
    control::start_simulation(&state, config, frame_duration).map_err(anyhow::Error::msg)?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "status" => print_status(&state)?,
            "snapshot" => {
                let snapshot = control::get_snapshot(&state).map_err(anyhow::Error::msg)?;
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            "hold" => {
                control::pause_and_wait(&state, PARK_TIMEOUT).map_err(anyhow::Error::msg)?;
                println!("held");
            }
            "release" => control::resume(&state).map_err(anyhow::Error::msg)?,
            _ => match serde_json::from_str::<PlayerCommand>(line) {
                Ok(command) => {
                    control::send_command(&state, command).map_err(anyhow::Error::msg)?
                }
                Err(err) => log::warn!("ignoring {line:?}: {err}"),
            },
        }
    }

    control::shutdown(&state, PARK_TIMEOUT).map_err(anyhow::Error::msg)?;
    print_status(&state)
}
