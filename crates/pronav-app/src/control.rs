//! Control handlers: the boundary between the shell and the simulation
//! thread.
//!
//! Every handler takes the shared [`AppState`] and reports failures as
//! `Result<_, String>`, the way an IPC layer would.

use std::time::Duration;

use pronav_core::commands::PlayerCommand;
use pronav_core::state::SimSnapshot;
use pronav_sim::engine::SimConfig;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

/// Start the simulation thread if it is not already running.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    frame_duration: Duration,
) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;

    if *running {
        return Err("Simulation already running".into());
    }

    *state.latest_snapshot.lock().map_err(|e| e.to_string())? = None;
    state.signals.parked.reset();
    state.signals.running.set();
    let (cmd_tx, handle) = game_loop::spawn_game_loop(
        config,
        frame_duration,
        state.latest_snapshot.clone(),
        state.signals.clone(),
    )?;

    let mut tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;
    *tx_lock = Some(cmd_tx);
    let mut worker = state.worker.lock().map_err(|e| e.to_string())?;
    *worker = Some(handle);
    *running = true;

    log::info!("simulation started");
    Ok(())
}

/// Send a command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), String> {
    let tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| format!("Failed to send command: {}", e)),
        None => Err("Simulation not started".into()),
    }
}

/// Get the latest snapshot (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<SimSnapshot>, String> {
    let lock = state.latest_snapshot.lock().map_err(|e| e.to_string())?;
    Ok(lock.clone())
}

/// Hold the simulation thread before its next frame and wait until it
/// confirms it has parked.
pub fn pause_and_wait(state: &AppState, timeout: Duration) -> Result<(), String> {
    ensure_running(state)?;
    // Drop any park left over from before the last resume.
    state.signals.parked.reset();
    state.signals.running.reset();
    if state.signals.parked.wait_timeout(timeout) {
        Ok(())
    } else {
        Err(format!("Simulation did not park within {timeout:?}"))
    }
}

/// Release a parked simulation thread.
pub fn resume(state: &AppState) -> Result<(), String> {
    ensure_running(state)?;
    state.signals.parked.reset();
    state.signals.running.set();
    Ok(())
}

/// Stop the simulation thread and wait for it to exit.
pub fn shutdown(state: &AppState, timeout: Duration) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;
    if !*running {
        return Err("Simulation not started".into());
    }

    let tx = state
        .command_tx
        .lock()
        .map_err(|e| e.to_string())?
        .take();
    if let Some(tx) = tx {
        // A send error means the thread is already gone.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    state.signals.parked.reset();
    state.signals.running.set();
    *running = false;

    if !state.signals.parked.wait_timeout(timeout) {
        return Err(format!("Simulation did not stop within {timeout:?}"));
    }
    let handle = state.worker.lock().map_err(|e| e.to_string())?.take();
    if let Some(handle) = handle {
        handle
            .join()
            .map_err(|_| "Simulation thread panicked".to_string())?;
    }
    log::info!("simulation stopped");
    Ok(())
}

/// One-line human-readable summary of a snapshot.
pub fn summarize(snapshot: &SimSnapshot) -> String {
    format!(
        "frame {} t={:.2}s{} | {:?} {:?} | targets {} missiles {} bullets {} explosions {} | events {}",
        snapshot.time.frame,
        snapshot.time.elapsed_secs,
        if snapshot.paused { " (paused)" } else { "" },
        snapshot.guidance,
        snapshot.missile_kind,
        snapshot.targets.len(),
        snapshot.missiles.len(),
        snapshot.bullets.len(),
        snapshot.explosions.len(),
        snapshot.events.len(),
    )
}

fn ensure_running(state: &AppState) -> Result<(), String> {
    let running = state.running.lock().map_err(|e| e.to_string())?;
    if *running {
        Ok(())
    } else {
        Err("Simulation not started".into())
    }
}
