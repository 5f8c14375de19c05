//! Simulation thread: runs the engine one frame at a time and publishes
//! snapshots.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive via `mpsc`. Snapshots are stored in shared state for polling.
//! When the controller clears the `running` signal the thread parks before
//! its next frame, sets `parked`, and keeps draining commands until it is
//! resumed or shut down.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use pronav_core::state::SimSnapshot;
use pronav_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{GameLoopCommand, LoopSignals};

/// How often a parked thread re-checks its command channel.
const PARK_POLL: Duration = Duration::from_millis(20);

/// Spawns the simulation thread.
///
/// `frame_duration` is the wall-clock pacing between frames; zero runs
/// flat out. Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    frame_duration: Duration,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    signals: Arc<LoopSignals>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>), String> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("pronav-sim-loop".into())
        .spawn(move || {
            run_game_loop(config, frame_duration, cmd_rx, &latest_snapshot, &signals);
            signals.running.reset();
            signals.parked.set();
            log::debug!("simulation thread stopped");
        })
        .map_err(|e| format!("Failed to spawn simulation thread: {e}"))?;

    Ok((cmd_tx, handle))
}

/// The loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    frame_duration: Duration,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
    signals: &LoopSignals,
) {
    let mut engine = SimulationEngine::new(config);
    let mut next_frame_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Park while the controller holds us
        if !signals.running.is_set() {
            signals.parked.set();
            // A resume can land between the check and the set.
            if !signals.running.is_set() {
                signals.running.wait_timeout(PARK_POLL);
                next_frame_time = Instant::now();
                continue;
            }
        }
        signals.parked.reset();

        // 3. Advance one frame (the engine handles pause semantics)
        let snapshot = engine.tick();
        for event in &snapshot.events {
            log::trace!("frame {}: {event:?}", snapshot.time.frame);
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next frame
        next_frame_time += frame_duration;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > frame_duration * 2 {
            // Too far behind; reset to avoid a catch-up spiral.
            next_frame_time = now;
        }
    }
}
