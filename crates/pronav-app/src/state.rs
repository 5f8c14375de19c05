//! Application state shared between the control side and the simulation
//! thread.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use pronav_core::commands::PlayerCommand;
use pronav_core::state::SimSnapshot;

/// Commands sent from the control layer to the simulation thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A control command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the simulation thread gracefully.
    Shutdown,
}

/// Binary hand-off event: a flag guarded by a mutex, with a condvar to
/// wake waiters when it becomes set.
#[derive(Debug, Default)]
pub struct Signal {
    flag: Mutex<bool>,
    changed: Condvar,
}

impl Signal {
    pub fn new(initial: bool) -> Self {
        Self {
            flag: Mutex::new(initial),
            changed: Condvar::new(),
        }
    }

    pub fn set(&self) {
        if let Ok(mut flag) = self.flag.lock() {
            *flag = true;
            self.changed.notify_all();
        }
    }

    pub fn reset(&self) {
        if let Ok(mut flag) = self.flag.lock() {
            *flag = false;
        }
    }

    pub fn is_set(&self) -> bool {
        self.flag.lock().map(|flag| *flag).unwrap_or(false)
    }

    /// Block until the signal is set or `timeout` passes. Returns whether
    /// the signal was set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Ok(flag) = self.flag.lock() else {
            return false;
        };
        match self.changed.wait_timeout_while(flag, timeout, |set| !*set) {
            Ok((flag, _)) => *flag,
            Err(_) => false,
        }
    }
}

/// The two signals the simulation thread and its controller hand off on.
#[derive(Debug)]
pub struct LoopSignals {
    /// Set by the worker while it is idle before its next substep batch.
    pub parked: Signal,
    /// Cleared by the controller to make the worker stop looping and park.
    pub running: Signal,
}

impl Default for LoopSignals {
    fn default() -> Self {
        Self {
            parked: Signal::new(false),
            running: Signal::new(true),
        }
    }
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` holds state that does not exist before `start_simulation`
/// - `Arc<...>` is shared with the simulation thread
pub struct AppState {
    /// Channel sender to forward commands to the simulation thread.
    /// `None` before `start_simulation` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the simulation thread after each frame.
    pub latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    pub signals: Arc<LoopSignals>,
    pub worker: Mutex<Option<JoinHandle<()>>>,
    /// Whether the simulation thread is currently running.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            signals: Arc::new(LoopSignals::default()),
            worker: Mutex::new(None),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use test_log::test;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(state.worker.lock().unwrap().is_none());
        assert!(!*state.running.lock().unwrap());
        assert!(state.signals.running.is_set());
        assert!(!state.signals.parked.is_set());
    }

    #[test]
    fn test_signal_wait_times_out_when_unset() {
        let signal = Signal::new(false);
        let start = Instant::now();
        assert!(!signal.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_signal_wakes_waiter_across_threads() {
        let signal = Arc::new(Signal::new(false));
        let setter = Arc::clone(&signal);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            setter.set();
        });
        assert!(signal.wait_timeout(Duration::from_secs(5)));
        handle.join().unwrap();

        signal.reset();
        assert!(!signal.is_set());
    }
}
