//! Per-room run-state owned by the scheduler.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tokio::task::JoinHandle;

/// Bookkeeping for one room: active flag, task handle and turn counter.
///
/// Every run gets its own active flag, so a task that has been aborted but is
/// still finishing its current poll can never observe a later run's flag.
#[derive(Debug)]
pub(crate) struct RoomRunState {
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    turn_counter: Arc<AtomicU64>,
}

impl RoomRunState {
    pub(crate) fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            handle: None,
            turn_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
            && self
                .handle
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop any previous run and hand out the active flag of a new one.
    pub(crate) fn arm(&mut self) -> Arc<AtomicBool> {
        self.stop();
        self.active = Arc::new(AtomicBool::new(true));
        Arc::clone(&self.active)
    }

    pub(crate) fn attach(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
    }

    /// Clear the active flag and abort the task. Returns whether it was running.
    pub(crate) fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.active.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        was_running
    }

    pub(crate) fn turn_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.turn_counter)
    }
}
