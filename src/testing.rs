//! Fakes shared by the unit tests.

use crate::injector::{InjectError, InputInjector};
use crate::mover::Clock;
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Time that only advances when something sleeps on it.
pub struct VirtualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    stop_at: Mutex<Option<(Duration, Arc<AtomicBool>)>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), elapsed: Mutex::new(Duration::ZERO), stop_at: Mutex::new(None) }
    }

    pub fn elapsed(&self) -> Duration { *self.elapsed.lock() }

    /// Raises `flag` once virtual time reaches `at`.
    pub fn stop_at(&self, at: Duration, flag: Arc<AtomicBool>) {
        *self.stop_at.lock() = Some((at, flag));
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant { self.origin + self.elapsed() }

    fn sleep(&self, dur: Duration) {
        let now = {
            let mut elapsed = self.elapsed.lock();
            *elapsed += dur;
            *elapsed
        };
        if let Some((at, flag)) = &*self.stop_at.lock() {
            if now >= *at { flag.store(true, Ordering::Relaxed); }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub dx: i32,
    pub dy: i32,
    /// Clock time since the injector was created.
    pub at: Duration,
}

pub struct RecordingInjector {
    clock: Arc<dyn Clock>,
    origin: Instant,
    moves: Mutex<Vec<Move>>,
}

impl RecordingInjector {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let origin = clock.now();
        Self { clock, origin, moves: Mutex::new(Vec::new()) }
    }

    pub fn moves(&self) -> Vec<Move> { self.moves.lock().clone() }
}

impl InputInjector for RecordingInjector {
    fn inject(&self, dx: i32, dy: i32) -> Result<(), InjectError> {
        let at = self.clock.now().saturating_duration_since(self.origin);
        self.moves.lock().push(Move { dx, dy, at });
        Ok(())
    }
}

/// Succeeds until the `fail_on`-th call (1-indexed), which is refused.
pub struct FailingInjector {
    fail_on: usize,
    calls: AtomicUsize,
}

impl FailingInjector {
    pub fn new(fail_on: usize) -> Self { Self { fail_on, calls: AtomicUsize::new(0) } }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::Relaxed) }
}

impl InputInjector for FailingInjector {
    fn inject(&self, _dx: i32, _dy: i32) -> Result<(), InjectError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if n >= self.fail_on {
            return Err(InjectError::Refused("access denied".into()));
        }
        Ok(())
    }
}
