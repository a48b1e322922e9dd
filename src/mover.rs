use crate::config::RunConfig;
use crate::injector::InputInjector;
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use tracing::{debug, error, info};

/// Longest single sleep while waiting out an interval; bounds stop latency.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

// -------------- Time --------------
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, dur: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
    fn sleep(&self, dur: Duration) { thread::sleep(dur) }
}

// -------------- Status --------------
#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    Idle,
    Remaining { minutes: f64 },
    Completed,
    Stopped,
    Failed(String),
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Stopped | Status::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("Idle"),
            Status::Remaining { minutes } => write!(f, "{minutes:.1} min left"),
            Status::Completed => f.write_str("Completed"),
            Status::Stopped => f.write_str("Stopped"),
            Status::Failed(reason) => write!(f, "Error: {reason}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction { Forward, Back }

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Back,
            Direction::Back => Direction::Forward,
        }
    }

    fn apply(self, mickeys: i32) -> i32 {
        match self {
            Direction::Forward => mickeys,
            Direction::Back => mickeys.saturating_neg(),
        }
    }
}

// -------------- Movement Loop --------------
/// One run: nudges the cursor back and forth until the duration elapses or
/// a stop is requested.
///
/// Ticks fall on a fixed grid `start + k * interval` and fire while that
/// grid point is not past the duration, so a run makes
/// `floor(duration / interval) + 1` moves when left alone. The wait after
/// the last tick is cut short at the deadline.
pub struct MovementLoop {
    config: RunConfig,
    injector: Arc<dyn InputInjector>,
    clock: Arc<dyn Clock>,
    stop: Arc<AtomicBool>,
}

impl MovementLoop {
    pub fn new(config: RunConfig, injector: Arc<dyn InputInjector>, clock: Arc<dyn Clock>) -> Self {
        Self { config, injector, clock, stop: Arc::new(AtomicBool::new(false)) }
    }

    /// Shared flag; storing `true` ends the run at the next poll.
    pub fn stop_flag(&self) -> Arc<AtomicBool> { Arc::clone(&self.stop) }

    fn stop_requested(&self) -> bool { self.stop.load(Ordering::Relaxed) }

    /// Runs to completion on the calling thread. Every tick reports the time
    /// left, and exactly one terminal status is reported last and returned.
    pub fn run(self, mut report: impl FnMut(Status)) -> Status {
        let cfg = self.config;
        let start = self.clock.now();
        let mut direction = Direction::Forward;
        let mut next_tick = Duration::ZERO;

        info!(
            duration_secs = cfg.duration.as_secs_f64(),
            interval_secs = cfg.interval.as_secs_f64(),
            mickeys = cfg.mickeys,
            "movement run started"
        );

        let outcome = loop {
            if self.stop_requested() { break Status::Stopped; }
            if next_tick > cfg.duration { break Status::Completed; }

            let dx = direction.apply(cfg.mickeys);
            if let Err(err) = self.injector.inject(dx, 0) {
                error!(%err, dx, "mouse injection failed, ending run");
                break Status::Failed(err.to_string());
            }
            direction = direction.flip();

            let elapsed = self.clock.now().saturating_duration_since(start);
            let remaining = cfg.duration.saturating_sub(elapsed);
            debug!(dx, remaining_secs = remaining.as_secs_f64(), "tick");
            report(Status::Remaining { minutes: remaining.as_secs_f64() / 60.0 });

            next_tick = next_tick.saturating_add(cfg.interval);
            self.wait_until(start, next_tick.min(cfg.duration));
        };

        info!(outcome = %outcome, "movement run finished");
        report(outcome.clone());
        outcome
    }

    /// Sleeps in slices of at most [`POLL_INTERVAL`] until `target` past
    /// `start`, returning early once a stop is requested.
    fn wait_until(&self, start: Instant, target: Duration) {
        while !self.stop_requested() {
            let elapsed = self.clock.now().saturating_duration_since(start);
            let left = target.saturating_sub(elapsed);
            if left.is_zero() { break; }
            self.clock.sleep(left.min(POLL_INTERVAL));
        }
    }
}

// -------------- Background Job --------------
/// A [`MovementLoop`] running on its own thread, with its status reports
/// queued for the UI thread.
pub struct MoveJob {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    status_rx: Receiver<Status>,
    finished: bool,
}

impl MoveJob {
    /// `wake` is called after every queued report so the UI can repaint.
    pub fn spawn<F>(mover: MovementLoop, wake: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let stop = mover.stop_flag();
        let (tx, status_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            mover.run(|status| {
                // Receiver gone means the window closed; the stop flag ends us
                if tx.send(status).is_ok() { wake(); }
            });
        });

        Self { stop, handle: Some(handle), status_rx, finished: false }
    }

    /// Requests a stop and blocks until the thread has exited.
    /// Calling it again, or after the run ended, does nothing more.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.join();
    }

    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("movement thread panicked");
            }
        }
    }

    /// Drains queued reports without blocking. If the thread went away
    /// without a terminal report, a failure is synthesized so the run
    /// still ends exactly once.
    pub fn poll(&mut self) -> Vec<Status> {
        let mut out = Vec::new();
        if self.finished { return out; }
        loop {
            match self.status_rx.try_recv() {
                Ok(status) => {
                    let terminal = status.is_terminal();
                    out.push(status);
                    if terminal {
                        self.finished = true;
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    out.push(Status::Failed("movement thread exited unexpectedly".into()));
                    break;
                }
            }
        }
        out
    }
}

impl Drop for MoveJob {
    fn drop(&mut self) { self.stop(); }
}
