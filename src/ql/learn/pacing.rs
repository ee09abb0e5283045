use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::ql::prelude::{Environment, Presenter};

/// Limits the step rate to a number of ticks per second.
pub struct TickPacer {
    interval: Option<Duration>,
    next_tick: Instant,
}

impl TickPacer {
    /// `ticks_per_second` = 0 means: no limit
    pub fn new(ticks_per_second: u32) -> Self {
        let interval = (ticks_per_second > 0).then(|| Duration::from_secs(1) / ticks_per_second);
        Self {
            interval,
            next_tick: Instant::now(),
        }
    }

    pub fn unlimited() -> Self { Self::new(0) }

    /// Sleeps until the next tick is due
    pub fn wait(&mut self) {
        if let Some(interval) = self.interval {
            let now = Instant::now();
            if now < self.next_tick {
                thread::sleep(self.next_tick - now);
            }
            // no catching up after a slow step
            self.next_tick = Instant::max(self.next_tick, now) + interval;
        }
    }
}

/// Cloneable handle to request a stop from outside of the learning loop
#[derive(Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn request_stop(&self) { self.0.store(true, Ordering::SeqCst) }

    pub fn is_stop_requested(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

/// Presenter without any output. Paces the steps and honors a [StopSignal].
pub struct HeadlessPresenter {
    pacer: TickPacer,
    stop_signal: StopSignal,
}

impl HeadlessPresenter {
    pub fn new(
        pacer: TickPacer,
        stop_signal: StopSignal,
    ) -> Self {
        Self { pacer, stop_signal }
    }

    /// Runs as fast as possible and never stops by itself
    pub fn unpaced() -> Self { Self::new(TickPacer::unlimited(), StopSignal::default()) }
}

impl<E: Environment> Presenter<E> for HeadlessPresenter {
    fn present(
        &mut self,
        _environment: &E,
    ) -> Result<()> {
        Ok(())
    }

    fn wait_tick(&mut self) { self.pacer.wait() }

    fn stop_requested(&mut self) -> bool { self.stop_signal.is_stop_requested() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_limits_tick_rate() {
        let mut pacer = TickPacer::new(200);
        let start = Instant::now();
        for _ in 0..21 {
            pacer.wait();
        }
        // first tick is due immediately, the following 20 each 5ms apart
        assert!(start.elapsed() >= Duration::from_millis(100), "{:?}", start.elapsed());
    }

    #[test]
    fn test_unlimited_pacer_does_not_sleep() {
        let mut pacer = TickPacer::unlimited();
        let start = Instant::now();
        for _ in 0..1_000 {
            pacer.wait();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_stop_signal_is_shared() {
        let signal = StopSignal::default();
        let handle = signal.clone();
        assert!(!signal.is_stop_requested());
        handle.request_stop();
        assert!(signal.is_stop_requested());
    }
}
