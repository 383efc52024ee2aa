use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

static SNAPSHOT_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_snapshot_poison_once(operation: &'static str) {
    if SNAPSHOT_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "loop metrics lock poisoned; keeping last snapshot");
    }
}

/// Per-second rates over the last completed metrics interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub repaints_per_sec: f32,
    pub ticks_per_sec: f32,
    pub samples_per_sec: f32,
    pub discrete_per_sec: f32,
}

#[derive(Clone, Debug)]
pub struct MetricsHandle {
    snapshot: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl Default for MetricsHandle {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(LoopMetricsSnapshot::default())),
        }
    }
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_snapshot_poison_once("snapshot");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_snapshot_poison_once("publish");
                *poisoned.into_inner() = snapshot;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    repaints: u32,
    ticks: u32,
    samples: u32,
    discrete: u32,
}

impl Counters {
    fn rates(self, elapsed: Duration) -> LoopMetricsSnapshot {
        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        LoopMetricsSnapshot {
            repaints_per_sec: self.repaints as f32 / seconds,
            ticks_per_sec: self.ticks as f32 / seconds,
            samples_per_sec: self.samples as f32 / seconds,
            discrete_per_sec: self.discrete as f32 / seconds,
        }
    }
}

/// Counts loop activity between snapshots. Owned by the session, never shared.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    window_start: Option<Instant>,
    counters: Counters,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
            counters: Counters::default(),
        }
    }

    pub(crate) fn record_repaint(&mut self) {
        self.counters.repaints = self.counters.repaints.saturating_add(1);
    }

    pub(crate) fn record_tick(&mut self) {
        self.counters.ticks = self.counters.ticks.saturating_add(1);
    }

    pub(crate) fn record_sample(&mut self) {
        self.counters.samples = self.counters.samples.saturating_add(1);
    }

    pub(crate) fn record_discrete(&mut self) {
        self.counters.discrete = self.counters.discrete.saturating_add(1);
    }

    /// The first call only anchors the window; time comes from repaint callbacks.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let window_start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(window_start);
        if self.interval.is_zero() || elapsed < self.interval {
            return None;
        }
        self.window_start = Some(now);
        Some(mem::take(&mut self.counters).rates(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;
    use std::thread;

    use super::*;

    fn poison_lock(lock: &RwLock<LoopMetricsSnapshot>) {
        thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = lock.write().expect("write guard");
                    panic!("poison metrics lock");
                })
                .join();
        });
    }

    #[test]
    fn snapshot_computes_expected_rates() {
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1));
        let base = Instant::now();
        assert!(accumulator.maybe_snapshot(base).is_none());

        for _ in 0..60 {
            accumulator.record_repaint();
        }
        for _ in 0..5 {
            accumulator.record_tick();
        }
        for _ in 0..120 {
            accumulator.record_sample();
        }
        accumulator.record_discrete();
        accumulator.record_discrete();

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("snapshot should be emitted");

        assert!((snapshot.repaints_per_sec - 30.0).abs() < 0.05);
        assert!((snapshot.ticks_per_sec - 2.5).abs() < 0.05);
        assert!((snapshot.samples_per_sec - 60.0).abs() < 0.05);
        assert!((snapshot.discrete_per_sec - 1.0).abs() < 0.05);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1));
        let base = Instant::now();
        accumulator.maybe_snapshot(base);
        accumulator.record_repaint();

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn counters_reset_after_snapshot() {
        let mut accumulator = MetricsAccumulator::new(Duration::from_secs(1));
        let base = Instant::now();
        accumulator.maybe_snapshot(base);
        accumulator.record_tick();
        accumulator.maybe_snapshot(base + Duration::from_secs(1));

        let next = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second snapshot");
        assert_eq!(next.ticks_per_sec, 0.0);
    }

    #[test]
    fn snapshot_recovers_after_poison_without_panic() {
        let handle = MetricsHandle::default();
        poison_lock(handle.snapshot.as_ref());

        assert_eq!(handle.snapshot(), LoopMetricsSnapshot::default());
    }

    #[test]
    fn publish_recovers_after_poison_without_panic() {
        let handle = MetricsHandle::default();
        poison_lock(handle.snapshot.as_ref());

        let expected = LoopMetricsSnapshot {
            repaints_per_sec: 60.0,
            ticks_per_sec: 5.0,
            samples_per_sec: 0.0,
            discrete_per_sec: 1.0,
        };
        handle.publish(expected);

        assert_eq!(handle.snapshot(), expected);
    }
}
