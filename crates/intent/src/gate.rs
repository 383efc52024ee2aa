use std::time::{Duration, Instant};

use crate::{CoalescedIntent, IntentCoalescer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Waiting,
    Due,
}

/// Minimum-interval gate driven by repaint callbacks.
///
/// `last_accepted` starts empty, so the first callback after construction is
/// always due. A callback whose timestamp precedes the last accepted tick
/// counts as zero elapsed time.
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl FrameGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    pub fn state(&self, now: Instant) -> GateState {
        match self.last_accepted {
            None => GateState::Due,
            Some(last) if now.saturating_duration_since(last) > self.interval => GateState::Due,
            Some(_) => GateState::Waiting,
        }
    }

    /// Drains the coalescer and records `now` when due; touches nothing while waiting.
    pub fn try_tick(
        &mut self,
        now: Instant,
        coalescer: &mut IntentCoalescer,
    ) -> Option<CoalescedIntent> {
        if self.state(now) == GateState::Waiting {
            return None;
        }
        self.last_accepted = Some(now);
        Some(coalescer.drain_and_reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisIntent, Vertical};

    const INTERVAL: Duration = Duration::from_millis(200);

    #[test]
    fn first_callback_is_due() {
        let gate = FrameGate::new(INTERVAL);
        assert_eq!(gate.state(Instant::now()), GateState::Due);
    }

    #[test]
    fn callbacks_within_interval_wait_and_leave_latch_alone() {
        let base = Instant::now();
        let mut gate = FrameGate::new(INTERVAL);
        let mut coalescer = IntentCoalescer::default();
        assert!(gate.try_tick(base, &mut coalescer).is_some());

        coalescer.latch(AxisIntent::Vertical(Vertical::Down));
        assert!(gate
            .try_tick(base + Duration::from_millis(5), &mut coalescer)
            .is_none());
        assert!(gate.try_tick(base + INTERVAL, &mut coalescer).is_none());

        let drained = gate
            .try_tick(base + INTERVAL + Duration::from_millis(1), &mut coalescer)
            .expect("due after interval");
        assert_eq!(drained.vertical, Some(Vertical::Down));
    }

    #[test]
    fn accepted_tick_moves_the_clock() {
        let base = Instant::now();
        let mut gate = FrameGate::new(INTERVAL);
        let mut coalescer = IntentCoalescer::default();
        let later = base + Duration::from_millis(450);
        gate.try_tick(base, &mut coalescer);
        gate.try_tick(later, &mut coalescer);
        assert_eq!(gate.last_accepted(), Some(later));
    }

    #[test]
    fn timestamp_before_last_tick_waits() {
        let base = Instant::now() + Duration::from_secs(1);
        let mut gate = FrameGate::new(INTERVAL);
        let mut coalescer = IntentCoalescer::default();
        gate.try_tick(base, &mut coalescer);
        assert_eq!(
            gate.state(base - Duration::from_millis(500)),
            GateState::Waiting
        );
    }

    #[test]
    fn accepted_ticks_are_independent_of_repaint_rate() {
        let window = Duration::from_secs(3);
        for repaint_every_ms in [1u64, 4, 7, 8, 16] {
            let base = Instant::now();
            let mut gate = FrameGate::new(INTERVAL);
            let mut coalescer = IntentCoalescer::default();
            let mut ticks = 0u128;
            let mut at = Duration::ZERO;
            while at <= window {
                if gate.try_tick(base + at, &mut coalescer).is_some() {
                    ticks += 1;
                }
                at += Duration::from_millis(repaint_every_ms);
            }

            let expected = window.as_millis() / INTERVAL.as_millis();
            assert!(
                ticks + 1 >= expected && ticks <= expected + 1,
                "repaint every {repaint_every_ms}ms gave {ticks} ticks, expected {expected}±1"
            );
        }
    }
}
