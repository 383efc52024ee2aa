use std::mem;

use crate::{AxisIntent, Command, Horizontal, Vertical};

/// The latched `(vertical, horizontal)` pair between two accepted ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoalescedIntent {
    pub vertical: Option<Vertical>,
    pub horizontal: Option<Horizontal>,
}

impl CoalescedIntent {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    /// Commands for one accepted tick: vertical move, horizontal move, then `Render`.
    pub fn tick_commands(self) -> impl Iterator<Item = Command> {
        self.vertical
            .map(Command::from)
            .into_iter()
            .chain(self.horizontal.map(Command::from))
            .chain(std::iter::once(Command::Render))
    }
}

/// Single-writer / single-drainer latch between the motion sampler and the frame gate.
///
/// Both sides reach it through `&mut`, so exclusive access is enforced by the
/// owner rather than by a lock.
#[derive(Debug, Default)]
pub struct IntentCoalescer {
    pending: CoalescedIntent,
}

impl IntentCoalescer {
    pub fn latch(&mut self, intent: AxisIntent) {
        match intent {
            AxisIntent::Vertical(vertical) => self.pending.vertical = Some(vertical),
            AxisIntent::Horizontal(horizontal) => self.pending.horizontal = Some(horizontal),
        }
    }

    pub fn drain_and_reset(&mut self) -> CoalescedIntent {
        mem::take(&mut self.pending)
    }
}
