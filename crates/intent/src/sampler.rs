use serde::{Deserialize, Serialize};

use crate::{AxisIntent, Horizontal, IntentCoalescer, Vertical};

/// Acceleration along the device axes for one motion event, gravity included.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
}

impl MotionSample {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis values a single sample crossed the dead zone on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleIntent {
    pub vertical: Option<Vertical>,
    pub horizontal: Option<Horizontal>,
}

/// Turns raw motion samples into latched directional intent.
///
/// Samples inside `[-threshold, threshold]` on an axis leave that axis alone.
/// The horizontal axis is mirrored: a negative `x` tilts the walker right.
#[derive(Debug, Clone, Copy)]
pub struct MotionSampler {
    threshold: f32,
}

impl MotionSampler {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn classify(&self, sample: MotionSample) -> SampleIntent {
        let vertical = if sample.y > self.threshold {
            Some(Vertical::Down)
        } else if sample.y < -self.threshold {
            Some(Vertical::Up)
        } else {
            None
        };

        let horizontal = if sample.x < -self.threshold {
            Some(Horizontal::Right)
        } else if sample.x > self.threshold {
            Some(Horizontal::Left)
        } else {
            None
        };

        SampleIntent {
            vertical,
            horizontal,
        }
    }

    /// Latches whatever the sample crossed the dead zone on. Returns what was latched.
    pub fn apply(&self, sample: MotionSample, coalescer: &mut IntentCoalescer) -> SampleIntent {
        let intent = self.classify(sample);
        if let Some(vertical) = intent.vertical {
            coalescer.latch(AxisIntent::Vertical(vertical));
        }
        if let Some(horizontal) = intent.horizontal {
            coalescer.latch(AxisIntent::Horizontal(horizontal));
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoalescedIntent;

    const THRESHOLD: f32 = 2.0;

    #[test]
    fn vertical_sign_convention() {
        let sampler = MotionSampler::new(THRESHOLD);
        assert_eq!(
            sampler.classify(MotionSample::new(0.0, 5.0)).vertical,
            Some(Vertical::Down)
        );
        assert_eq!(
            sampler.classify(MotionSample::new(0.0, -5.0)).vertical,
            Some(Vertical::Up)
        );
    }

    #[test]
    fn horizontal_sign_convention_is_mirrored() {
        let sampler = MotionSampler::new(THRESHOLD);
        assert_eq!(
            sampler.classify(MotionSample::new(-5.0, 0.0)).horizontal,
            Some(Horizontal::Right)
        );
        assert_eq!(
            sampler.classify(MotionSample::new(5.0, 0.0)).horizontal,
            Some(Horizontal::Left)
        );
    }

    #[test]
    fn threshold_boundary_is_inside_dead_zone() {
        let sampler = MotionSampler::new(THRESHOLD);
        let intent = sampler.classify(MotionSample::new(THRESHOLD, -THRESHOLD));
        assert_eq!(intent, SampleIntent::default());
    }

    #[test]
    fn both_axes_can_cross_in_one_sample() {
        let sampler = MotionSampler::new(THRESHOLD);
        let intent = sampler.classify(MotionSample::new(3.0, -3.0));
        assert_eq!(intent.vertical, Some(Vertical::Up));
        assert_eq!(intent.horizontal, Some(Horizontal::Left));
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let sampler = MotionSampler::new(THRESHOLD);
        let intent = sampler.classify(MotionSample::new(f32::NAN, f32::NAN));
        assert_eq!(intent, SampleIntent::default());
    }

    #[test]
    fn dead_zone_samples_leave_latch_unchanged() {
        let sampler = MotionSampler::new(THRESHOLD);
        let mut coalescer = IntentCoalescer::default();
        sampler.apply(MotionSample::new(-4.0, 4.0), &mut coalescer);

        let grid = [-2.0, -1.5, -0.25, 0.0, 0.75, 1.99, 2.0];
        for x in grid {
            for y in grid {
                sampler.apply(MotionSample::new(x, y), &mut coalescer);
            }
        }

        assert_eq!(
            coalescer.drain_and_reset(),
            CoalescedIntent {
                vertical: Some(Vertical::Down),
                horizontal: Some(Horizontal::Right),
            }
        );
    }

    #[test]
    fn latest_crossing_sample_wins_per_axis() {
        let sampler = MotionSampler::new(THRESHOLD);
        let mut coalescer = IntentCoalescer::default();
        let samples = [
            MotionSample::new(5.0, 5.0),
            MotionSample::new(0.0, -9.0),
            MotionSample::new(-3.0, 1.0),
            MotionSample::new(0.5, 0.5),
        ];
        for sample in samples {
            sampler.apply(sample, &mut coalescer);
        }

        let drained = coalescer.drain_and_reset();
        assert_eq!(drained.vertical, Some(Vertical::Up));
        assert_eq!(drained.horizontal, Some(Horizontal::Right));
    }

    #[test]
    fn negative_threshold_is_treated_as_magnitude() {
        let sampler = MotionSampler::new(-THRESHOLD);
        assert_eq!(sampler.threshold(), THRESHOLD);
    }
}
