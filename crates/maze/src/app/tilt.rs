use intent::MotionSample;
use winit::keyboard::{KeyCode, PhysicalKey};

pub const DEFAULT_TILT_ACCEL: f32 = 6.0;

/// Stands in for a device accelerometer: I/J/K/L hold the device tilted.
///
/// Produces one sample per poll whether or not a key is held, like a motion
/// sensor does. Axis signs follow the device, so J (tilt left) reports a
/// positive `x`.
#[derive(Debug, Clone, Copy)]
pub struct TiltEmulator {
    accel: f32,
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
}

impl TiltEmulator {
    pub fn new(accel: f32) -> Self {
        Self {
            accel,
            forward: false,
            back: false,
            left: false,
            right: false,
        }
    }

    /// Returns true when the key belongs to the emulator.
    pub fn handle_key(&mut self, key: PhysicalKey, is_pressed: bool) -> bool {
        let slot = match key {
            PhysicalKey::Code(KeyCode::KeyI) => &mut self.forward,
            PhysicalKey::Code(KeyCode::KeyK) => &mut self.back,
            PhysicalKey::Code(KeyCode::KeyJ) => &mut self.left,
            PhysicalKey::Code(KeyCode::KeyL) => &mut self.right,
            _ => return false,
        };
        *slot = is_pressed;
        true
    }

    pub fn sample(&self) -> MotionSample {
        let y = axis(self.back, self.forward) * self.accel;
        let x = axis(self.left, self.right) * self.accel;
        MotionSample::new(x, y)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}
