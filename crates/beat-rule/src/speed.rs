use log::{debug, warn};

use crate::input::ControlSignals;

/// Scroll speed modified by speed buttons and pinch gestures.
#[derive(Debug, Clone)]
pub struct SpeedController {
    speed: f64,
    min_speed: f64,
    max_speed: f64,
    last_pinch: Option<f64>,
}

impl SpeedController {
    pub const STEP: f64 = 0.5;
    pub const FINE_STEP: f64 = 0.1;

    /// Bounds are expected to be validated already; the initial speed is
    /// clamped into them.
    pub fn new(speed: f64, min_speed: f64, max_speed: f64) -> Self {
        Self {
            speed: speed.clamp(min_speed, max_speed),
            min_speed,
            max_speed,
            last_pinch: None,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Fold one tick of controls into the speed and return it.
    pub fn apply(&mut self, controls: &ControlSignals) -> f64 {
        let step = if controls.select { Self::FINE_STEP } else { Self::STEP };
        if controls.speed_up {
            self.set(self.speed + step);
        }
        if controls.speed_down {
            self.set(self.speed - step);
        }
        self.apply_pinch(controls.pinch);
        self.speed
    }

    fn apply_pinch(&mut self, pinch: Option<f64>) {
        let Some(magnitude) = pinch else {
            self.last_pinch = None;
            return;
        };
        if !magnitude.is_finite() || magnitude <= 0.0 {
            warn!("ignoring invalid pinch magnitude {magnitude}");
            self.last_pinch = None;
            return;
        }
        if let Some(previous) = self.last_pinch {
            self.set(self.speed * (magnitude / previous));
        }
        self.last_pinch = Some(magnitude);
    }

    fn set(&mut self, speed: f64) {
        let clamped = speed.clamp(self.min_speed, self.max_speed);
        if clamped != self.speed {
            debug!("speed {} -> {}", self.speed, clamped);
        }
        self.speed = clamped;
    }
}
