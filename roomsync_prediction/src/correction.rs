//! Visual absorption of a prediction error.
//!
//! When the simulation position of the controlled entity is corrected, the displayed position
//! must not jump. The displayed position is `simulation + offset`, where the offset starts at the
//! error and decays to zero with an ease-out curve.
use bevy_ecs::component::Component;
use bevy_math::Vec3;
use core::time::Duration;
use roomsync_core::easings::ease_out_quad;

#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct VisualCorrection {
    initial: Vec3,
    elapsed: Duration,
    duration: Duration,
}

impl VisualCorrection {
    /// Start absorbing `error`. An ongoing correction is folded into the new one, so that the
    /// displayed position stays continuous.
    pub fn start(&mut self, error: Vec3, duration: Duration) {
        self.initial = self.offset() + error;
        self.elapsed = Duration::ZERO;
        self.duration = duration;
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration
    }

    pub fn advance(&mut self, delta: Duration) {
        if self.is_active() {
            self.elapsed = (self.elapsed + delta).min(self.duration);
        }
    }

    /// Offset to add to the simulation position this frame
    pub fn offset(&self) -> Vec3 {
        if !self.is_active() {
            return Vec3::ZERO;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.initial * (1.0 - ease_out_quad(t))
    }
}
