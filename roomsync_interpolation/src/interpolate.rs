use bevy_ecs::component::Component;
use bevy_math::Vec3;
use core::time::Duration;
use roomsync_core::easings::lerp_angle;
use roomsync_core::prelude::VisualState;

/// Current interpolation segment of a remote entity
#[derive(Component, Debug, Clone, PartialEq)]
pub struct InterpolateStatus {
    start: VisualState,
    end: VisualState,
    /// Fraction of the segment covered, in `[0, 1]`
    progress: f32,
}

impl Default for InterpolateStatus {
    fn default() -> Self {
        Self {
            start: VisualState::default(),
            end: VisualState::default(),
            progress: 1.0,
        }
    }
}

impl InterpolateStatus {
    /// Start a new segment from what is displayed now toward the new authoritative value
    pub fn retarget(&mut self, current: VisualState, target: VisualState) {
        self.start = current;
        self.end = target;
        self.progress = 0.0;
    }

    /// Jump straight to `target`
    pub fn settle(&mut self, target: VisualState) {
        self.start = target;
        self.end = target;
        self.progress = 1.0;
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> VisualState {
        self.end
    }

    /// Advance along the segment and return the state to display
    pub fn advance(&mut self, delta: Duration, segment_duration: Duration) -> VisualState {
        self.progress = if segment_duration.is_zero() {
            1.0
        } else {
            (self.progress + delta.as_secs_f32() / segment_duration.as_secs_f32()).min(1.0)
        };
        self.sample()
    }

    fn sample(&self) -> VisualState {
        let position: Vec3 = self.start.position.lerp(self.end.position, self.progress);
        let rotation = lerp_angle(self.start.rotation, self.end.rotation, self.progress);
        VisualState::new(position, rotation)
    }
}
