//! Interpolation of the controlled entity between fixed ticks.
//!
//! The controlled entity only moves on network ticks. During the render frames in between, it is
//! displayed with one tick of delay, interpolated between the previous and the current tick using
//! the overstep of `Time<Fixed>`.
use bevy_ecs::component::Component;
use bevy_math::Vec3;
use roomsync_core::easings::lerp_angle;

#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct FrameInterpolate {
    pub previous: Option<(Vec3, f32)>,
    pub current: Option<(Vec3, f32)>,
}

impl FrameInterpolate {
    /// Record the state reached at the end of a tick
    pub fn push(&mut self, position: Vec3, rotation: f32) {
        self.previous = self.current.or(Some((position, rotation)));
        self.current = Some((position, rotation));
    }

    /// Translate the recorded history, after the simulation position was moved by `delta`
    pub fn shift(&mut self, delta: Vec3) {
        for (position, _) in [&mut self.previous, &mut self.current].into_iter().flatten() {
            *position += delta;
        }
    }

    /// Forget the history; the next frames display the simulation state as is
    pub fn reset(&mut self) {
        self.previous = None;
        self.current = None;
    }

    /// Interpolated state at `overstep` (in `[0, 1]`) between the previous and the current tick
    pub fn interpolate(&self, overstep: f32) -> Option<(Vec3, f32)> {
        let (previous, previous_rotation) = self.previous?;
        let (current, current_rotation) = self.current?;
        let t = overstep.clamp(0.0, 1.0);
        Some((
            previous.lerp(current, t),
            lerp_angle(previous_rotation, current_rotation, t),
        ))
    }
}
