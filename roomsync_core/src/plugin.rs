use crate::movement::MovementConfig;
use crate::time::{FrameDelta, TickDuration};
use bevy_app::{App, Plugin, Update};
use bevy_ecs::prelude::*;
use bevy_time::{Fixed, Real, Time, TimePlugin, Virtual};
use core::time::Duration;
use tracing::debug;

/// System sets of the render-frame pipeline, run in order in the `Update` schedule.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum FrameSet {
    /// Measure and clamp the frame delta
    Delta,
    /// Advance corrections and interpolations of every entity
    Advance,
    /// Animation, level-of-detail and camera
    Animate,
    /// Copy the visual state to the render transform
    Present,
}

pub struct CorePlugin {
    pub tick_duration: Duration,
    /// Frame deltas larger than this are clamped
    pub max_frame_delta: Duration,
    pub movement: MovementConfig,
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self {
            tick_duration: TickDuration::default().0,
            max_frame_delta: Duration::from_millis(250),
            movement: MovementConfig::default(),
        }
    }
}

impl CorePlugin {
    /// Measure the wall-clock delta of this frame; every later per-frame system uses the clamped value
    pub(crate) fn update_frame_delta(time: Res<Time<Real>>, mut frame: ResMut<FrameDelta>) {
        frame.record(time.delta());
        if frame.was_clamped() {
            debug!(raw = ?frame.raw, clamped = ?frame.clamped, "clamping frame delta");
        }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TimePlugin>() {
            app.add_plugins(TimePlugin);
        }
        debug!(tick_duration = ?self.tick_duration, max_frame_delta = ?self.max_frame_delta, "configuring network tick");
        app.insert_resource(Time::<Fixed>::from_duration(self.tick_duration));
        // a stall must not run a burst of catch-up ticks either
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .set_max_delta(self.max_frame_delta);

        app.insert_resource(TickDuration(self.tick_duration));
        app.insert_resource(self.movement);
        app.insert_resource(FrameDelta::new(Duration::ZERO, self.max_frame_delta));

        app.configure_sets(
            Update,
            (
                FrameSet::Delta,
                FrameSet::Advance,
                FrameSet::Animate,
                FrameSet::Present,
            )
                .chain(),
        );
        app.add_systems(Update, Self::update_frame_delta.in_set(FrameSet::Delta));
    }
}
