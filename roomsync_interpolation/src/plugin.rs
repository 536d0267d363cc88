use crate::interpolate::InterpolateStatus;
use bevy_app::{App, Plugin, PreUpdate, Update};
use bevy_ecs::prelude::*;
use core::time::Duration;
use roomsync_core::prelude::{FrameDelta, FrameSet, Position, Rotation, TickDuration, VisualState};
use roomsync_replication::prelude::{Interpolated, ReplicationSet};
use tracing::trace;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum InterpolationSet {
    // PRE UPDATE
    /// Start a new segment for every entity that received an authoritative update
    Retarget,
    // UPDATE
    /// Move the displayed state along the segments
    Interpolate,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct InterpolationConfig {
    /// Time to cover one segment; usually the interval between two room updates
    pub segment_duration: Duration,
}

#[derive(Default)]
pub struct InterpolationPlugin {
    /// Defaults to the network tick duration
    pub segment_duration: Option<Duration>,
}

impl InterpolationPlugin {
    pub(crate) fn retarget(
        mut query: Query<
            (Entity, Ref<Position>, &Rotation, &VisualState, &mut InterpolateStatus),
            (With<Interpolated>, Changed<Position>),
        >,
    ) {
        for (entity, position, rotation, visual, mut status) in query.iter_mut() {
            let target = VisualState::new(position.0, rotation.0);
            if position.is_added() {
                status.settle(target);
            } else {
                trace!(?entity, from = ?visual.position, to = ?target.position, "new interpolation segment");
                status.retarget(*visual, target);
            }
        }
    }

    pub(crate) fn interpolate(
        config: Res<InterpolationConfig>,
        frame: Res<FrameDelta>,
        mut query: Query<(&mut InterpolateStatus, &mut VisualState), With<Interpolated>>,
    ) {
        for (mut status, mut visual) in query.iter_mut() {
            if status.progress() >= 1.0 {
                visual.set_if_neq(status.target());
                continue;
            }
            *visual = status.advance(frame.clamped, config.segment_duration);
        }
    }
}

impl Plugin for InterpolationPlugin {
    fn build(&self, app: &mut App) {
        let segment_duration = self.segment_duration.unwrap_or_else(|| {
            app.world()
                .get_resource::<TickDuration>()
                .copied()
                .unwrap_or_default()
                .0
        });
        app.insert_resource(InterpolationConfig { segment_duration });
        app.register_required_components::<Interpolated, InterpolateStatus>();

        app.configure_sets(
            PreUpdate,
            InterpolationSet::Retarget.after(ReplicationSet::Apply),
        );
        app.configure_sets(
            Update,
            InterpolationSet::Interpolate.in_set(FrameSet::Advance),
        );
        app.add_systems(
            PreUpdate,
            Self::retarget.in_set(InterpolationSet::Retarget),
        );
        app.add_systems(
            Update,
            Self::interpolate.in_set(InterpolationSet::Interpolate),
        );
    }
}
