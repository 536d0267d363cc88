use crate::animation::{AnimationClip, Animator};
use crate::camera::FollowCamera;
use crate::debug::DebugStats;
use crate::lod::{LodVisibility, in_view};
use bevy_app::{App, Plugin, Update};
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use bevy_input::mouse::MouseWheel;
use bevy_math::Quat;
use bevy_transform::components::Transform;
use roomsync_core::prelude::{AnimState, FrameDelta, FrameSet, VisualState};
use roomsync_replication::prelude::{Controlled, Replicated};
use roomsync_transport::prelude::{PingTracker, RoomSession};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Resource, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Displacement per frame above which an entity is considered moving
    pub moving_epsilon: f32,
    /// Distance from the controlled entity within which entities are rendered
    pub view_distance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            moving_epsilon: 0.05,
            view_distance: 30.0,
        }
    }
}

#[derive(Default)]
pub struct RenderDriverPlugin {
    pub config: RenderConfig,
}

impl RenderDriverPlugin {
    pub(crate) fn animate(
        config: Res<RenderConfig>,
        frame: Res<FrameDelta>,
        mut query: Query<(&Replicated, &AnimState, &VisualState, &mut Animator)>,
    ) {
        for (replicated, state, visual, mut animator) in query.iter_mut() {
            if !replicated.kind.is_animated() {
                continue;
            }
            let moving = animator.moved(visual.position, config.moving_epsilon);
            let clip = AnimationClip::select(moving, *state);
            if clip != animator.clip {
                trace!(id = %replicated.id, from = ?animator.clip, to = ?clip, "switching animation clip");
            }
            animator.play(clip, frame.clamped);
        }
    }

    pub(crate) fn update_lod(
        config: Res<RenderConfig>,
        viewer: Query<&VisualState, With<Controlled>>,
        mut query: Query<(&Replicated, &VisualState, &mut LodVisibility, Has<Controlled>)>,
    ) {
        let Ok(viewer) = viewer.single() else {
            return;
        };
        let viewer = viewer.position;
        for (replicated, visual, mut lod, controlled) in query.iter_mut() {
            let visible =
                controlled || in_view(replicated.kind, visual.position, viewer, config.view_distance);
            lod.set_if_neq(LodVisibility { visible });
        }
    }

    /// Wheel down zooms out, wheel up zooms in
    pub(crate) fn zoom_camera(
        mut wheel: MessageReader<MouseWheel>,
        mut cameras: Query<&mut FollowCamera>,
    ) {
        for scroll in wheel.read() {
            for mut camera in cameras.iter_mut() {
                camera.zoom(-scroll.y);
            }
        }
    }

    pub(crate) fn follow_camera(
        target: Query<&VisualState, With<Controlled>>,
        mut cameras: Query<(&mut FollowCamera, &mut Transform)>,
    ) {
        let Ok(target) = target.single() else {
            return;
        };
        for (mut camera, mut transform) in cameras.iter_mut() {
            camera.follow(target.position);
            *transform = camera.transform();
        }
    }

    pub(crate) fn update_debug_stats(
        frame: Res<FrameDelta>,
        mut stats: ResMut<DebugStats>,
        entities: Query<&LodVisibility, With<Replicated>>,
        controlled: Query<&VisualState, With<Controlled>>,
        sessions: Query<&PingTracker, With<RoomSession>>,
    ) {
        stats.record_frame(frame.raw);
        stats.total_entities = entities.iter().count();
        stats.visible_entities = entities.iter().filter(|lod| lod.visible).count();
        stats.controlled_xz = controlled
            .single()
            .ok()
            .map(|visual| (visual.position.x, visual.position.z));
        stats.rtt = sessions.iter().find_map(PingTracker::rtt);
    }

    /// Copy the visual state into the render transform
    pub(crate) fn present(
        mut query: Query<(&VisualState, &mut Transform), (With<Replicated>, Changed<VisualState>)>,
    ) {
        for (visual, mut transform) in query.iter_mut() {
            transform.translation = visual.position;
            transform.rotation = Quat::from_rotation_y(visual.rotation);
        }
    }
}

impl Plugin for RenderDriverPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config);
        app.init_resource::<DebugStats>();
        app.register_required_components::<Replicated, Animator>();
        app.register_required_components::<Replicated, LodVisibility>();
        app.register_required_components::<Replicated, Transform>();

        app.add_systems(
            Update,
            (
                (
                    Self::animate,
                    Self::update_lod,
                    Self::zoom_camera.run_if(resource_exists::<Messages<MouseWheel>>),
                    Self::follow_camera,
                    Self::update_debug_stats,
                )
                    .chain()
                    .in_set(FrameSet::Animate),
                Self::present.in_set(FrameSet::Present),
            ),
        );
    }
}
