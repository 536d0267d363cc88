use bevy_ecs::component::Component;
use bevy_math::Vec3;
use roomsync_core::prelude::EntityKind;

/// Whether the entity is close enough to the controlled entity to be rendered
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LodVisibility {
    pub visible: bool,
}

impl Default for LodVisibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

pub(crate) fn in_view(kind: EntityKind, position: Vec3, viewer: Vec3, view_distance: f32) -> bool {
    position.distance(viewer) <= view_distance * kind.lod_range()
}
