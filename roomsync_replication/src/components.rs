use bevy_derive::{Deref, DerefMut};
use bevy_ecs::component::Component;
use roomsync_core::prelude::{AnimState, EntityKind, Position, Rotation, SessionId, VisualState};
use roomsync_transport::prelude::EntitySnapshot;

/// Marks an entity that mirrors an entry of the room state
#[derive(Component, Debug, Clone, PartialEq, Eq)]
#[require(Position, Rotation, AnimState, VisualState, AuthoritativeState)]
pub struct Replicated {
    pub id: SessionId,
    pub kind: EntityKind,
}

/// The single entity driven by the local inputs.
///
/// Its [`Position`] is predicted locally and reconciled against the room.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Controlled;

/// Entity whose [`VisualState`] follows the room updates smoothly
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Interpolated;

/// Last state received from the room for this entity.
///
/// Overwritten on every update, even an identical one.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct AuthoritativeState(pub EntitySnapshot);
