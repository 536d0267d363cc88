//! Components shared by every replicated entity
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::component::Component;
use bevy_math::Vec3;
use bevy_reflect::Reflect;
use serde::{Deserialize, Serialize};

/// Simulation position of the entity.
///
/// For the controlled entity this is the predicted position; for every other entity it is the
/// last authoritative position received from the room.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct Position(pub Vec3);

/// Simulation rotation around the vertical axis, in radians
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct Rotation(pub f32);

/// Animation/behaviour state replicated by the room
#[derive(
    Component, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect,
)]
pub enum AnimState {
    #[default]
    Idle,
    Walking,
    Attacking,
    TakingDamage,
    Dead,
}

impl AnimState {
    /// Entities in this state cannot issue movement commands
    pub fn blocks_movement(self) -> bool {
        matches!(self, AnimState::Dead)
    }
}

/// What is displayed for the entity this frame.
///
/// The simulation components ([`Position`], [`Rotation`]) only change on network ticks or on
/// server updates; the visual state is advanced every render frame and is the only thing
/// copied to the render transform.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub position: Vec3,
    pub rotation: f32,
}

impl VisualState {
    pub fn new(position: Vec3, rotation: f32) -> Self {
        Self { position, rotation }
    }
}
