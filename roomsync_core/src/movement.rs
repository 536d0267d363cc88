//! Movement integration shared by the client prediction and the room server.
//!
//! The client predicts its own movement with [`integrate`]; the server applies the very same
//! function to the commands it receives. As long as both sides see the same commands, the
//! predicted and authoritative positions converge.
use bevy_ecs::resource::Resource;
use bevy_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Distance travelled by one command at full axis magnitude
    pub speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { speed: 0.6 }
    }
}

/// Apply one input command to a position and rotation.
///
/// Axes are clamped to `[-1, 1]` and the direction is normalized when its length exceeds 1,
/// so that diagonal movement is not faster than straight movement.
/// The rotation is only updated when there is movement.
pub fn integrate(
    position: &mut Vec3,
    rotation: &mut f32,
    horizontal: f32,
    vertical: f32,
    config: &MovementConfig,
) {
    let mut direction = Vec2::new(horizontal.clamp(-1.0, 1.0), vertical.clamp(-1.0, 1.0));
    if direction.length_squared() <= f32::EPSILON {
        return;
    }
    if direction.length_squared() > 1.0 {
        direction = direction.normalize();
    }
    *rotation = direction.x.atan2(direction.y);
    position.x -= direction.x * config.speed;
    position.z -= direction.y * config.speed;
}
