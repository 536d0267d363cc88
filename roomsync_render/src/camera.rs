//! Camera rig following the controlled entity
use bevy_ecs::component::Component;
use bevy_math::{Quat, Vec3};
use bevy_transform::components::Transform;
use core::f32::consts::PI;

#[derive(Component, Debug, Clone, PartialEq)]
#[require(Transform)]
pub struct FollowCamera {
    /// Point looked at; trails the controlled entity
    pub root: Vec3,
    /// Fraction of the remaining distance to the target covered each frame
    pub follow_factor: f32,
    /// Signed distance from the root along the view axis
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            root: Vec3::new(0.0, 1.5, 0.0),
            follow_factor: 0.4,
            zoom: -45.0,
            min_zoom: -50.0,
            max_zoom: -20.0,
        }
    }
}

impl FollowCamera {
    /// Zoom out for a positive scroll, in for a negative one, one unit at a time
    pub fn zoom(&mut self, scroll: f32) {
        if scroll > 0.0 && self.zoom > self.min_zoom {
            self.zoom -= 1.0;
        } else if scroll < 0.0 && self.zoom < self.max_zoom {
            self.zoom += 1.0;
        }
    }

    pub fn follow(&mut self, target: Vec3) {
        self.root = self.root.lerp(target, self.follow_factor);
    }

    /// Camera placed behind and above the root, looking at it
    pub fn transform(&self) -> Transform {
        let orientation = Quat::from_rotation_y(0.75 * PI) * Quat::from_rotation_x(0.6);
        let eye = self.root + orientation * Vec3::new(0.0, 0.0, self.zoom);
        Transform::from_translation(eye).looking_at(self.root, Vec3::Y)
    }
}
