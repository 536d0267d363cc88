/*! # roomsync render

Everything that runs once per render frame: measuring the frame delta, picking animation clips,
level of detail, the follow camera, debug statistics and copying the visual state of every entity
to its [`Transform`](bevy_transform::components::Transform).
*/

pub mod animation;
pub mod camera;
pub mod debug;
pub mod lod;
pub mod plugin;

pub mod prelude {
    pub use crate::animation::{AnimationClip, Animator};
    pub use crate::camera::FollowCamera;
    pub use crate::debug::DebugStats;
    pub use crate::lod::LodVisibility;
    pub use crate::plugin::{RenderConfig, RenderDriverPlugin};
}
