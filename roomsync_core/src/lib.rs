//! Contains a set of shared types

extern crate alloc;

pub mod components;
pub mod easings;
pub mod id;
pub mod movement;
pub mod plugin;
pub mod sequence;
pub mod time;

pub mod prelude {
    pub use crate::components::{AnimState, Position, Rotation, VisualState};
    pub use crate::id::{EntityKind, SessionId};
    pub use crate::movement::MovementConfig;
    pub use crate::plugin::{CorePlugin, FrameSet};
    pub use crate::sequence::{Sequence, SequenceCounter};
    pub use crate::time::{FrameDelta, TickDuration};
}
