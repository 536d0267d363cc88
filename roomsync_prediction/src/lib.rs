/*! # roomsync prediction

The controlled entity is moved locally as soon as an input is sampled, without waiting for the room.
Every command is kept in a [`PendingCommandBuffer`](buffer::PendingCommandBuffer) until the room
acknowledges it; when an authoritative state arrives, the unacknowledged commands are replayed on
top of it and any divergence is hidden behind a short [`VisualCorrection`](correction::VisualCorrection).
*/

extern crate alloc;

pub mod buffer;
pub mod correction;
pub mod frame_interpolation;
pub mod plugin;
pub mod reconcile;

pub mod prelude {
    pub use crate::buffer::{PendingCommandBuffer, PredictionError};
    pub use crate::correction::VisualCorrection;
    pub use crate::frame_interpolation::FrameInterpolate;
    pub use crate::plugin::{PredictionConfig, PredictionLoop, PredictionPlugin, PredictionSet, PredictionStats};
    pub use crate::reconcile::{CorrectionPolicy, Reconciliation, ReconciliationMode};
}
