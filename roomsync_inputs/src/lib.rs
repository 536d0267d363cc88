/*! # roomsync inputs

Reads the state of the input device and turns it, once per network tick, into
sequence-numbered [`InputCommand`](sampler::InputCommand)s.
*/

pub mod device;
pub mod plugin;
pub mod sampler;

pub mod prelude {
    pub use crate::device::InputDevice;
    pub use crate::plugin::{InputPlugin, InputSet};
    pub use crate::sampler::{InputCommand, InputSampler};
}
