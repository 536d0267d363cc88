/*! # roomsync interpolation

Entities that are not controlled locally only change when the room says so, about once per network
tick. To avoid stepping, their displayed state moves along a short segment from where it is
displayed to the latest authoritative value. The segment never overshoots: an entity whose
updates stop simply comes to rest on the last received value.
*/

pub mod interpolate;
pub mod plugin;

pub mod prelude {
    pub use crate::interpolate::InterpolateStatus;
    pub use crate::plugin::{InterpolationConfig, InterpolationPlugin, InterpolationSet};
}
