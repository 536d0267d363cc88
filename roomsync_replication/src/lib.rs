/*! # roomsync replication

Mirrors the replicated collections of the room (players, entities, items) as local entities.
*/

extern crate alloc;

pub mod components;
pub mod plugin;
pub mod registry;

pub mod prelude {
    pub use crate::components::{AuthoritativeState, Controlled, Interpolated, Replicated};
    pub use crate::plugin::{ReplicationPlugin, ReplicationSet};
    pub use crate::registry::{EntityRegistry, RegistryEntry, RegistryError};
}
