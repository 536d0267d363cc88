/*! # roomsync transport

Session with a remote room: the typed wire protocol, the codec that turns messages into bytes,
the [`Link`](link::Link) buffers and the IO components that move those bytes.
*/

extern crate alloc;

pub mod codec;
pub mod crossbeam;
pub mod link;
pub mod ping;
pub mod plugin;
pub mod protocol;
pub mod room;
pub mod session;

pub mod prelude {
    pub use crate::codec::TransportError;
    pub use crate::crossbeam::{CrossbeamIo, CrossbeamPlugin};
    pub use crate::link::{Link, LinkState};
    pub use crate::ping::PingTracker;
    pub use crate::plugin::{TransportPlugin, TransportSet};
    pub use crate::protocol::{ClientMessage, EntitySnapshot, PlayerInput, RoomEvent, ServerMessage};
    pub use crate::room::{find_room_for_location, JoinOptions, RoomListing, RoomMetadata};
    pub use crate::session::{Connected, Disconnected, RoomSession, SessionState};
}
