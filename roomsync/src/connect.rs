//! Joining a room
use crate::client::ClientConfig;
use roomsync_transport::prelude::{
    JoinOptions, PingTracker, RoomListing, RoomSession, find_room_for_location,
};
use tracing::{info, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("no room serves location {0}")]
    NoRoomForLocation(String),
}

/// Build the components of a session joining the room that serves `location`.
///
/// Spawn them together with an IO component; the join request goes out on the next frame.
pub fn join_room(
    config: &ClientConfig,
    listings: &[RoomListing],
    location: &str,
    options: JoinOptions,
) -> Result<(RoomSession, PingTracker), ConnectError> {
    let Some(room) = find_room_for_location(listings, location) else {
        warn!(location, rooms = listings.len(), "no room found for location");
        return Err(ConnectError::NoRoomForLocation(location.to_string()));
    };
    info!(room_id = %room.room_id, location, "found room");
    Ok((
        RoomSession::join(room, options),
        PingTracker::new(config.ping_interval),
    ))
}
