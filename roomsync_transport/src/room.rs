//! Room discovery and join parameters
use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomMetadata {
    /// Zone of the world served by the room
    pub location: String,
}

/// One entry of the list of available rooms
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoomListing {
    pub room_id: String,
    pub clients: u32,
    pub metadata: RoomMetadata,
}

impl RoomListing {
    pub fn new(room_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            clients: 0,
            metadata: RoomMetadata {
                location: location.into(),
            },
        }
    }
}

/// Returns the first listed room serving `location`
pub fn find_room_for_location<'a>(
    listings: &'a [RoomListing],
    location: &str,
) -> Option<&'a RoomListing> {
    listings
        .iter()
        .find(|listing| listing.metadata.location == location)
}

/// Parameters sent with the join request
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct JoinOptions {
    /// Opaque credential, forwarded as-is
    pub token: String,
    pub character_id: u64,
}

impl fmt::Debug for JoinOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinOptions")
            .field("token", &"<redacted>")
            .field("character_id", &self.character_id)
            .finish()
    }
}
