/*! # roomsync

Client side of a multiplayer room, built on Bevy.

The client joins a room, mirrors the entities the room replicates, predicts the movement of the
entity it controls and smooths everything else, all inside a single Bevy [`App`](bevy_app::App).

```rust,ignore
use bevy::prelude::*;
use roomsync::prelude::*;

let mut app = App::new();
app.add_plugins(MinimalPlugins);
app.add_plugins(ClientPlugins::default());

let (client_io, room_io) = CrossbeamIo::new_pair();
let session = join_room(&ClientConfig::default(), &listings, "lh_town", options)?;
app.world_mut().spawn((session, client_io));
```
*/

pub mod client;
pub mod connect;
pub mod settings;

pub mod shared {
    pub use roomsync_core::*;
}

pub mod transport {
    pub use roomsync_transport::*;
}

pub mod inputs {
    pub use roomsync_inputs::*;
}

pub mod replication {
    pub use roomsync_replication::*;
}

#[cfg(feature = "prediction")]
pub mod prediction {
    pub use roomsync_prediction::*;
}

#[cfg(feature = "interpolation")]
pub mod interpolation {
    pub use roomsync_interpolation::*;
}

#[cfg(feature = "render")]
pub mod render {
    pub use roomsync_render::*;
}

pub mod prelude {
    pub use crate::client::{ClientConfig, ClientPlugins};
    pub use crate::connect::{ConnectError, join_room};
    pub use crate::settings::{ClientSettings, SettingsError};

    pub use roomsync_core::prelude::*;
    pub use roomsync_inputs::prelude::*;
    pub use roomsync_replication::prelude::*;
    pub use roomsync_transport::prelude::*;

    #[cfg(feature = "interpolation")]
    pub use roomsync_interpolation::prelude::*;
    #[cfg(feature = "prediction")]
    pub use roomsync_prediction::prelude::*;
    #[cfg(feature = "render")]
    pub use roomsync_render::prelude::*;
}
