use bevy_app::{PluginGroup, PluginGroupBuilder};
use bevy_ecs::resource::Resource;
use core::time::Duration;
use roomsync_core::prelude::{CorePlugin, MovementConfig};
use roomsync_inputs::prelude::InputPlugin;
use roomsync_replication::prelude::ReplicationPlugin;
use roomsync_transport::prelude::{CrossbeamPlugin, TransportPlugin};

/// Configuration of every client plugin
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Interval between two sampled inputs
    pub tick_duration: Duration,
    /// Frame deltas above this are clamped
    pub max_frame_delta: Duration,
    pub movement: MovementConfig,
    pub ping_interval: Duration,
    #[cfg(feature = "prediction")]
    pub prediction: roomsync_prediction::prelude::PredictionConfig,
    /// Duration of an interpolation segment of remote entities; defaults to `tick_duration`
    #[cfg(feature = "interpolation")]
    pub interpolation_segment: Option<Duration>,
    #[cfg(feature = "render")]
    pub render: roomsync_render::prelude::RenderConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tick_duration: Duration::from_millis(100),
            max_frame_delta: Duration::from_millis(250),
            movement: MovementConfig::default(),
            ping_interval: Duration::from_secs(10),
            #[cfg(feature = "prediction")]
            prediction: Default::default(),
            #[cfg(feature = "interpolation")]
            interpolation_segment: None,
            #[cfg(feature = "render")]
            render: Default::default(),
        }
    }
}

/// A plugin group containing all the client plugins.
///
/// By default, the following plugins will be added:
/// - [`CorePlugin`]: network tick, frame delta and movement configuration
/// - [`TransportPlugin`] and [`CrossbeamPlugin`]: room sessions and the in-process IO
/// - [`InputPlugin`]: the [`InputDevice`](roomsync_inputs::prelude::InputDevice) resource
/// - [`ReplicationPlugin`]: mirrors the room state as local entities
/// - `PredictionPlugin`: prediction and reconciliation of the controlled entity
/// - `InterpolationPlugin`: smoothing of the other entities
/// - `RenderDriverPlugin`: animation, level of detail, camera and transforms
#[derive(Default)]
pub struct ClientPlugins {
    pub config: ClientConfig,
}

impl PluginGroup for ClientPlugins {
    #[allow(clippy::let_and_return)]
    fn build(self) -> PluginGroupBuilder {
        let config = self.config;
        let builder = PluginGroupBuilder::start::<Self>();
        let builder = builder
            .add(CorePlugin {
                tick_duration: config.tick_duration,
                max_frame_delta: config.max_frame_delta,
                movement: config.movement,
            })
            .add(TransportPlugin)
            .add(CrossbeamPlugin)
            .add(InputPlugin)
            .add(ReplicationPlugin);

        #[cfg(feature = "prediction")]
        let builder = builder.add(roomsync_prediction::prelude::PredictionPlugin {
            config: config.prediction,
        });

        #[cfg(feature = "interpolation")]
        let builder = builder.add(roomsync_interpolation::prelude::InterpolationPlugin {
            segment_duration: Some(config.interpolation_segment.unwrap_or(config.tick_duration)),
        });

        #[cfg(feature = "render")]
        let builder = builder.add(roomsync_render::prelude::RenderDriverPlugin {
            config: config.render,
        });

        builder.add(ConfigPlugin { config })
    }
}

/// Makes the [`ClientConfig`] available to systems
struct ConfigPlugin {
    config: ClientConfig,
}

impl bevy_app::Plugin for ConfigPlugin {
    fn build(&self, app: &mut bevy_app::App) {
        app.insert_resource(self.config.clone());
    }
}
