//! Client settings read from a RON file
use crate::client::ClientConfig;
use core::time::Duration;
use roomsync_core::prelude::MovementConfig;
use roomsync_transport::prelude::JoinOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Settings of the prediction loop
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PredictionSettings {
    /// Replay the unacknowledged commands on top of authoritative updates
    pub replay: bool,
    pub correction_epsilon: f32,
    pub snap_distance: f32,
    pub correction_ms: u64,
    pub buffer_capacity: usize,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            replay: true,
            correction_epsilon: 0.01,
            snap_distance: 10.0,
            correction_ms: 300,
            buffer_capacity: 64,
        }
    }
}

/// Settings file of the client.
///
/// Every field is optional; missing fields take their default value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    pub tick_ms: u64,
    pub max_frame_delta_ms: u64,
    pub speed: f32,
    pub ping_interval_ms: u64,
    pub view_distance: f32,
    pub prediction: PredictionSettings,
    /// Location whose room is joined
    pub location: String,
    pub character_id: u64,
    pub token: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            max_frame_delta_ms: 250,
            speed: MovementConfig::default().speed,
            ping_interval_ms: 10_000,
            view_distance: 30.0,
            prediction: PredictionSettings::default(),
            location: "lh_town".to_string(),
            character_id: 1,
            token: String::new(),
        }
    }
}

impl ClientSettings {
    /// Parse settings from a RON string
    pub fn from_ron(settings_str: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::de::from_str(settings_str)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings_str = std::fs::read_to_string(path)?;
        Self::from_ron(&settings_str)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_ms",
                reason: "must be positive",
            });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(SettingsError::Invalid {
                field: "speed",
                reason: "must be a non-negative number",
            });
        }
        if self.prediction.buffer_capacity == 0 {
            return Err(SettingsError::Invalid {
                field: "prediction.buffer_capacity",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    pub fn join_options(&self) -> JoinOptions {
        JoinOptions {
            token: self.token.clone(),
            character_id: self.character_id,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        #[allow(unused_mut)]
        let mut config = ClientConfig {
            tick_duration: Duration::from_millis(self.tick_ms),
            max_frame_delta: Duration::from_millis(self.max_frame_delta_ms),
            movement: MovementConfig { speed: self.speed },
            ping_interval: Duration::from_millis(self.ping_interval_ms),
            ..Default::default()
        };
        #[cfg(feature = "prediction")]
        {
            use roomsync_prediction::prelude::{CorrectionPolicy, PredictionConfig, ReconciliationMode};
            config.prediction = PredictionConfig {
                policy: CorrectionPolicy {
                    mode: if self.prediction.replay {
                        ReconciliationMode::Replay
                    } else {
                        ReconciliationMode::BlendOnly
                    },
                    correction_epsilon: self.prediction.correction_epsilon,
                    snap_distance: self.prediction.snap_distance,
                    correction_duration: Duration::from_millis(self.prediction.correction_ms),
                },
                buffer_capacity: self.prediction.buffer_capacity,
            };
        }
        #[cfg(feature = "render")]
        {
            config.render.view_distance = self.view_distance;
        }
        config
    }
}
