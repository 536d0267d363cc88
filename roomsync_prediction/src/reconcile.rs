//! Comparison of the predicted state with an authoritative one
use crate::buffer::PendingCommandBuffer;
use bevy_math::Vec3;
use core::time::Duration;
use roomsync_core::movement::{MovementConfig, integrate};
use roomsync_transport::prelude::EntitySnapshot;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationMode {
    /// Re-apply the unacknowledged commands on top of the authoritative state
    #[default]
    Replay,
    /// Blend toward the authoritative state as received
    BlendOnly,
}

/// How divergences between the prediction and the room are resolved
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CorrectionPolicy {
    pub mode: ReconciliationMode,
    /// Errors at most this large are ignored
    pub correction_epsilon: f32,
    /// Errors larger than this are not blended: the entity is teleported
    pub snap_distance: f32,
    /// Time over which a blended error is absorbed
    pub correction_duration: Duration,
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        Self {
            mode: ReconciliationMode::Replay,
            correction_epsilon: 0.01,
            snap_distance: 10.0,
            correction_duration: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reconciliation {
    /// The prediction agrees with the room
    Unchanged { rotation: f32 },
    /// The simulation moves to `corrected`; the displayed position absorbs `error` over time
    Blend {
        corrected: Vec3,
        rotation: f32,
        error: Vec3,
    },
    /// The simulation and the displayed position jump to `corrected`
    Snap { corrected: Vec3, rotation: f32 },
}

/// Compute the corrected state of the controlled entity.
///
/// `pending` must only contain commands that `snapshot` has not applied yet.
pub fn reconcile(
    predicted: Vec3,
    snapshot: &EntitySnapshot,
    pending: &PendingCommandBuffer,
    movement: &MovementConfig,
    policy: &CorrectionPolicy,
) -> Reconciliation {
    let mut corrected = snapshot.position();
    let mut rotation = snapshot.rot;
    if policy.mode == ReconciliationMode::Replay {
        for command in pending.iter() {
            integrate(
                &mut corrected,
                &mut rotation,
                command.horizontal,
                command.vertical,
                movement,
            );
        }
    }
    let error = predicted - corrected;
    let distance = error.length();
    if distance <= policy.correction_epsilon {
        Reconciliation::Unchanged { rotation }
    } else if distance > policy.snap_distance || policy.correction_duration.is_zero() {
        Reconciliation::Snap {
            corrected,
            rotation,
        }
    } else {
        Reconciliation::Blend {
            corrected,
            rotation,
            error,
        }
    }
}
