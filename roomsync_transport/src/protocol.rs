//! Messages exchanged with the room
use crate::room::JoinOptions;
use alloc::string::String;
use bevy_math::Vec3;
use roomsync_core::prelude::{AnimState, EntityKind, Sequence, SessionId};
use serde::{Deserialize, Serialize};

/// Movement command sent every network tick while movement is permitted
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    pub sequence: Sequence,
    pub horizontal: f32,
    pub vertical: f32,
}

/// Authoritative state of one replicated entity
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation around the vertical axis, in radians
    pub rot: f32,
    pub anim_state: AnimState,
    /// Last input sequence applied by the server to this entity
    pub sequence: Sequence,
}

impl EntitySnapshot {
    pub fn at(position: Vec3, rot: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            rot,
            ..Default::default()
        }
    }

    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_anim_state(mut self, anim_state: AnimState) -> Self {
        self.anim_state = anim_state;
        self
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Returns false if any numeric field is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.rot.is_finite()
    }
}

/// Messages sent by the client to the room
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Join(JoinOptions),
    PlayerInput(PlayerInput),
    Ping { sent_at_ms: u64 },
    Leave,
}

/// Changes to the replicated collections of the room state
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Add {
        kind: EntityKind,
        id: SessionId,
        snapshot: EntitySnapshot,
    },
    Update {
        kind: EntityKind,
        id: SessionId,
        snapshot: EntitySnapshot,
    },
    Remove {
        kind: EntityKind,
        id: SessionId,
    },
}

impl RoomEvent {
    pub fn id(&self) -> &SessionId {
        match self {
            RoomEvent::Add { id, .. } | RoomEvent::Update { id, .. } | RoomEvent::Remove { id, .. } => id,
        }
    }
}

/// Messages sent by the room to the client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// The join request was accepted; `session_id` identifies this client in the room
    Joined { session_id: SessionId },
    JoinRejected { reason: String },
    Pong { sent_at_ms: u64 },
    State(RoomEvent),
}
