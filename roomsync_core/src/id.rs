use alloc::string::String;
use bevy_reflect::Reflect;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the room to a session or to a replicated entity.
///
/// Identifiers are opaque strings and stay stable for the lifetime of the room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a replicated entity.
///
/// Each kind corresponds to one replicated collection of the room state.
/// All kinds share the same capabilities (update, level-of-detail, removal); the
/// per-kind differences are answered by the methods below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum EntityKind {
    /// Player characters, including the one controlled by this client
    Player,
    /// Server-driven characters
    Npc,
    /// Items lying in the world
    Item,
}

impl EntityKind {
    /// Name of the replicated collection that holds entities of this kind
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Player => "players",
            EntityKind::Npc => "entities",
            EntityKind::Item => "items",
        }
    }

    /// Fraction of the view distance within which the entity stays visible
    pub fn lod_range(self) -> f32 {
        match self {
            EntityKind::Player | EntityKind::Npc => 1.0,
            EntityKind::Item => 0.5,
        }
    }

    /// Whether the entity plays animations
    pub fn is_animated(self) -> bool {
        !matches!(self, EntityKind::Item)
    }

    /// Only players can be controlled by a client
    pub fn can_be_controlled(self) -> bool {
        matches!(self, EntityKind::Player)
    }
}
