//! Mapping from room identifiers to local entities
use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use bevy_platform::collections::HashMap;
use roomsync_core::prelude::{EntityKind, SessionId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("entity {0} is already registered")]
    AlreadyRegistered(SessionId),
    #[error("entity {0} is not registered")]
    NotFound(SessionId),
    #[error("entity {new} cannot be controlled: {existing} already is")]
    SecondControlledEntity { existing: SessionId, new: SessionId },
    #[error("snapshot for entity {0} contains non-finite values")]
    InvalidSnapshot(SessionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub entity: Entity,
    pub kind: EntityKind,
}

/// Every replicated entity of the current room, by room identifier.
///
/// At most one entry is the controlled (local) entity.
#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    entries: HashMap<SessionId, RegistryEntry>,
    local: Option<SessionId>,
}

impl EntityRegistry {
    pub fn insert(
        &mut self,
        id: SessionId,
        entry: RegistryEntry,
        controlled: bool,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        if controlled {
            if let Some(existing) = &self.local {
                return Err(RegistryError::SecondControlledEntity {
                    existing: existing.clone(),
                    new: id,
                });
            }
            self.local = Some(id.clone());
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    pub fn remove(&mut self, id: &SessionId) -> Result<RegistryEntry, RegistryError> {
        let entry = self
            .entries
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        if self.local.as_ref() == Some(id) {
            self.local = None;
        }
        Ok(entry)
    }

    pub fn get(&self, id: &SessionId) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    /// The controlled entity, if it has been added
    pub fn local(&self) -> Option<(&SessionId, &RegistryEntry)> {
        let id = self.local.as_ref()?;
        self.entries.get(id).map(|entry| (id, entry))
    }

    pub fn is_local(&self, id: &SessionId) -> bool {
        self.local.as_ref() == Some(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SessionId, &RegistryEntry)> {
        self.entries.iter()
    }

    /// Forget every entry, returning the local entities that were registered
    pub fn clear(&mut self) -> impl Iterator<Item = Entity> + '_ {
        self.local = None;
        self.entries.drain().map(|(_, entry)| entry.entity)
    }
}
