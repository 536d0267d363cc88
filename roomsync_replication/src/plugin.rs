use crate::components::{AuthoritativeState, Controlled, Interpolated, Replicated};
use crate::registry::{EntityRegistry, RegistryEntry, RegistryError};
use alloc::format;
use alloc::vec::Vec;
use bevy_app::{App, Last, Plugin, PreUpdate};
use bevy_ecs::name::Name;
use bevy_ecs::prelude::*;
use roomsync_core::prelude::{Position, Rotation, SessionId, VisualState};
use roomsync_transport::prelude::{RoomEvent, RoomSession, SessionState, TransportSet};
use tracing::{debug, info, trace, warn};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum ReplicationSet {
    // PRE UPDATE
    /// Apply the room events received this frame to the local entities
    Apply,
    // LAST
    /// Despawn the entities of terminated sessions
    Teardown,
}

pub struct ReplicationPlugin;

impl ReplicationPlugin {
    /// Apply the inbox of every session, oldest event first.
    ///
    /// A bad event is logged and skipped; it never prevents the following ones from being applied.
    pub(crate) fn apply_room_events(
        mut commands: Commands,
        mut registry: ResMut<EntityRegistry>,
        mut sessions: Query<&mut RoomSession>,
    ) {
        for mut session in sessions.iter_mut() {
            let local_id = session.session_id().cloned();
            let events: Vec<RoomEvent> = session.drain_events().collect();
            for event in events {
                if let Err(e) = apply_event(&mut commands, &mut registry, local_id.as_ref(), event)
                {
                    warn!(error = %e, "ignoring room event");
                }
            }
        }
    }

    pub(crate) fn teardown(
        mut commands: Commands,
        mut registry: ResMut<EntityRegistry>,
        sessions: Query<(Entity, &RoomSession)>,
    ) {
        for (entity, session) in sessions.iter() {
            if !session.is_terminated() {
                continue;
            }
            if !registry.is_empty() {
                info!(room_id = %session.room_id(), count = registry.len(), "despawning replicated entities");
                for replicated in registry.clear() {
                    commands.entity(replicated).despawn();
                }
            }
            if *session.state() == SessionState::Closed {
                debug!(?entity, "despawning closed session");
                commands.entity(entity).despawn();
            }
        }
    }
}

fn apply_event(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    local_id: Option<&SessionId>,
    event: RoomEvent,
) -> Result<(), RegistryError> {
    match event {
        RoomEvent::Add { kind, id, snapshot } => {
            if !snapshot.is_finite() {
                return Err(RegistryError::InvalidSnapshot(id));
            }
            if registry.get(&id).is_some() {
                return Err(RegistryError::AlreadyRegistered(id));
            }
            let controlled = kind.can_be_controlled() && local_id == Some(&id);
            let position = snapshot.position();
            let mut entity_commands = commands.spawn((
                Name::new(format!("{} {id}", kind.collection())),
                Replicated {
                    id: id.clone(),
                    kind,
                },
                Position(position),
                Rotation(snapshot.rot),
                snapshot.anim_state,
                VisualState::new(position, snapshot.rot),
                AuthoritativeState(snapshot),
            ));
            if controlled {
                entity_commands.insert(Controlled);
            } else {
                entity_commands.insert(Interpolated);
            }
            let entity = entity_commands.id();
            if let Err(e) = registry.insert(id.clone(), RegistryEntry { entity, kind }, controlled) {
                commands.entity(entity).despawn();
                return Err(e);
            }
            debug!(?entity, %id, ?kind, controlled, "added replicated entity");
        }
        RoomEvent::Update { id, snapshot, .. } => {
            let entry = registry
                .get(&id)
                .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
            if !snapshot.is_finite() {
                return Err(RegistryError::InvalidSnapshot(id));
            }
            let mut entity_commands = commands.entity(entry.entity);
            entity_commands.insert(AuthoritativeState(snapshot));
            // the controlled entity is reconciled instead
            if !registry.is_local(&id) {
                entity_commands.insert((
                    Position(snapshot.position()),
                    Rotation(snapshot.rot),
                    snapshot.anim_state,
                ));
            }
        }
        RoomEvent::Remove { id, .. } => match registry.remove(&id) {
            Ok(entry) => {
                commands.entity(entry.entity).despawn();
                debug!(entity = ?entry.entity, %id, "removed replicated entity");
            }
            Err(RegistryError::NotFound(_)) => {
                trace!(%id, "remove of an unknown entity");
            }
            Err(e) => return Err(e),
        },
    }
    Ok(())
}

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityRegistry>();
        app.configure_sets(PreUpdate, ReplicationSet::Apply.after(TransportSet::Decode));
        app.add_systems(
            PreUpdate,
            Self::apply_room_events
                .in_set(ReplicationSet::Apply)
                .run_if(any_with_component::<RoomSession>),
        );
        app.add_systems(Last, Self::teardown.in_set(ReplicationSet::Teardown));
    }
}
