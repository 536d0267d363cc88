use alloc::format;
use crate::codec;
use crate::link::{Link, LinkState};
use crate::ping::PingTracker;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{Connected, Disconnected, RoomSession, SessionState};
use bevy_app::{App, Plugin, PostUpdate, PreUpdate};
use bevy_ecs::prelude::*;
use bevy_time::{Real, Time};
use tracing::{error, warn};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum TransportSet {
    // PRE UPDATE
    /// Move payloads from the IO into the [`Link`]
    Receive,
    /// Decode payloads from the [`Link`] into the [`RoomSession`]
    Decode,
    // POST UPDATE
    /// Queue periodic pings
    Ping,
    /// Encode the [`RoomSession`] outbox into the [`Link`]
    Encode,
    /// Move payloads from the [`Link`] into the IO
    Send,
}

pub struct TransportPlugin;

impl TransportPlugin {
    pub(crate) fn decode(
        time: Res<Time<Real>>,
        mut query: Query<(Entity, &mut RoomSession, &mut Link, &mut PingTracker)>,
    ) {
        let now = time.elapsed();
        query
            .iter_mut()
            .for_each(|(entity, mut session, mut link, mut ping)| {
                for payload in link.recv.drain(..) {
                    match codec::decode::<ServerMessage>(&payload) {
                        Ok(message) => session.handle_message(message, &mut ping, now),
                        Err(e) => warn!(?entity, error = %e, "dropping undecodable payload"),
                    }
                }
                if let LinkState::Unlinked { reason } = &link.state {
                    session.on_link_lost(reason);
                }
            })
    }

    /// Reflect the session state as [`Connected`]/[`Disconnected`] markers on the session entity
    pub(crate) fn update_markers(
        mut commands: Commands,
        query: Query<
            (Entity, &RoomSession, Has<Connected>, Has<Disconnected>),
            Changed<RoomSession>,
        >,
    ) {
        for (entity, session, connected, disconnected) in query.iter() {
            match session.state() {
                SessionState::Connected if !connected => {
                    commands.entity(entity).insert(Connected);
                }
                SessionState::Rejected { reason } if !disconnected => {
                    commands.entity(entity).insert(Disconnected {
                        reason: format!("join rejected: {reason}"),
                    });
                }
                SessionState::Disconnected { reason } if !disconnected => {
                    commands.entity(entity).insert(Disconnected {
                        reason: reason.clone(),
                    });
                }
                _ => {}
            }
        }
    }

    pub(crate) fn ping(
        time: Res<Time<Real>>,
        mut query: Query<(&mut RoomSession, &mut PingTracker)>,
    ) {
        let now = time.elapsed();
        query.iter_mut().for_each(|(mut session, mut ping)| {
            if !session.is_connected() {
                return;
            }
            if let Some(sent_at_ms) = ping.poll(now) {
                session.send(ClientMessage::Ping { sent_at_ms });
            }
        })
    }

    pub(crate) fn encode(mut query: Query<(Entity, &mut RoomSession, &mut Link)>) {
        query.iter_mut().for_each(|(entity, mut session, mut link)| {
            for message in session.take_outbox() {
                match codec::encode(&message) {
                    Ok(payload) => link.send(payload),
                    Err(e) => error!(?entity, error = %e, "could not encode message"),
                }
            }
        })
    }
}

impl Plugin for TransportPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            PreUpdate,
            (TransportSet::Receive, TransportSet::Decode).chain(),
        );
        app.configure_sets(
            PostUpdate,
            (TransportSet::Ping, TransportSet::Encode, TransportSet::Send).chain(),
        );
        app.add_systems(
            PreUpdate,
            (Self::decode, Self::update_markers)
                .chain()
                .in_set(TransportSet::Decode),
        );
        app.add_systems(PostUpdate, Self::ping.in_set(TransportSet::Ping));
        app.add_systems(PostUpdate, Self::encode.in_set(TransportSet::Encode));
    }
}
