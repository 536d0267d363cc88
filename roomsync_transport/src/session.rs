//! Lifecycle of the connection to a single room
use crate::link::Link;
use crate::ping::PingTracker;
use crate::protocol::{ClientMessage, RoomEvent, ServerMessage};
use crate::room::{JoinOptions, RoomListing};
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use bevy_ecs::component::Component;
use bevy_ecs::lifecycle::HookContext;
use bevy_ecs::world::DeferredWorld;
use core::time::Duration;
use roomsync_core::prelude::SessionId;
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The join request has been queued but not answered yet
    Joining,
    Connected,
    Rejected { reason: String },
    Disconnected { reason: String },
    /// The client left the room on its own
    Closed,
}

/// Marker inserted on the session entity once the room accepted the join
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Connected;

/// Inserted on the session entity when the join was rejected or the link to the room was lost.
///
/// The session never recovers; observe `On<Add, Disconnected>` to tell the user.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
#[component(on_add = Disconnected::on_add)]
pub struct Disconnected {
    pub reason: String,
}

impl Disconnected {
    fn on_add(mut world: DeferredWorld, context: HookContext) {
        world.commands().entity(context.entity).remove::<Connected>();
    }
}

/// A session with one room.
///
/// Outgoing messages are only accepted while the session is `Connected` (except the join request).
/// Room events are only accepted while `Connected` and are handed out in arrival order.
#[derive(Component, Debug)]
#[require(Link, PingTracker)]
pub struct RoomSession {
    room_id: String,
    session_id: Option<SessionId>,
    state: SessionState,
    outbox: Vec<ClientMessage>,
    inbox: VecDeque<RoomEvent>,
}

impl RoomSession {
    /// Start joining `room`; the join request goes out with the next send
    pub fn join(room: &RoomListing, options: JoinOptions) -> Self {
        debug!(room_id = %room.room_id, location = %room.metadata.location, ?options, "joining room");
        Self {
            room_id: room.room_id.clone(),
            session_id: None,
            state: SessionState::Joining,
            outbox: alloc::vec![ClientMessage::Join(options)],
            inbox: VecDeque::new(),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Identifier assigned by the room, known once connected
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Returns true once the session can never carry messages again
    pub fn is_terminated(&self) -> bool {
        matches!(
            self.state,
            SessionState::Rejected { .. } | SessionState::Disconnected { .. } | SessionState::Closed
        )
    }

    /// Queue a message for the room. Returns false if it was dropped because the session is not connected.
    pub fn send(&mut self, message: ClientMessage) -> bool {
        if !self.is_connected() {
            trace!(state = ?self.state, ?message, "dropping message on a session that is not connected");
            return false;
        }
        self.outbox.push(message);
        true
    }

    /// Pop the room events received so far, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = RoomEvent> + '_ {
        self.inbox.drain(..)
    }

    pub fn pending_events(&self) -> usize {
        self.inbox.len()
    }

    /// Leave the room. Queues a leave message if the room can still hear it.
    pub fn close(&mut self) {
        if self.is_connected() {
            self.outbox.push(ClientMessage::Leave);
        }
        if !self.is_terminated() {
            info!(room_id = %self.room_id, "closing room session");
            self.state = SessionState::Closed;
        }
        self.inbox.clear();
    }

    pub(crate) fn take_outbox(&mut self) -> Vec<ClientMessage> {
        core::mem::take(&mut self.outbox)
    }

    pub(crate) fn on_link_lost(&mut self, reason: &str) {
        if self.is_terminated() {
            return;
        }
        error!(room_id = %self.room_id, reason, "room session disconnected");
        self.state = SessionState::Disconnected {
            reason: reason.into(),
        };
        self.outbox.clear();
        self.inbox.clear();
    }

    pub(crate) fn handle_message(
        &mut self,
        message: ServerMessage,
        ping: &mut PingTracker,
        now: Duration,
    ) {
        match message {
            ServerMessage::Joined { session_id } => {
                if self.state != SessionState::Joining {
                    warn!(state = ?self.state, "unexpected join confirmation");
                    return;
                }
                info!(room_id = %self.room_id, %session_id, "joined room");
                self.session_id = Some(session_id);
                self.state = SessionState::Connected;
            }
            ServerMessage::JoinRejected { reason } => {
                if self.state != SessionState::Joining {
                    warn!(state = ?self.state, "unexpected join rejection");
                    return;
                }
                error!(room_id = %self.room_id, %reason, "join rejected");
                self.state = SessionState::Rejected { reason };
            }
            ServerMessage::Pong { sent_at_ms } => {
                ping.record_pong(sent_at_ms, now);
                trace!(rtt = ?ping.rtt(), "pong");
            }
            ServerMessage::State(event) => {
                if !self.is_connected() {
                    trace!(state = ?self.state, id = %event.id(), "ignoring room event outside of a connected session");
                    return;
                }
                self.inbox.push_back(event);
            }
        }
    }
}
