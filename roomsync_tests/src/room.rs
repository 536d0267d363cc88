//! Server side of a test room
use bevy::math::Vec3;
use roomsync::prelude::*;
use roomsync::transport::codec;
use tracing::{info, trace, warn};

/// The room end of a crossbeam pair, answering the handshake and pings and recording everything
/// else for the test to inspect.
pub struct ScriptedRoom {
    io: Option<CrossbeamIo>,
    /// Identifier given to the client when it joins
    pub session_id: SessionId,
    /// Initial state of the client's player
    pub spawn: EntitySnapshot,
    /// If set, join requests are rejected with this reason
    pub reject_with: Option<String>,
    pub answer_pings: bool,
    pub received: Vec<ClientMessage>,
}

impl ScriptedRoom {
    pub fn new(io: CrossbeamIo) -> Self {
        Self {
            io: Some(io),
            session_id: SessionId::from("me"),
            spawn: EntitySnapshot::at(Vec3::ZERO, 0.0),
            reject_with: None,
            answer_pings: true,
            received: Vec::new(),
        }
    }

    pub fn send(&self, message: ServerMessage) {
        let Some(io) = &self.io else {
            warn!("room is disconnected, message not sent");
            return;
        };
        if let Err(e) = codec::encode(&message).and_then(|payload| io.try_send(payload)) {
            warn!(error = %e, "could not send server message");
        }
    }

    pub fn event(&self, event: RoomEvent) {
        self.send(ServerMessage::State(event));
    }

    pub fn add(&self, kind: EntityKind, id: &str, snapshot: EntitySnapshot) {
        self.event(RoomEvent::Add {
            kind,
            id: SessionId::from(id),
            snapshot,
        });
    }

    pub fn update(&self, kind: EntityKind, id: &str, snapshot: EntitySnapshot) {
        self.event(RoomEvent::Update {
            kind,
            id: SessionId::from(id),
            snapshot,
        });
    }

    pub fn remove(&self, kind: EntityKind, id: &str) {
        self.event(RoomEvent::Remove {
            kind,
            id: SessionId::from(id),
        });
    }

    /// Handle everything the client sent since the last call
    pub fn pump(&mut self) {
        let Some(io) = &self.io else {
            return;
        };
        let mut inbound = Vec::new();
        loop {
            let payload = match io.try_recv() {
                Ok(Some(payload)) => payload,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "client channel is gone");
                    break;
                }
            };
            match codec::decode::<ClientMessage>(&payload) {
                Ok(message) => inbound.push(message),
                Err(e) => warn!(error = %e, "room could not decode client message"),
            }
        }
        for message in inbound {
            trace!(?message, "room received");
            match &message {
                ClientMessage::Join(options) => {
                    if let Some(reason) = &self.reject_with {
                        self.send(ServerMessage::JoinRejected {
                            reason: reason.clone(),
                        });
                    } else {
                        info!(character_id = options.character_id, "room accepting join");
                        self.send(ServerMessage::Joined {
                            session_id: self.session_id.clone(),
                        });
                        self.event(RoomEvent::Add {
                            kind: EntityKind::Player,
                            id: self.session_id.clone(),
                            snapshot: self.spawn,
                        });
                    }
                }
                ClientMessage::Ping { sent_at_ms } if self.answer_pings => {
                    self.send(ServerMessage::Pong {
                        sent_at_ms: *sent_at_ms,
                    });
                }
                _ => {}
            }
            self.received.push(message);
        }
    }

    /// Movement commands received so far, in order
    pub fn inputs(&self) -> Vec<PlayerInput> {
        self.received
            .iter()
            .filter_map(|message| match message {
                ClientMessage::PlayerInput(input) => Some(*input),
                _ => None,
            })
            .collect()
    }

    pub fn last_input_sequence(&self) -> Sequence {
        self.inputs()
            .last()
            .map(|input| input.sequence)
            .unwrap_or_default()
    }

    pub fn client_left(&self) -> bool {
        self.received.contains(&ClientMessage::Leave)
    }

    /// Drop the room end of the channel
    pub fn disconnect(&mut self) {
        self.io = None;
    }
}
