//! Server side of the loopback room
use bevy::math::Vec3;
use bevy::platform::collections::HashMap;
use roomsync::prelude::*;
use roomsync::shared::movement::integrate;
use roomsync::transport::codec;
use tracing::{debug, info, warn};

struct Body {
    kind: EntityKind,
    snapshot: EntitySnapshot,
}

/// A single room, stepped by the demo loop instead of running its own thread
pub struct LoopbackRoom {
    io: CrossbeamIo,
    movement: MovementConfig,
    player: Option<SessionId>,
    bodies: HashMap<SessionId, Body>,
    /// Commands received since the last tick
    inbox: Vec<PlayerInput>,
    drift: f32,
    tick: u64,
}

impl LoopbackRoom {
    pub fn new(io: CrossbeamIo, movement: MovementConfig, npcs: usize, drift: f32) -> Self {
        let mut bodies = HashMap::default();
        for i in 0..npcs {
            let angle = i as f32 * core::f32::consts::TAU / npcs.max(1) as f32;
            let position = Vec3::new(angle.cos() * 8.0, 0.0, angle.sin() * 8.0);
            bodies.insert(
                SessionId::new(format!("npc-{i}")),
                Body {
                    kind: EntityKind::Npc,
                    snapshot: EntitySnapshot::at(position, angle),
                },
            );
        }
        Self {
            io,
            movement,
            player: None,
            bodies,
            inbox: Vec::new(),
            drift,
            tick: 0,
        }
    }

    pub fn listing(&self, location: &str) -> RoomListing {
        RoomListing::new("loopback", location)
    }

    fn send(&self, message: &ServerMessage) {
        if let Err(e) = codec::encode(message).and_then(|payload| self.io.try_send(payload)) {
            warn!(error = %e, "could not send server message");
        }
    }

    /// Handle the messages of the client
    pub fn receive(&mut self) {
        while let Ok(Some(payload)) = self.io.try_recv() {
            let message = match codec::decode::<ClientMessage>(&payload) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "dropping malformed client message");
                    continue;
                }
            };
            match message {
                ClientMessage::Join(options) => self.join(options.character_id),
                ClientMessage::PlayerInput(input) => self.inbox.push(input),
                ClientMessage::Ping { sent_at_ms } => {
                    self.send(&ServerMessage::Pong { sent_at_ms });
                }
                ClientMessage::Leave => {
                    info!("client left the room");
                    if let Some(id) = self.player.take() {
                        self.bodies.remove(&id);
                    }
                }
            }
        }
    }

    fn join(&mut self, character_id: u64) {
        let id = SessionId::new(format!("player-{character_id}"));
        info!(%id, "client joined");
        self.send(&ServerMessage::Joined {
            session_id: id.clone(),
        });
        self.bodies.insert(
            id.clone(),
            Body {
                kind: EntityKind::Player,
                snapshot: EntitySnapshot::default(),
            },
        );
        for (id, body) in self.bodies.iter() {
            self.send(&ServerMessage::State(RoomEvent::Add {
                kind: body.kind,
                id: id.clone(),
                snapshot: body.snapshot,
            }));
        }
        self.player = Some(id);
    }

    /// Apply the commands received so far, move the NPCs and broadcast the new state
    pub fn tick(&mut self) {
        self.tick += 1;
        let inputs: Vec<PlayerInput> = self.inbox.drain(..).collect();
        if let Some(body) = self.player.as_ref().and_then(|id| self.bodies.get_mut(id)) {
            let snapshot = &mut body.snapshot;
            let mut position = snapshot.position();
            for input in inputs {
                integrate(
                    &mut position,
                    &mut snapshot.rot,
                    input.horizontal,
                    input.vertical,
                    &self.movement,
                );
                snapshot.sequence = input.sequence;
            }
            if self.drift != 0.0 && self.tick % 20 == 0 {
                debug!(drift = self.drift, "drifting the player");
                position.z += self.drift;
            }
            (snapshot.x, snapshot.y, snapshot.z) = (position.x, position.y, position.z);
        }
        let phase = self.tick as f32 * 0.05;
        for body in self.bodies.values_mut() {
            if body.kind == EntityKind::Npc {
                body.snapshot.rot += 0.05;
                body.snapshot.x += phase.cos() * 0.1;
                body.snapshot.z += phase.sin() * 0.1;
            }
        }
        for (id, body) in self.bodies.iter() {
            self.send(&ServerMessage::State(RoomEvent::Update {
                kind: body.kind,
                id: id.clone(),
                snapshot: body.snapshot,
            }));
        }
    }
}
