//! In-process IO backed by crossbeam channels, used for loopback rooms and tests
use crate::codec::TransportError;
use crate::link::Link;
use crate::plugin::TransportSet;
use alloc::string::ToString;
use bevy_app::{App, Plugin, PostUpdate, PreUpdate};
use bevy_ecs::prelude::*;
use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use tracing::{error, warn};

#[derive(Component)]
#[require(Link)]
pub struct CrossbeamIo {
    sender: Sender<Bytes>,
    receiver: Receiver<Bytes>,
}

impl CrossbeamIo {
    pub fn new(sender: Sender<Bytes>, receiver: Receiver<Bytes>) -> Self {
        Self { sender, receiver }
    }

    /// Create a pair of connected CrossbeamIo instances
    pub fn new_pair() -> (Self, Self) {
        let (sender1, receiver1) = crossbeam_channel::unbounded();
        let (sender2, receiver2) = crossbeam_channel::unbounded();
        (Self::new(sender1, receiver2), Self::new(sender2, receiver1))
    }

    /// Returns `Ok(None)` when no payload is waiting
    pub fn try_recv(&self) -> Result<Option<Bytes>, TransportError> {
        match self.receiver.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Disconnected),
        }
    }

    pub fn try_send(&self, payload: Bytes) -> Result<(), TransportError> {
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::ChannelFull,
            TrySendError::Disconnected(_) => TransportError::Disconnected,
        })
    }
}

pub struct CrossbeamPlugin;

impl CrossbeamPlugin {
    fn receive(mut query: Query<(Entity, &mut Link, &CrossbeamIo)>) {
        query.iter_mut().for_each(|(entity, mut link, io)| {
            if !link.is_linked() {
                return;
            }
            loop {
                match io.try_recv() {
                    Ok(Some(data)) => link.recv.push(data),
                    Ok(None) => break,
                    Err(e) => {
                        error!(?entity, error = %e, "CrossbeamIo receive failed");
                        link.unlink(e.to_string());
                        break;
                    }
                }
            }
        })
    }

    fn send(mut query: Query<(Entity, &mut Link, &CrossbeamIo)>) {
        query.iter_mut().for_each(|(entity, mut link, io)| {
            if !link.is_linked() {
                return;
            }
            let payloads: alloc::vec::Vec<Bytes> = link.send.drain(..).collect();
            for payload in payloads {
                match io.try_send(payload) {
                    Ok(()) => {}
                    Err(TransportError::ChannelFull) => {
                        warn!(?entity, "CrossbeamIo channel is full, dropping payload");
                    }
                    Err(e) => {
                        error!(?entity, error = %e, "CrossbeamIo send failed");
                        link.unlink(e.to_string());
                        break;
                    }
                }
            }
        })
    }
}

impl Plugin for CrossbeamPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, Self::receive.in_set(TransportSet::Receive));
        app.add_systems(PostUpdate, Self::send.in_set(TransportSet::Send));
    }
}
