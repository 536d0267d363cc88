//! Byte buffers between the protocol layer and an IO
use alloc::string::String;
use alloc::vec::Vec;
use bevy_ecs::component::Component;
use bytes::Bytes;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum LinkState {
    #[default]
    Linked,
    /// The IO has been lost; no payload will flow in either direction anymore
    Unlinked { reason: String },
}

/// Payloads waiting to be read by the session, or written by the IO
///
/// The IO component fills `recv` at the start of the frame and empties `send` at the end.
#[derive(Component, Debug, Default)]
pub struct Link {
    pub recv: Vec<Bytes>,
    pub send: Vec<Bytes>,
    pub state: LinkState,
}

impl Link {
    pub fn send(&mut self, payload: Bytes) {
        self.send.push(payload);
    }

    pub fn is_linked(&self) -> bool {
        self.state == LinkState::Linked
    }

    /// Mark the link as lost. Payloads still buffered are discarded.
    pub fn unlink(&mut self, reason: impl Into<String>) {
        if !self.is_linked() {
            return;
        }
        self.recv.clear();
        self.send.clear();
        self.state = LinkState::Unlinked {
            reason: reason.into(),
        };
    }
}
