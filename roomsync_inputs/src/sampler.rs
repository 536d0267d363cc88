use roomsync_core::prelude::{Sequence, SequenceCounter};
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::device::InputDevice;

/// One sampled movement command
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct InputCommand {
    pub sequence: Sequence,
    pub horizontal: f32,
    pub vertical: f32,
}

/// Produces at most one [`InputCommand`] per tick and numbers them
#[derive(Debug, Default, Clone)]
pub struct InputSampler {
    counter: SequenceCounter,
}

impl InputSampler {
    /// Sample the device.
    ///
    /// Returns `None`, without consuming a sequence number, when movement is not permitted
    /// or when `blocked` is set (for example because the controlled entity is dead).
    /// Also returns `None` once the session ran out of sequence numbers.
    pub fn sample(&mut self, device: &InputDevice, blocked: bool) -> Option<InputCommand> {
        if !device.movement_permitted || blocked {
            return None;
        }
        let Some(sequence) = self.counter.next() else {
            error!(last = %SequenceCounter::last(&self.counter), "input sequence numbers exhausted, dropping input");
            return None;
        };
        let command = InputCommand {
            sequence,
            horizontal: device.horizontal.clamp(-1.0, 1.0),
            vertical: device.vertical.clamp(-1.0, 1.0),
        };
        trace!(?command, "sampled input");
        Some(command)
    }

    /// Last sequence handed out, [`Sequence::ZERO`] if none
    pub fn last_sequence(&self) -> Sequence {
        SequenceCounter::last(&self.counter)
    }
}
