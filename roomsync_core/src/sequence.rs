use bevy_reflect::Reflect;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Sequence number of an input command.
///
/// Sequence numbers start at 1 and increase strictly for the lifetime of a session.
/// `Sequence(0)` means "no input applied yet".
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect,
)]
pub struct Sequence(pub u32);

impl Sequence {
    pub const ZERO: Sequence = Sequence(0);

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session-scoped counter handing out input sequence numbers.
///
/// The counter never resets while its session is alive: buffered commands are matched
/// against acknowledgments by sequence. A new session gets a new counter.
#[derive(Debug, Default, Clone, Reflect)]
pub struct SequenceCounter {
    last: Sequence,
}

impl SequenceCounter {
    /// Last sequence handed out, `Sequence::ZERO` if none
    pub fn last(&self) -> Sequence {
        self.last
    }
}

/// Yields increasing sequences, and `None` once every sequence has been handed out.
/// The counter never wraps back to 0.
impl Iterator for SequenceCounter {
    type Item = Sequence;

    fn next(&mut self) -> Option<Sequence> {
        let next = self.last.0.checked_add(1)?;
        self.last = Sequence(next);
        Some(self.last)
    }
}
