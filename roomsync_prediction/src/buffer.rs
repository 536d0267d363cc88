//! Commands sent to the room but not acknowledged yet
use alloc::collections::VecDeque;
use roomsync_core::prelude::Sequence;
use roomsync_inputs::prelude::InputCommand;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictionError {
    #[error("command {received} is not newer than the last buffered command {last}")]
    OutOfOrder { last: Sequence, received: Sequence },
}

/// Ordered buffer of pending commands.
///
/// Sequences are strictly increasing from front to back. When full, the oldest command is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommandBuffer {
    commands: VecDeque<InputCommand>,
    capacity: usize,
}

impl Default for PendingCommandBuffer {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl PendingCommandBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            commands: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Buffer a newly sent command. Returns the command that was dropped to make room, if any.
    pub fn push(&mut self, command: InputCommand) -> Result<Option<InputCommand>, PredictionError> {
        if let Some(last) = self.last_sequence()
            && command.sequence <= last
        {
            return Err(PredictionError::OutOfOrder {
                last,
                received: command.sequence,
            });
        }
        let dropped = if self.commands.len() == self.capacity {
            self.commands.pop_front()
        } else {
            None
        };
        self.commands.push_back(command);
        Ok(dropped)
    }

    /// Discard every command up to and including `sequence`. Returns how many were discarded.
    pub fn acknowledge(&mut self, sequence: Sequence) -> usize {
        let before = self.commands.len();
        while self
            .commands
            .front()
            .is_some_and(|command| command.sequence <= sequence)
        {
            self.commands.pop_front();
        }
        before - self.commands.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputCommand> {
        self.commands.iter()
    }

    pub fn last_sequence(&self) -> Option<Sequence> {
        self.commands.back().map(|command| command.sequence)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use test_log::test;

    fn command(sequence: u32) -> InputCommand {
        InputCommand {
            sequence: Sequence(sequence),
            horizontal: 1.0,
            vertical: 0.0,
        }
    }

    fn sequences(buffer: &PendingCommandBuffer) -> Vec<u32> {
        buffer.iter().map(|c| c.sequence.0).collect()
    }

    #[test]
    fn test_unacknowledged_commands_accumulate() {
        let mut buffer = PendingCommandBuffer::default();
        for i in 1..=5 {
            assert_eq!(buffer.push(command(i)), Ok(None));
        }
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.last_sequence(), Some(Sequence(5)));
    }

    #[test]
    fn test_acknowledge_discards_up_to_sequence() {
        let mut buffer = PendingCommandBuffer::default();
        for i in 1..=5 {
            buffer.push(command(i)).unwrap();
        }
        assert_eq!(buffer.acknowledge(Sequence(3)), 3);
        assert_eq!(sequences(&buffer), [4, 5]);
        // stale or repeated acknowledgments are harmless
        assert_eq!(buffer.acknowledge(Sequence(2)), 0);
        assert_eq!(buffer.acknowledge(Sequence(3)), 0);
        assert_eq!(buffer.acknowledge(Sequence(10)), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_out_of_order_push_is_rejected() {
        let mut buffer = PendingCommandBuffer::default();
        buffer.push(command(4)).unwrap();
        assert_eq!(
            buffer.push(command(4)),
            Err(PredictionError::OutOfOrder {
                last: Sequence(4),
                received: Sequence(4)
            })
        );
        assert!(buffer.push(command(2)).is_err());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut buffer = PendingCommandBuffer::with_capacity(3);
        for i in 1..=3 {
            buffer.push(command(i)).unwrap();
        }
        assert_eq!(buffer.push(command(4)), Ok(Some(command(1))));
        assert_eq!(sequences(&buffer), [2, 3, 4]);
    }
}
