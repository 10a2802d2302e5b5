//! Steering input, queued outside the tick and drained at tick start.
//!
//! Player steering is the single piece of match state written from outside
//! the tick loop (the transport layer writes it whenever a message arrives).
//! Rather than letting that write race the tick, inputs land in a
//! mutex-guarded queue via a clonable [`InputHandle`]; the simulation drains
//! the queue exactly once at the start of each tick, so a tick only ever
//! sees the values sampled at its boundary and replays stay possible by
//! logging the drained inputs per tick.

use std::sync::{Arc, Mutex};

use crate::player::PlayerId;

/// One queued steering update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteerInput {
    /// Player being steered
    pub player: PlayerId,
    /// Continuous steering value; clamped to `[-1, 1]` when applied
    pub direction: f32,
}

/// The engine-side end of the input channel.
#[derive(Debug, Default)]
pub struct InputQueue {
    queue: Arc<Mutex<Vec<SteerInput>>>,
}

impl InputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a handle the transport layer can write through.
    #[must_use]
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Drains all queued inputs, oldest first.
    ///
    /// Called once per tick by the simulation. Later entries for the same
    /// player overwrite earlier ones when applied in order.
    ///
    /// # Panics
    ///
    /// Panics if the queue mutex is poisoned, which cannot happen unless a
    /// writer panicked while holding the lock.
    #[must_use]
    pub fn drain(&self) -> Vec<SteerInput> {
        let mut queue = self.queue.lock().unwrap();
        std::mem::take(&mut *queue)
    }
}

/// A clonable writer for the transport layer.
///
/// `steer` never blocks on the tick: it appends to the queue and returns.
#[derive(Debug, Clone)]
pub struct InputHandle {
    queue: Arc<Mutex<Vec<SteerInput>>>,
}

impl InputHandle {
    /// Queues a steering update for `player`, applied at the next tick
    /// boundary.
    ///
    /// # Panics
    ///
    /// Panics if the queue mutex is poisoned.
    pub fn steer(&self, player: PlayerId, direction: f32) {
        self.queue.lock().unwrap().push(SteerInput { player, direction });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_inputs_in_arrival_order() {
        let queue = InputQueue::new();
        let handle = queue.handle();

        handle.steer(PlayerId::new(0), 1.0);
        handle.steer(PlayerId::new(1), -1.0);
        handle.steer(PlayerId::new(0), 0.0);

        let drained = queue.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].player, PlayerId::new(0));
        assert!((drained[0].direction - 1.0).abs() < f32::EPSILON);
        assert_eq!(drained[2].player, PlayerId::new(0));
        assert!((drained[2].direction).abs() < f32::EPSILON);
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = InputQueue::new();
        queue.handle().steer(PlayerId::new(0), 1.0);
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn handles_share_one_queue() {
        let queue = InputQueue::new();
        let a = queue.handle();
        let b = a.clone();
        a.steer(PlayerId::new(0), 1.0);
        b.steer(PlayerId::new(1), -0.5);
        assert_eq!(queue.drain().len(), 2);
    }

    #[test]
    fn writes_from_another_thread_arrive() {
        let queue = InputQueue::new();
        let handle = queue.handle();
        let writer = std::thread::spawn(move || {
            handle.steer(PlayerId::new(1), 0.5);
        });
        writer.join().unwrap();
        assert_eq!(queue.drain().len(), 1);
    }
}
