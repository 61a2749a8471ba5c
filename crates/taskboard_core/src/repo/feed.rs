//! Change feed pushed by storage collaborators.
//!
//! # Invariants
//! - Every publication carries the full task collection in storage order.
//! - A dropped receiver never fails the write that triggered publication.

use crate::model::task::Task;
use log::warn;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Receiving half subscribed to by the board.
pub type ChangeReceiver = Receiver<Vec<Task>>;

/// Sending half registered with a repository through `init`.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: Sender<Vec<Task>>,
}

impl ChangeFeed {
    /// Creates a connected feed/receiver pair.
    pub fn channel() -> (Self, ChangeReceiver) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }

    /// Publishes one full snapshot.
    ///
    /// Returns `false` when the subscriber has gone away.
    pub fn publish(&self, tasks: Vec<Task>) -> bool {
        let count = tasks.len();
        match self.sender.send(tasks) {
            Ok(()) => true,
            Err(_) => {
                warn!("event=data_changed module=repo status=dropped count={count}");
                false
            }
        }
    }
}
