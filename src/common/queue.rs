//! Broadcast queue for store-to-collaborator notifications.

use crate::ShareLock;

/// One-to-many broadcast channel backed by flume.
///
/// Every subscriber gets its own unbounded receiver; dropped receivers are
/// pruned on the next publish. Publishing never blocks, so the store can
/// notify renderers from inside a synchronous mutation.
pub struct Broadcast<T> {
    senders: ShareLock<Vec<flume::Sender<T>>>,
}

#[allow(unused)]
impl<T: Clone> Broadcast<T> {
    /// create a new broadcast queue
    pub fn new() -> Self {
        Self {
            senders: ShareLock::new(Vec::new().into()),
        }
    }

    /// subscribe to the queue
    pub fn subscribe(&self) -> flume::Receiver<T> {
        let (tx, rx) = flume::unbounded();
        self.senders.write().unwrap().push(tx);
        rx
    }

    /// send a message to every live subscriber
    pub fn publish(
        &self,
        msg: T,
    ) {
        let mut senders = self.senders.write().unwrap();
        senders.retain(|sender| sender.send(msg.clone()).is_ok());
    }

    /// number of live subscribers
    pub fn len(&self) -> usize {
        self.senders.read().unwrap().len()
    }
}

impl<T: Clone> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}
