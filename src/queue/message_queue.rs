use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::message::Message;

/// A consumer blocked on an empty queue.
struct Waiter {
    id: u64,
    sender: oneshot::Sender<Message>,
}

/// Backlog and waiter list share one lock so that deliver-or-enqueue and
/// serve-or-wait are atomic with respect to each other.
#[derive(Default)]
struct QueueState {
    backlog: VecDeque<Message>,
    waiters: VecDeque<Waiter>,
}

impl QueueState {
    /// Hands `message` to the oldest waiter whose consumer is still listening.
    /// Gives the message back when no such waiter exists.
    fn hand_off(&mut self, mut message: Message) -> Result<(), Message> {
        while let Some(waiter) = self.waiters.pop_front() {
            match waiter.sender.send(message) {
                Ok(()) => return Ok(()),
                Err(returned) => message = returned,
            }
        }
        Err(message)
    }

    fn remove_waiter(&mut self, id: u64) -> bool {
        match self.waiters.iter().position(|w| w.id == id) {
            Some(pos) => {
                self.waiters.remove(pos);
                true
            }
            None => false,
        }
    }
}

pub struct QueueStats {
    enqueued_total: AtomicU64,
    dequeued_total: AtomicU64,
    expired_total: AtomicU64,
}

impl QueueStats {
    pub fn new() -> Self {
        Self {
            enqueued_total: AtomicU64::new(0),
            dequeued_total: AtomicU64::new(0),
            expired_total: AtomicU64::new(0),
        }
    }

    pub fn enqueued_total(&self) -> u64 {
        self.enqueued_total.load(Ordering::SeqCst)
    }

    pub fn dequeued_total(&self) -> u64 {
        self.dequeued_total.load(Ordering::SeqCst)
    }

    /// Number of blocked receives that ended without a message.
    pub fn expired_total(&self) -> u64 {
        self.expired_total.load(Ordering::SeqCst)
    }
}

/// One named FIFO channel.
pub struct MessageQueue {
    name: String,
    state: Mutex<QueueState>,
    next_waiter_id: AtomicU64,
    stats: QueueStats,
}

impl MessageQueue {
    pub fn new(name: String) -> Self {
        Self {
            name,
            state: Mutex::new(QueueState::default()),
            next_waiter_id: AtomicU64::new(0),
            stats: QueueStats::new(),
        }
    }

    /// Submits a message. The oldest blocked consumer receives it directly;
    /// otherwise it is appended to the backlog. Never blocks.
    pub fn enqueue(&self, content: serde_json::Value) -> Message {
        let message = Message::new(content);
        let receipt = message.clone();

        let handed_off = {
            let mut state = self.state.lock();
            match state.hand_off(message) {
                Ok(()) => true,
                Err(message) => {
                    state.backlog.push_back(message);
                    false
                }
            }
        };

        self.stats.enqueued_total.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            queue = %self.name,
            message_id = %receipt.id,
            handed_off,
            "message enqueued"
        );
        receipt
    }

    /// Takes the oldest message, waiting up to `timeout` for one to arrive.
    ///
    /// A zero timeout checks the backlog once and returns immediately.
    /// Returns `None` when the deadline passes first.
    pub async fn dequeue(&self, timeout: Duration) -> Option<Message> {
        let (id, receiver) = {
            let mut state = self.state.lock();
            if let Some(message) = state.backlog.pop_front() {
                drop(state);
                self.stats.dequeued_total.fetch_add(1, Ordering::SeqCst);
                return Some(message);
            }

            if timeout.is_zero() {
                return None;
            }

            let id = self.next_waiter_id.fetch_add(1, Ordering::Relaxed);
            let (sender, receiver) = oneshot::channel();
            state.waiters.push_back(Waiter { id, sender });
            (id, receiver)
        };

        tracing::debug!(
            queue = %self.name,
            waiter = id,
            timeout_ms = timeout.as_millis() as u64,
            "consumer waiting"
        );

        let mut pending = PendingReceive {
            queue: self,
            id,
            receiver,
            resolved: false,
        };

        let outcome = tokio::time::timeout(timeout, &mut pending.receiver).await;
        let result = match outcome {
            Ok(Ok(message)) => Some(message),
            // Senders are only dropped after a successful send or by this waiter.
            Ok(Err(_)) => None,
            Err(_) => pending.expire(),
        };
        pending.resolved = true;

        if result.is_some() {
            self.stats.dequeued_total.fetch_add(1, Ordering::SeqCst);
        }
        result
    }

    /// Number of messages in the backlog.
    pub fn size(&self) -> usize {
        self.state.lock().backlog.len()
    }

    /// Number of consumers currently blocked on this queue.
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

/// A registered waiter owned by an in-flight `dequeue`.
///
/// Removal from the waiter list decides the outcome: whoever removes the
/// waiter first (a producer handing off, or the deadline) resolves it.
struct PendingReceive<'a> {
    queue: &'a MessageQueue,
    id: u64,
    receiver: oneshot::Receiver<Message>,
    resolved: bool,
}

impl PendingReceive<'_> {
    fn expire(&mut self) -> Option<Message> {
        let mut state = self.queue.state.lock();
        if state.remove_waiter(self.id) {
            drop(state);
            self.queue.stats.expired_total.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(queue = %self.queue.name, waiter = self.id, "consumer timed out");
            return None;
        }

        // A producer removed this waiter under the lock and has already sent.
        self.receiver.try_recv().ok()
    }
}

impl Drop for PendingReceive<'_> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }

        let mut state = self.queue.state.lock();
        if state.remove_waiter(self.id) {
            return;
        }

        // The consumer went away after a hand-off; put the message back at the head.
        if let Ok(message) = self.receiver.try_recv() {
            tracing::debug!(
                queue = %self.queue.name,
                message_id = %message.id,
                "re-offering message from abandoned receive"
            );
            if let Err(message) = state.hand_off(message) {
                state.backlog.push_front(message);
            }
        }
    }
}
