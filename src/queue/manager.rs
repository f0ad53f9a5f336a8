use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

use super::message::Message;
use super::message_queue::MessageQueue;

/// Registry of named queues.
///
/// Queues are created on first use and live as long as the manager. Names
/// are never evicted, so memory grows with the number of distinct names.
pub struct QueueManager {
    queues: DashMap<String, Arc<MessageQueue>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_queues: usize,
    pub queues: HashMap<String, QueueStatsInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueStatsInfo {
    pub size: usize,
    pub waiting: usize,
    pub enqueued_total: u64,
    pub dequeued_total: u64,
    pub expired_total: u64,
}

impl QueueStatsInfo {
    fn from_queue(queue: &MessageQueue) -> Self {
        let stats = queue.stats();
        Self {
            size: queue.size(),
            waiting: queue.waiting(),
            enqueued_total: stats.enqueued_total(),
            dequeued_total: stats.dequeued_total(),
            expired_total: stats.expired_total(),
        }
    }
}

impl QueueManager {
    pub fn new() -> Self {
        Self {
            queues: DashMap::new(),
        }
    }

    /// Returns the queue for `name`, creating an empty one on first use.
    pub fn get_or_create_queue(&self, name: &str) -> Arc<MessageQueue> {
        if let Some(queue) = self.queues.get(name) {
            return queue.clone();
        }

        self.queues
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(queue = %name, "creating queue");
                Arc::new(MessageQueue::new(name.to_string()))
            })
            .clone()
    }

    /// Looks up a queue without creating it.
    pub fn get_queue(&self, name: &str) -> Option<Arc<MessageQueue>> {
        self.queues.get(name).map(|queue| queue.clone())
    }

    pub fn enqueue(&self, queue_name: &str, content: serde_json::Value) -> Message {
        self.get_or_create_queue(queue_name).enqueue(content)
    }

    pub async fn dequeue(&self, queue_name: &str, timeout: Duration) -> Option<Message> {
        let queue = self.get_or_create_queue(queue_name);
        queue.dequeue(timeout).await
    }

    pub fn list_queues(&self) -> Vec<String> {
        self.queues.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    pub fn get_all_stats(&self) -> HashMap<String, QueueStatsInfo> {
        self.queues
            .iter()
            .map(|entry| (entry.key().clone(), QueueStatsInfo::from_queue(entry.value())))
            .collect()
    }

    pub fn get_stats_summary(&self) -> StatsSummary {
        let queues = self.get_all_stats();
        StatsSummary {
            total_queues: queues.len(),
            queues,
        }
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}
