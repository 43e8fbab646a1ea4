use std::sync::Arc;

use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::core::address::LaneId;
use crate::core::dispatch::message::RoutedMessage;
use crate::infrastructure::queue::{
  create_queue, Queue, QueueBehavior, QueueReaderBehavior, QueueReaderFactoryBehavior, QueueSize, QueueType,
  QueueWriterBehavior, QueueWriterFactoryBehavior,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaneQueueError {
  #[error("No inbound queue is registered for lane {lane}")]
  NotRegistered { lane: LaneId },
}

/// The process-wide map from lane identity to that lane's inbound FIFO queue.
///
/// Any lane may push; only the owning lane drains. Handles are cheap to clone and all refer to the same map.
#[derive(Debug, Clone)]
pub struct LaneQueueRegistry {
  queue_type: QueueType,
  queues: Arc<DashMap<LaneId, Queue<RoutedMessage>>>,
}

impl Default for LaneQueueRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl LaneQueueRegistry {
  pub fn new() -> Self {
    Self::new_with_queue_type(QueueType::Vec)
  }

  pub fn new_with_queue_type(queue_type: QueueType) -> Self {
    Self {
      queue_type,
      queues: Arc::new(DashMap::new()),
    }
  }

  /// Creates the inbound queue of `lane` holding at most `capacity` messages. Returns false,
  /// leaving the existing queue untouched, if the lane already has one.
  pub fn register(&self, lane: LaneId, capacity: QueueSize) -> bool {
    match self.queues.entry(lane) {
      Entry::Occupied(_) => false,
      Entry::Vacant(entry) => {
        entry.insert(create_queue(self.queue_type, capacity));
        true
      }
    }
  }

  /// Drops the inbound queue of `lane` together with anything still queued in it.
  pub fn unregister(&self, lane: LaneId) -> bool {
    self.queues.remove(&lane).is_some()
  }

  pub fn is_registered(&self, lane: LaneId) -> bool {
    self.queues.contains_key(&lane)
  }

  pub fn push(&self, lane: LaneId, message: RoutedMessage) -> Result<()> {
    let mut writer = match self.queues.get(&lane) {
      Some(queue) => queue.writer(),
      None => return Err(LaneQueueError::NotRegistered { lane }.into()),
    };
    writer.offer(message)
  }

  /// Moves at most `max_count` queued messages of `lane` into `buffer`, in arrival order.
  pub fn drain(&self, lane: LaneId, max_count: usize, buffer: &mut Vec<RoutedMessage>) -> Result<usize> {
    let mut reader = match self.queues.get(&lane) {
      Some(queue) => queue.reader(),
      None => return Err(LaneQueueError::NotRegistered { lane }.into()),
    };
    reader.drain(max_count, buffer)
  }

  pub fn len(&self, lane: LaneId) -> Option<usize> {
    self.queues.get(&lane).map(|queue| queue.len())
  }
}
