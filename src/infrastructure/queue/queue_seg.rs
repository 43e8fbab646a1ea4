use std::sync::Arc;

use crossbeam::queue::SegQueue;

use crate::infrastructure::queue::{
  Element, QueueBehavior, QueueError, QueueReaderBehavior, QueueReaderFactoryBehavior, QueueSize, QueueWriterBehavior,
  QueueWriterFactoryBehavior,
};

/// A lock-free FIFO queue for many producers and a single consumer.
///
/// The capacity check is advisory: concurrent producers may briefly overshoot a limited capacity.
#[derive(Debug, Clone)]
pub struct QueueSeg<E: Element> {
  values: Arc<SegQueue<E>>,
  capacity: QueueSize,
}

#[derive(Debug, Clone)]
pub struct QueueSegWriter<E: Element> {
  queue: QueueSeg<E>,
}

#[derive(Debug, Clone)]
pub struct QueueSegReader<E: Element> {
  queue: QueueSeg<E>,
}

impl<E: Element> QueueSeg<E> {
  pub fn new(capacity: QueueSize) -> Self {
    Self {
      values: Arc::new(SegQueue::new()),
      capacity,
    }
  }
}

impl<E: Element + 'static> QueueBehavior<E> for QueueSeg<E> {
  fn len(&self) -> usize {
    self.values.len()
  }

  fn capacity(&self) -> QueueSize {
    self.capacity
  }
}

impl<E: Element + 'static> QueueWriterFactoryBehavior<E> for QueueSeg<E> {
  type Writer = QueueSegWriter<E>;

  fn writer(&self) -> Self::Writer {
    QueueSegWriter { queue: self.clone() }
  }
}

impl<E: Element + 'static> QueueReaderFactoryBehavior<E> for QueueSeg<E> {
  type Reader = QueueSegReader<E>;

  fn reader(&self) -> Self::Reader {
    QueueSegReader { queue: self.clone() }
  }
}

impl<E: Element + 'static> QueueBehavior<E> for QueueSegWriter<E> {
  fn len(&self) -> usize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity
  }
}

impl<E: Element + 'static> QueueWriterBehavior<E> for QueueSegWriter<E> {
  fn offer(&mut self, e: E) -> anyhow::Result<()> {
    if self.is_full() {
      return Err(anyhow::Error::new(QueueError::Full {
        capacity: self.queue.capacity.to_usize(),
        element: e,
      }));
    }
    self.queue.values.push(e);
    Ok(())
  }
}

impl<E: Element + 'static> QueueBehavior<E> for QueueSegReader<E> {
  fn len(&self) -> usize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity
  }
}

impl<E: Element + 'static> QueueReaderBehavior<E> for QueueSegReader<E> {
  fn poll(&mut self) -> anyhow::Result<Option<E>> {
    Ok(self.queue.values.pop())
  }
}
