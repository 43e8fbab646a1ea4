use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::infrastructure::queue::{
  Element, QueueBehavior, QueueError, QueueReaderBehavior, QueueReaderFactoryBehavior, QueueSize, QueueWriterBehavior,
  QueueWriterFactoryBehavior,
};

/// A FIFO queue guarded by a mutex. The capacity check and the push happen under the same lock.
#[derive(Debug, Clone)]
pub struct QueueVec<E: Element> {
  values: Arc<Mutex<VecDeque<E>>>,
  capacity: QueueSize,
}

#[derive(Debug, Clone)]
pub struct QueueVecWriter<E: Element> {
  queue: QueueVec<E>,
}

#[derive(Debug, Clone)]
pub struct QueueVecReader<E: Element> {
  queue: QueueVec<E>,
}

impl<E: Element> QueueVec<E> {
  pub fn new(capacity: QueueSize) -> Self {
    Self {
      values: Arc::new(Mutex::new(VecDeque::new())),
      capacity,
    }
  }

  fn values(&self) -> MutexGuard<'_, VecDeque<E>> {
    // Every critical section is a single push or pop, so a poisoned deque is still consistent.
    match self.values.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }
}

impl<E: Element + 'static> QueueBehavior<E> for QueueVec<E> {
  fn len(&self) -> usize {
    self.values().len()
  }

  fn capacity(&self) -> QueueSize {
    self.capacity
  }
}

impl<E: Element + 'static> QueueWriterFactoryBehavior<E> for QueueVec<E> {
  type Writer = QueueVecWriter<E>;

  fn writer(&self) -> Self::Writer {
    QueueVecWriter { queue: self.clone() }
  }
}

impl<E: Element + 'static> QueueReaderFactoryBehavior<E> for QueueVec<E> {
  type Reader = QueueVecReader<E>;

  fn reader(&self) -> Self::Reader {
    QueueVecReader { queue: self.clone() }
  }
}

impl<E: Element + 'static> QueueBehavior<E> for QueueVecWriter<E> {
  fn len(&self) -> usize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity
  }
}

impl<E: Element + 'static> QueueWriterBehavior<E> for QueueVecWriter<E> {
  fn offer(&mut self, e: E) -> anyhow::Result<()> {
    let mut values = self.queue.values();
    if !self.queue.capacity.admits(values.len()) {
      return Err(anyhow::Error::new(QueueError::Full {
        capacity: self.queue.capacity.to_usize(),
        element: e,
      }));
    }
    values.push_back(e);
    Ok(())
  }
}

impl<E: Element + 'static> QueueBehavior<E> for QueueVecReader<E> {
  fn len(&self) -> usize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity
  }
}

impl<E: Element + 'static> QueueReaderBehavior<E> for QueueVecReader<E> {
  fn poll(&mut self) -> anyhow::Result<Option<E>> {
    Ok(self.queue.values().pop_front())
  }

  fn drain(&mut self, max_count: usize, buffer: &mut Vec<E>) -> anyhow::Result<usize> {
    let mut values = self.queue.values();
    let count = max_count.min(values.len());
    buffer.extend(values.drain(..count));
    Ok(count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env;
  use std::thread;

  fn init_logger() {
    env::set_var("RUST_LOG", "info");
    let _ = env_logger::builder().is_test(true).try_init();
  }

  #[test]
  fn test_queue_vec_offer_then_poll() {
    init_logger();
    let queue = QueueVec::<u32>::new(QueueSize::Limitless);
    let mut writer = queue.writer();
    writer.offer(1).unwrap();
    writer.offer(2).unwrap();
    assert_eq!(writer.len(), 2);

    let mut reader = queue.reader();
    assert_eq!(reader.poll().unwrap(), Some(1));
    assert_eq!(reader.len(), 1);
  }

  #[test]
  fn test_queue_vec_drain_keeps_remainder() {
    init_logger();
    let queue = QueueVec::<u32>::new(QueueSize::Limitless);
    let mut writer = queue.writer();
    for n in 0..10 {
      writer.offer(n).unwrap();
    }

    let mut reader = queue.reader();
    let mut buffer = Vec::new();
    assert_eq!(reader.drain(4, &mut buffer).unwrap(), 4);
    assert_eq!(buffer, vec![0, 1, 2, 3]);
    assert_eq!(reader.len(), 6);
  }

  #[test]
  fn test_queue_vec_frees_capacity_after_drain() {
    init_logger();
    let queue = QueueVec::<u32>::new(QueueSize::Limited(2));
    let mut writer = queue.writer();
    writer.offer(1).unwrap();
    writer.offer(2).unwrap();
    assert!(writer.offer(3).is_err());

    let mut buffer = Vec::new();
    queue.reader().drain(1, &mut buffer).unwrap();
    writer.offer(3).unwrap();
    assert_eq!(queue.len(), 2);
  }

  #[test]
  fn test_queue_vec_concurrent_producers_keep_per_producer_order() {
    init_logger();
    let queue = QueueVec::<u32>::new(QueueSize::Limitless);
    let handles = (0..4u32)
      .map(|producer| {
        let mut writer = queue.writer();
        thread::spawn(move || {
          for n in 0..100u32 {
            writer.offer(producer * 1000 + n).unwrap();
          }
        })
      })
      .collect::<Vec<_>>();
    for handle in handles {
      handle.join().unwrap();
    }

    let mut reader = queue.reader();
    let mut buffer = Vec::new();
    assert_eq!(reader.drain(usize::MAX, &mut buffer).unwrap(), 400);
    for producer in 0..4u32 {
      let seen = buffer
        .iter()
        .filter(|v| **v / 1000 == producer)
        .map(|v| *v % 1000)
        .collect::<Vec<_>>();
      assert_eq!(seen, (0..100u32).collect::<Vec<_>>());
    }
  }
}
