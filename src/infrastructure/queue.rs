use std::fmt::Debug;

use anyhow::Result;
use thiserror::Error;

pub use queue_seg::*;
pub use queue_vec::*;

mod queue_seg;
mod queue_vec;

/// Anything a lane's inbound queue can carry between threads.
pub trait Element: Debug + Clone + Send + Sync {}

#[cfg(test)]
impl Element for u32 {}

#[derive(Error, Debug)]
pub enum QueueError<E: Debug> {
  #[error("Queue is full, capacity = {capacity}, rejected = {element:?}")]
  Full { capacity: usize, element: E },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSize {
  Limitless,
  Limited(usize),
}

impl QueueSize {
  pub fn from_capacity(capacity: Option<usize>) -> Self {
    capacity.map_or(QueueSize::Limitless, QueueSize::Limited)
  }

  pub fn to_usize(&self) -> usize {
    match self {
      QueueSize::Limitless => usize::MAX,
      QueueSize::Limited(c) => *c,
    }
  }

  /// Whether a queue holding `len` elements may take one more.
  pub fn admits(&self, len: usize) -> bool {
    len < self.to_usize()
  }
}

pub trait QueueBehavior<E: Element> {
  fn len(&self) -> usize;

  fn capacity(&self) -> QueueSize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn is_full(&self) -> bool {
    !self.capacity().admits(self.len())
  }
}

pub trait QueueWriterFactoryBehavior<E: Element> {
  type Writer: QueueWriterBehavior<E>;
  fn writer(&self) -> Self::Writer;
}

pub trait QueueReaderFactoryBehavior<E: Element> {
  type Reader: QueueReaderBehavior<E>;
  fn reader(&self) -> Self::Reader;
}

pub trait QueueWriterBehavior<E: Element>: QueueBehavior<E> {
  /// Appends `e` at the tail, or fails with [`QueueError::Full`] when the capacity is reached.
  fn offer(&mut self, e: E) -> Result<()>;
}

pub trait QueueReaderBehavior<E: Element>: QueueBehavior<E> {
  fn poll(&mut self) -> Result<Option<E>>;

  /// Moves at most `max_count` elements from the head into `buffer`, keeping their order,
  /// and returns how many were moved.
  fn drain(&mut self, max_count: usize, buffer: &mut Vec<E>) -> Result<usize> {
    let mut count = 0;
    while count < max_count {
      match self.poll()? {
        Some(e) => {
          buffer.push(e);
          count += 1;
        }
        None => break,
      }
    }
    Ok(count)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueType {
  Vec,
  Seg,
}

#[derive(Debug, Clone)]
pub enum Queue<E: Element> {
  Vec(QueueVec<E>),
  Seg(QueueSeg<E>),
}

#[derive(Debug, Clone)]
pub enum QueueWriter<E: Element> {
  Vec(QueueVecWriter<E>),
  Seg(QueueSegWriter<E>),
}

#[derive(Debug, Clone)]
pub enum QueueReader<E: Element> {
  Vec(QueueVecReader<E>),
  Seg(QueueSegReader<E>),
}

macro_rules! delegate_queue_behavior {
  ($name:ident) => {
    impl<E: Element + 'static> QueueBehavior<E> for $name<E> {
      fn len(&self) -> usize {
        match self {
          $name::Vec(q) => q.len(),
          $name::Seg(q) => q.len(),
        }
      }

      fn capacity(&self) -> QueueSize {
        match self {
          $name::Vec(q) => q.capacity(),
          $name::Seg(q) => q.capacity(),
        }
      }
    }
  };
}

delegate_queue_behavior!(Queue);
delegate_queue_behavior!(QueueWriter);
delegate_queue_behavior!(QueueReader);

impl<E: Element + 'static> QueueWriterFactoryBehavior<E> for Queue<E> {
  type Writer = QueueWriter<E>;

  fn writer(&self) -> Self::Writer {
    match self {
      Queue::Vec(q) => QueueWriter::Vec(q.writer()),
      Queue::Seg(q) => QueueWriter::Seg(q.writer()),
    }
  }
}

impl<E: Element + 'static> QueueReaderFactoryBehavior<E> for Queue<E> {
  type Reader = QueueReader<E>;

  fn reader(&self) -> Self::Reader {
    match self {
      Queue::Vec(q) => QueueReader::Vec(q.reader()),
      Queue::Seg(q) => QueueReader::Seg(q.reader()),
    }
  }
}

impl<E: Element + 'static> QueueWriterBehavior<E> for QueueWriter<E> {
  fn offer(&mut self, e: E) -> Result<()> {
    match self {
      QueueWriter::Vec(q) => q.offer(e),
      QueueWriter::Seg(q) => q.offer(e),
    }
  }
}

impl<E: Element + 'static> QueueReaderBehavior<E> for QueueReader<E> {
  fn poll(&mut self) -> Result<Option<E>> {
    match self {
      QueueReader::Vec(q) => q.poll(),
      QueueReader::Seg(q) => q.poll(),
    }
  }

  fn drain(&mut self, max_count: usize, buffer: &mut Vec<E>) -> Result<usize> {
    match self {
      QueueReader::Vec(q) => q.drain(max_count, buffer),
      QueueReader::Seg(q) => q.drain(max_count, buffer),
    }
  }
}

pub fn create_queue<E: Element + 'static>(queue_type: QueueType, capacity: QueueSize) -> Queue<E> {
  match queue_type {
    QueueType::Vec => Queue::Vec(QueueVec::new(capacity)),
    QueueType::Seg => Queue::Seg(QueueSeg::new(capacity)),
  }
}
