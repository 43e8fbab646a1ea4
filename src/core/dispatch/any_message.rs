use std::any::Any;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

/// Marker for values that can travel between lanes.
pub trait Message: Debug + Send + Sync + 'static {}

impl Message for () {}

impl Message for bool {}

impl Message for i32 {}

impl Message for i64 {}

impl Message for u32 {}

impl Message for u64 {}

impl Message for String {}

impl Message for &'static str {}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to downcast the message to {expected}")]
pub struct DowncastAnyMessageError {
  pub expected: &'static str,
}

trait MessageObject: Debug + Send + Sync {
  fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
  fn as_any(&self) -> &dyn Any;
}

impl<T: Message> MessageObject for T {
  fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
    self
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// A type-erased, cheaply cloneable message body.
#[derive(Clone)]
pub struct AnyMessage {
  msg: Arc<dyn MessageObject>,
}

impl AnyMessage {
  pub fn new<T: Message>(msg: T) -> Self {
    Self { msg: Arc::new(msg) }
  }

  pub fn is<T: Message>(&self) -> bool {
    self.msg.as_any().is::<T>()
  }

  pub fn take<T: Message>(&self) -> Result<Arc<T>, DowncastAnyMessageError> {
    self
      .msg
      .clone()
      .into_any()
      .downcast::<T>()
      .map_err(|_| DowncastAnyMessageError {
        expected: std::any::type_name::<T>(),
      })
  }
}

impl Debug for AnyMessage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("AnyMessage").field(&self.msg).finish()
  }
}

impl PartialEq for AnyMessage {
  fn eq(&self, other: &Self) -> bool {
    Arc::as_ptr(&self.msg) as *const () == Arc::as_ptr(&other.msg) as *const ()
  }
}
