use crate::core::address::LaneAddress;
use crate::core::dispatch::message::MessagePayload;

/// The per-actor sink that executes delivered messages.
///
/// `deliver` runs on the lane's turn and must not block. The router holds no borrow of its own
/// state while delivering, so a mailbox may reply or send through the lane's router inline.
#[cfg_attr(test, mockall::automock)]
pub trait MailboxBehavior: Send + Sync {
  fn deliver(&self, sender: LaneAddress, payload: MessagePayload);
}
