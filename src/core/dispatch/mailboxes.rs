use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use dashmap::DashMap;

use crate::core::address::InstanceId;
use crate::core::dispatch::mailbox::MailboxBehavior;

pub trait MailboxRegistryBehavior: Send + Sync {
  fn lookup(&self, instance: InstanceId) -> Option<Arc<dyn MailboxBehavior>>;
}

/// The mailboxes of the actors living on one lane, keyed by instance id.
#[derive(Clone, Default)]
pub struct Mailboxes {
  mailboxes: Arc<DashMap<InstanceId, Arc<dyn MailboxBehavior>>>,
}

impl Debug for Mailboxes {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Mailboxes").field("len", &self.mailboxes.len()).finish()
  }
}

impl Mailboxes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `mailbox` for `instance`, returning the mailbox it replaced.
  pub fn add(&self, instance: InstanceId, mailbox: Arc<dyn MailboxBehavior>) -> Option<Arc<dyn MailboxBehavior>> {
    self.mailboxes.insert(instance, mailbox)
  }

  pub fn remove(&self, instance: InstanceId) -> bool {
    self.mailboxes.remove(&instance).is_some()
  }

  pub fn contains(&self, instance: InstanceId) -> bool {
    self.mailboxes.contains_key(&instance)
  }

  pub fn len(&self) -> usize {
    self.mailboxes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.mailboxes.is_empty()
  }
}

impl MailboxRegistryBehavior for Mailboxes {
  fn lookup(&self, instance: InstanceId) -> Option<Arc<dyn MailboxBehavior>> {
    self.mailboxes.get(&instance).map(|entry| entry.value().clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::address::{LaneAddress, LaneId, ProcessId};
  use crate::core::dispatch::mailbox::MockMailboxBehavior;
  use crate::core::dispatch::message::MessagePayload;

  #[test]
  fn test_lookup_registered_mailbox() {
    let sender = LaneAddress::new(ProcessId::new(1), LaneId::new(1));
    let mut mailbox = MockMailboxBehavior::new();
    mailbox
      .expect_deliver()
      .withf(move |from, payload| *from == sender && payload.correlation_id().is_none())
      .times(1)
      .return_const(());

    let mailboxes = Mailboxes::new();
    assert!(mailboxes.add(InstanceId::new(42), Arc::new(mailbox)).is_none());
    assert_eq!(mailboxes.len(), 1);

    let found = mailboxes.lookup(InstanceId::new(42)).unwrap();
    found.deliver(sender, MessagePayload::of_notification("hello"));
  }

  #[test]
  fn test_lookup_missing_mailbox() {
    let mailboxes = Mailboxes::new();
    assert!(mailboxes.lookup(InstanceId::new(42)).is_none());
  }

  #[test]
  fn test_remove_mailbox() {
    let mailboxes = Mailboxes::new();
    mailboxes.add(InstanceId::new(1), Arc::new(MockMailboxBehavior::new()));
    assert!(mailboxes.contains(InstanceId::new(1)));
    assert!(mailboxes.remove(InstanceId::new(1)));
    assert!(!mailboxes.remove(InstanceId::new(1)));
    assert!(mailboxes.is_empty());
  }
}
