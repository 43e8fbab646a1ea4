use std::fmt;
use std::fmt::{Debug, Formatter};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::core::address::{LaneAddress, LaneId, ProcessId};
use crate::core::lane::timer::{TimerBehavior, TokioTimer};

pub mod timer;

/// The execution lane a router is attached to.
///
/// A lane is a cooperatively scheduled unit of execution: everything the router does for the lane
/// runs on the lane's own turns, never concurrently with itself.
#[derive(Clone)]
pub struct Lane {
  address: LaneAddress,
  timer: Arc<dyn TimerBehavior>,
}

impl Debug for Lane {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Lane").field("address", &self.address).finish()
  }
}

impl Lane {
  pub fn new(process: ProcessId, id: LaneId) -> Self {
    Self::new_with_timer(process, id, Arc::new(TokioTimer))
  }

  pub fn new_with_timer(process: ProcessId, id: LaneId, timer: Arc<dyn TimerBehavior>) -> Self {
    Self {
      address: LaneAddress::new(process, id),
      timer,
    }
  }

  pub fn with_network_address(mut self, network: SocketAddr) -> Self {
    self.address = self.address.with_network(network);
    self
  }

  pub fn id(&self) -> LaneId {
    self.address.lane()
  }

  pub fn process(&self) -> ProcessId {
    self.address.process()
  }

  pub fn network_address(&self) -> Option<SocketAddr> {
    self.address.network()
  }

  pub fn address(&self) -> LaneAddress {
    self.address
  }

  pub fn timer(&self) -> &Arc<dyn TimerBehavior> {
    &self.timer
  }
}
