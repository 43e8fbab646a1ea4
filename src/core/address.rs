use std::fmt;
use std::fmt::Formatter;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(u32);

impl ProcessId {
  pub const fn new(value: u32) -> Self {
    Self(value)
  }

  pub fn value(&self) -> u32 {
    self.0
  }
}

impl fmt::Display for ProcessId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(u32);

impl LaneId {
  pub const fn new(value: u32) -> Self {
    Self(value)
  }

  pub fn value(&self) -> u32 {
    self.0
  }
}

impl fmt::Display for LaneId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
  pub const fn new(value: u64) -> Self {
    Self(value)
  }

  pub fn value(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for InstanceId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Where a lane lives: its process, its identity inside the process and,
/// when known, the network address of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LaneAddress {
  process: ProcessId,
  lane: LaneId,
  network: Option<SocketAddr>,
}

impl LaneAddress {
  pub fn new(process: ProcessId, lane: LaneId) -> Self {
    Self {
      process,
      lane,
      network: None,
    }
  }

  pub fn with_network(mut self, network: SocketAddr) -> Self {
    self.network = Some(network);
    self
  }

  pub fn process(&self) -> ProcessId {
    self.process
  }

  pub fn lane(&self) -> LaneId {
    self.lane
  }

  pub fn network(&self) -> Option<SocketAddr> {
    self.network
  }

  pub fn is_unset(&self) -> bool {
    *self == Self::default()
  }

  pub fn actor(&self, instance: InstanceId) -> ActorAddress {
    ActorAddress::new(*self, instance)
  }
}

impl fmt::Display for LaneAddress {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.network {
      Some(network) => write!(f, "{}:{}@{}", self.process, self.lane, network),
      None => write!(f, "{}:{}", self.process, self.lane),
    }
  }
}

impl From<(ProcessId, LaneId)> for LaneAddress {
  fn from((process, lane): (ProcessId, LaneId)) -> Self {
    Self::new(process, lane)
  }
}

/// A routing destination. The default value is the "no target" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActorAddress {
  lane_address: LaneAddress,
  instance: InstanceId,
}

impl ActorAddress {
  pub fn new(lane_address: LaneAddress, instance: InstanceId) -> Self {
    Self { lane_address, instance }
  }

  pub fn lane_address(&self) -> LaneAddress {
    self.lane_address
  }

  pub fn process(&self) -> ProcessId {
    self.lane_address.process
  }

  pub fn lane(&self) -> LaneId {
    self.lane_address.lane
  }

  pub fn network(&self) -> Option<SocketAddr> {
    self.lane_address.network
  }

  pub fn instance(&self) -> InstanceId {
    self.instance
  }

  pub fn is_unset(&self) -> bool {
    *self == Self::default()
  }
}

impl fmt::Display for ActorAddress {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.lane_address, self.instance)
  }
}

impl From<(LaneAddress, InstanceId)> for ActorAddress {
  fn from((lane_address, instance): (LaneAddress, InstanceId)) -> Self {
    Self::new(lane_address, instance)
  }
}
