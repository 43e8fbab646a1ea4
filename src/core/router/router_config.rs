use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};

use crate::infrastructure::queue::QueueSize;

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_millis(40_000);
pub const DEFAULT_SLOW_CALL_THRESHOLD: Duration = Duration::from_millis(200);

const ENV_PREFIX: &str = "LANE_ROUTER";
const KEY_BATCH_SIZE: &str = "router.batch_size";
const KEY_RPC_TIMEOUT_MS: &str = "router.rpc_timeout_ms";
const KEY_SLOW_CALL_THRESHOLD_MS: &str = "router.slow_call_threshold_ms";
/// 0 leaves the inbound queue unbounded.
const KEY_QUEUE_CAPACITY: &str = "router.queue_capacity";

#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
  batch_size: usize,
  rpc_timeout: Duration,
  slow_call_threshold: Duration,
  queue_capacity: QueueSize,
}

impl Default for RouterConfig {
  fn default() -> Self {
    Self {
      batch_size: DEFAULT_BATCH_SIZE,
      rpc_timeout: DEFAULT_RPC_TIMEOUT,
      slow_call_threshold: DEFAULT_SLOW_CALL_THRESHOLD,
      queue_capacity: QueueSize::Limitless,
    }
  }
}

impl RouterConfig {
  pub fn new(batch_size: usize, rpc_timeout: Duration, slow_call_threshold: Duration) -> Self {
    Self {
      batch_size,
      rpc_timeout,
      slow_call_threshold,
      queue_capacity: QueueSize::Limitless,
    }
  }

  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  pub fn with_rpc_timeout(mut self, rpc_timeout: Duration) -> Self {
    self.rpc_timeout = rpc_timeout;
    self
  }

  pub fn with_slow_call_threshold(mut self, slow_call_threshold: Duration) -> Self {
    self.slow_call_threshold = slow_call_threshold;
    self
  }

  /// Bounds the lane's inbound queue; a send to a full lane fails instead of queueing.
  pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
    self.queue_capacity = QueueSize::Limited(capacity);
    self
  }

  /// Upper bound of messages one tick drains from the lane's inbound queue.
  pub fn batch_size(&self) -> usize {
    self.batch_size
  }

  pub fn rpc_timeout(&self) -> Duration {
    self.rpc_timeout
  }

  pub fn slow_call_threshold(&self) -> Duration {
    self.slow_call_threshold
  }

  pub fn queue_capacity(&self) -> QueueSize {
    self.queue_capacity
  }

  pub fn is_slow_call(&self, elapsed: Duration) -> bool {
    elapsed > self.slow_call_threshold
  }

  /// Defaults overridden by environment variables such as `LANE_ROUTER__ROUTER__BATCH_SIZE`.
  pub fn load() -> Result<Self, ConfigError> {
    let config = Self::builder()?
      .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
      .build()?;
    Self::from_config(&config)
  }

  /// Defaults overridden by a TOML document with a `[router]` table.
  pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
    let config = Self::builder()?
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()?;
    Self::from_config(&config)
  }

  pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
    let batch_size = config.get::<u64>(KEY_BATCH_SIZE)?;
    let rpc_timeout_ms = config.get::<u64>(KEY_RPC_TIMEOUT_MS)?;
    let slow_call_threshold_ms = config.get::<u64>(KEY_SLOW_CALL_THRESHOLD_MS)?;
    let queue_capacity = config.get::<u64>(KEY_QUEUE_CAPACITY)?;
    if batch_size == 0 {
      return Err(ConfigError::Message(format!("{} must be greater than 0", KEY_BATCH_SIZE)));
    }
    if rpc_timeout_ms == 0 {
      return Err(ConfigError::Message(format!("{} must be greater than 0", KEY_RPC_TIMEOUT_MS)));
    }
    let batch_size = usize::try_from(batch_size).map_err(|e| ConfigError::Message(e.to_string()))?;
    let queue_capacity = usize::try_from(queue_capacity).map_err(|e| ConfigError::Message(e.to_string()))?;
    let router_config = Self::new(
      batch_size,
      Duration::from_millis(rpc_timeout_ms),
      Duration::from_millis(slow_call_threshold_ms),
    );
    Ok(match queue_capacity {
      0 => router_config,
      capacity => router_config.with_queue_capacity(capacity),
    })
  }

  fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
      .set_default(KEY_BATCH_SIZE, DEFAULT_BATCH_SIZE as i64)?
      .set_default(KEY_RPC_TIMEOUT_MS, DEFAULT_RPC_TIMEOUT.as_millis() as i64)?
      .set_default(KEY_SLOW_CALL_THRESHOLD_MS, DEFAULT_SLOW_CALL_THRESHOLD.as_millis() as i64)?
      .set_default(KEY_QUEUE_CAPACITY, 0i64)
  }
}
