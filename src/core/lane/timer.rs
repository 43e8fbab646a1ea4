use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

/// The delayed-wake primitive a lane's scheduler provides.
#[async_trait]
pub trait TimerBehavior: Debug + Send + Sync {
  fn now(&self) -> Instant;

  /// Suspends the current turn for `duration`, then resumes it.
  async fn wait(&self, duration: Duration);
}

#[derive(Debug, Clone, Default)]
pub struct TokioTimer;

#[async_trait]
impl TimerBehavior for TokioTimer {
  fn now(&self) -> Instant {
    Instant::now()
  }

  async fn wait(&self, duration: Duration) {
    tokio::time::sleep(duration).await
  }
}
