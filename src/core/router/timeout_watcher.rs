use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{select, Either};

use crate::core::lane::timer::TimerBehavior;

#[derive(Debug, Clone, PartialEq)]
pub enum Watched<T> {
  Completed(T),
  Expired,
}

/// Races a completion against a timer of the lane's scheduler.
///
/// The completion is polled first, so one that is ready at the instant the timer fires
/// still wins. The timer is dropped, and with it cancelled, as soon as the race is decided.
#[derive(Debug, Clone)]
pub struct TimeoutWatcher {
  timer: Arc<dyn TimerBehavior>,
  timeout: Duration,
}

impl TimeoutWatcher {
  pub fn new(timer: Arc<dyn TimerBehavior>, timeout: Duration) -> Self {
    Self { timer, timeout }
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  pub async fn watch<F>(&self, completion: &mut F) -> Watched<F::Output>
  where
    F: Future + Unpin, {
    let expiry = self.timer.wait(self.timeout);
    match select(completion, expiry).await {
      Either::Left((output, _)) => Watched::Completed(output),
      Either::Right(((), _)) => Watched::Expired,
    }
  }
}
