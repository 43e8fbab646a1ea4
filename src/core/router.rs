use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::core::address::{ActorAddress, InstanceId, LaneAddress, LaneId};
use crate::core::dispatch::any_message::AnyMessage;
use crate::core::dispatch::error_code::ErrorCode;
use crate::core::dispatch::lane_queue_registry::{LaneQueueError, LaneQueueRegistry};
use crate::core::dispatch::mailboxes::MailboxRegistryBehavior;
use crate::core::dispatch::message::{CorrelationId, MessagePayload, Request, Response, RoutedMessage};
use crate::core::lane::Lane;
use crate::core::router::pending_call::{CompletionHandle, InFlightCall, PendingCall, PendingCalls};
use crate::core::router::router_config::RouterConfig;
use crate::core::router::router_error::{RouterError, RouterResult};
use crate::core::router::timeout_watcher::{TimeoutWatcher, Watched};
use crate::infrastructure::logging_ref_cell::LoggingRefCell;

pub mod pending_call;
pub mod router_config;
pub mod router_error;
pub mod timeout_watcher;


/// Routes messages from actors on one lane to actors on any lane of the same process.
///
/// A router is owned by its lane and only ever touched from the lane's own turns, so its
/// state lives in plain cells. Messages for the own lane are dispatched inline; messages
/// for another lane go through that lane's inbound queue and are dispatched when that
/// lane's router ticks. Request/response calls are correlated by id and bounded by
/// [`RouterConfig::rpc_timeout`].
pub struct MessageRouter {
  lane: Lane,
  config: RouterConfig,
  queues: LaneQueueRegistry,
  mailboxes: Arc<dyn MailboxRegistryBehavior>,
  correlation_id: Cell<CorrelationId>,
  pending_calls: PendingCalls,
  drain_buffer: LoggingRefCell<Vec<RoutedMessage>>,
}

impl Debug for MessageRouter {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MessageRouter")
      .field("lane", &self.lane)
      .field("config", &self.config)
      .field("pending_calls", &self.pending_calls.len())
      .finish()
  }
}

impl MessageRouter {
  pub fn attach(
    lane: Lane,
    queues: LaneQueueRegistry,
    mailboxes: Arc<dyn MailboxRegistryBehavior>,
  ) -> RouterResult<Self> {
    Self::attach_with_config(lane, queues, mailboxes, RouterConfig::default())
  }

  /// Creates the router of `lane` and registers the lane's inbound queue. A lane has at most
  /// one router, so attaching to a lane whose queue is registered fails.
  pub fn attach_with_config(
    lane: Lane,
    queues: LaneQueueRegistry,
    mailboxes: Arc<dyn MailboxRegistryBehavior>,
    config: RouterConfig,
  ) -> RouterResult<Self> {
    if !queues.register(lane.id(), config.queue_capacity()) {
      log::warn!("attach: lane {} already has a router", lane.address());
      return Err(RouterError::LaneAlreadyAttached { lane: lane.address() });
    }
    log::debug!("attach: lane = {}, config = {:?}", lane.address(), config);
    let drain_buffer = Vec::with_capacity(config.batch_size());
    Ok(Self {
      lane,
      config,
      queues,
      mailboxes,
      correlation_id: Cell::new(CorrelationId::default()),
      pending_calls: PendingCalls::new(),
      drain_buffer: LoggingRefCell::new("drain_buffer", drain_buffer),
    })
  }

  /// Unregisters the lane's inbound queue.
  pub fn detach(self) {
    drop(self)
  }

  pub fn lane(&self) -> &Lane {
    &self.lane
  }

  pub fn config(&self) -> &RouterConfig {
    &self.config
  }

  pub fn pending_call_count(&self) -> usize {
    self.pending_calls.len()
  }

  pub fn next_correlation_id(&self) -> CorrelationId {
    let correlation_id = self.correlation_id.get().next();
    self.correlation_id.set(correlation_id);
    correlation_id
  }

  /// Dispatches up to [`RouterConfig::batch_size`] queued messages in arrival order and
  /// returns how many were dispatched. The rest wait for the next tick.
  pub fn tick(&self) -> usize {
    let mut buffer = self.drain_buffer.take();
    let drained = match self.queues.drain(self.lane.id(), self.config.batch_size(), &mut buffer) {
      Ok(drained) => drained,
      Err(err) => {
        log::warn!("tick: lane = {}, {}", self.lane.address(), err);
        0
      }
    };
    for message in buffer.drain(..) {
      self.handle_message(message);
    }
    self.drain_buffer.replace(buffer);
    drained
  }

  /// Fire-and-forget delivery to `target`.
  pub fn send(&self, target: ActorAddress, payload: MessagePayload) -> RouterResult<()> {
    if target.is_unset() {
      return Err(RouterError::AddressInvalid { payload });
    }
    self.route(target, payload)
  }

  /// Sends `response` back to the lane a request came from. The instance part of the
  /// address is irrelevant: responses are matched by correlation id, never by mailbox.
  pub fn reply(&self, from: LaneAddress, response: Response) -> RouterResult<()> {
    if from.is_unset() {
      return Err(RouterError::AddressInvalid {
        payload: response.into(),
      });
    }
    self.route(from.actor(InstanceId::default()), MessagePayload::Response(response))
  }

  /// Sends `body` as a request to `target` and awaits the correlated response.
  ///
  /// With `strict` set, failure codes in the response surface as errors; otherwise the
  /// response is returned as is. A destination-side timeout is an error either way.
  pub async fn call(&self, target: ActorAddress, body: AnyMessage, strict: bool) -> RouterResult<Response> {
    let correlation_id = self.next_correlation_id();
    self.call_with_correlation_id(target, correlation_id, body, strict).await
  }

  pub async fn call_with_correlation_id(
    &self,
    target: ActorAddress,
    correlation_id: CorrelationId,
    body: AnyMessage,
    strict: bool,
  ) -> RouterResult<Response> {
    let request = Request::new(correlation_id, body);
    if target.is_unset() {
      return Err(RouterError::AddressInvalid { payload: request.into() });
    }
    self.check_process(target)?;

    let (handle, completion) = CompletionHandle::new(correlation_id);
    if !self
      .pending_calls
      .register(PendingCall::new(target, request.clone(), strict, handle))
    {
      return Err(RouterError::DuplicateCorrelationId {
        lane: self.lane.address(),
        correlation_id,
      });
    }
    let mut in_flight = InFlightCall::new(&self.pending_calls, completion);
    let begin = self.lane.timer().now();

    if let Err(err) = self.route(target, MessagePayload::Request(request.clone())) {
      self.pending_calls.take(correlation_id);
      return Err(err);
    }

    let watcher = TimeoutWatcher::new(self.lane.timer().clone(), self.config.rpc_timeout());
    let result = match watcher.watch(&mut in_flight).await {
      Watched::Completed(result) => result,
      Watched::Expired => {
        self.expire(correlation_id);
        (&mut in_flight).await
      }
    };

    let elapsed = self.lane.timer().now().saturating_duration_since(begin);
    if self.config.is_slow_call(elapsed) {
      log::warn!(
        "actor rpc time > {:?}: elapsed = {:?}, target = {}, request = {}",
        self.config.slow_call_threshold(),
        elapsed,
        target,
        request
      );
    }
    result
  }

  fn expire(&self, correlation_id: CorrelationId) {
    if let Some(pending_call) = self.pending_calls.take(correlation_id) {
      log::debug!(
        "rpc timeout: target = {}, request = {}",
        pending_call.target(),
        pending_call.request()
      );
      pending_call.expire();
    }
  }

  fn check_process(&self, target: ActorAddress) -> RouterResult<()> {
    if target.process() != self.lane.process() {
      return Err(RouterError::CrossProcessUnsupported {
        target,
        local_process: self.lane.process(),
      });
    }
    Ok(())
  }

  fn route(&self, target: ActorAddress, payload: MessagePayload) -> RouterResult<()> {
    self.check_process(target)?;
    let message = RoutedMessage::new(self.lane.address(), target, payload);
    if target.lane() == self.lane.id() {
      self.handle_message(message);
      return Ok(());
    }
    self
      .queues
      .push(target.lane(), message)
      .map_err(|err| Self::queue_error(target.lane(), err))
  }

  fn queue_error(lane: LaneId, err: anyhow::Error) -> RouterError {
    match err.downcast_ref::<LaneQueueError>() {
      Some(LaneQueueError::NotRegistered { lane }) => RouterError::LaneNotRegistered { lane: *lane },
      None => RouterError::QueueFailure {
        lane,
        reason: err.to_string(),
      },
    }
  }

  fn handle_message(&self, message: RoutedMessage) {
    let (sender, target, payload) = message.into_parts();
    match payload {
      MessagePayload::Response(response) => self.handle_response(response),
      payload => self.deliver(sender, target, payload),
    }
  }

  fn handle_response(&self, response: Response) {
    let correlation_id = response.correlation_id();
    match self.pending_calls.take(correlation_id) {
      Some(pending_call) => {
        if !pending_call.resolve(response) {
          log::debug!("handle_response: caller of rpc #{} is gone", correlation_id);
        }
      }
      None => log::debug!("handle_response: no pending rpc, discard {}", response),
    }
  }

  fn deliver(&self, sender: LaneAddress, target: ActorAddress, payload: MessagePayload) {
    match self.mailboxes.lookup(target.instance()) {
      Some(mailbox) => mailbox.deliver(sender, payload),
      None => {
        log::warn!(
          "actor not found mailbox: from = {}, current = {}, target = {}, payload = {:?}",
          sender,
          self.lane.address(),
          target,
          payload
        );
        if let MessagePayload::Request(request) = &payload {
          let response = Response::from_request(request, ErrorCode::ACTOR_NOT_FOUND);
          if let Err(err) = self.reply(sender, response) {
            log::warn!("failed to reply actor not found to {}: {}", sender, err);
          }
        }
      }
    }
  }
}

impl Drop for MessageRouter {
  fn drop(&mut self) {
    self.queues.unregister(self.lane.id());
    log::debug!(
      "detach: lane = {}, abandoned rpcs = {}",
      self.lane.address(),
      self.pending_calls.len()
    );
  }
}
