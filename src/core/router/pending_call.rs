use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::borrow_mut_with_log;
use crate::borrow_with_log;
use crate::core::address::ActorAddress;
use crate::core::dispatch::error_code::ErrorCode;
use crate::core::dispatch::message::{CorrelationId, Request, Response};
use crate::core::router::router_error::{RouterError, RouterResult};
use crate::infrastructure::logging_ref_cell::LoggingRefCell;

/// The write side of a call's result slot. Resolving consumes it, so a call resolves at most once.
#[derive(Debug)]
pub struct CompletionHandle {
  sender: oneshot::Sender<RouterResult<Response>>,
}

impl CompletionHandle {
  pub fn new(correlation_id: CorrelationId) -> (Self, Completion) {
    let (sender, receiver) = oneshot::channel();
    (Self { sender }, Completion { correlation_id, receiver })
  }

  /// Returns false when the awaiting caller has already gone away.
  pub fn resolve(self, outcome: RouterResult<Response>) -> bool {
    self.sender.send(outcome).is_ok()
  }

  pub fn is_abandoned(&self) -> bool {
    self.sender.is_closed()
  }
}

/// The read side of a call's result slot.
#[derive(Debug)]
pub struct Completion {
  correlation_id: CorrelationId,
  receiver: oneshot::Receiver<RouterResult<Response>>,
}

impl Completion {
  pub fn correlation_id(&self) -> CorrelationId {
    self.correlation_id
  }

  fn close(&mut self) {
    self.receiver.close();
  }
}

impl Future for Completion {
  type Output = RouterResult<Response>;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let correlation_id = self.correlation_id;
    Pin::new(&mut self.receiver).poll(cx).map(|result| {
      result.unwrap_or(Err(RouterError::CompletionDropped { correlation_id }))
    })
  }
}

#[derive(Debug)]
pub struct PendingCall {
  target: ActorAddress,
  request: Request,
  strict: bool,
  handle: CompletionHandle,
}

impl PendingCall {
  pub fn new(target: ActorAddress, request: Request, strict: bool, handle: CompletionHandle) -> Self {
    Self {
      target,
      request,
      strict,
      handle,
    }
  }

  pub fn correlation_id(&self) -> CorrelationId {
    self.request.correlation_id()
  }

  pub fn target(&self) -> ActorAddress {
    self.target
  }

  pub fn request(&self) -> &Request {
    &self.request
  }

  pub fn is_strict(&self) -> bool {
    self.strict
  }

  /// Completes the call with the response addressed to it.
  ///
  /// A destination-side timeout always fails the call. Other failure codes fail it only
  /// when the caller asked for strict errors; otherwise the response itself is the result.
  pub fn resolve(self, response: Response) -> bool {
    let outcome = self.outcome_of(response);
    self.handle.resolve(outcome)
  }

  /// Completes the call as timed out on this side.
  pub fn expire(self) -> bool {
    let outcome = if self.strict {
      Err(RouterError::RpcTimeout {
        target: self.target,
        request: self.request.clone(),
      })
    } else {
      Ok(Response::from_request(&self.request, ErrorCode::TIMEOUT))
    };
    self.handle.resolve(outcome)
  }

  fn outcome_of(&self, response: Response) -> RouterResult<Response> {
    let code = response.error();
    if code == ErrorCode::ACTOR_TIMEOUT {
      return Err(RouterError::RemoteTimeout {
        target: self.target,
        request: self.request.clone(),
        response,
      });
    }
    if self.strict && code.is_exception_worthy() {
      if code == ErrorCode::ACTOR_NOT_FOUND {
        return Err(RouterError::ActorNotFound {
          target: self.target,
          request: self.request.clone(),
        });
      }
      return Err(RouterError::RemoteError {
        target: self.target,
        request: self.request.clone(),
        code,
      });
    }
    Ok(response)
  }
}

/// Outstanding calls of one lane, keyed by correlation id. Every removal is a take, so
/// whichever of the response or the timeout gets there first is the only one to resolve.
#[derive(Debug)]
pub struct PendingCalls {
  calls: LoggingRefCell<HashMap<CorrelationId, PendingCall>>,
}

impl Default for PendingCalls {
  fn default() -> Self {
    Self::new()
  }
}

impl PendingCalls {
  pub fn new() -> Self {
    Self {
      calls: LoggingRefCell::new("pending_calls", HashMap::new()),
    }
  }

  /// Returns false, dropping `call`, when its correlation id is already pending.
  pub fn register(&self, call: PendingCall) -> bool {
    let mut calls = borrow_mut_with_log!(self.calls, "register");
    if calls.contains_key(&call.correlation_id()) {
      return false;
    }
    calls.insert(call.correlation_id(), call);
    true
  }

  pub fn take(&self, correlation_id: CorrelationId) -> Option<PendingCall> {
    borrow_mut_with_log!(self.calls, "take").remove(&correlation_id)
  }

  /// Takes the entry only if nobody awaits its result anymore.
  pub fn take_abandoned(&self, correlation_id: CorrelationId) -> Option<PendingCall> {
    let mut calls = borrow_mut_with_log!(self.calls, "take_abandoned");
    match calls.get(&correlation_id) {
      Some(call) if call.handle.is_abandoned() => calls.remove(&correlation_id),
      _ => None,
    }
  }

  pub fn contains(&self, correlation_id: CorrelationId) -> bool {
    borrow_with_log!(self.calls, "contains").contains_key(&correlation_id)
  }

  pub fn len(&self) -> usize {
    borrow_with_log!(self.calls, "len").len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// A caller's view of its registered call. Dropping it before the result arrives
/// withdraws the call from `PendingCalls`.
#[derive(Debug)]
pub struct InFlightCall<'a> {
  pending_calls: &'a PendingCalls,
  completion: Completion,
}

impl<'a> InFlightCall<'a> {
  pub fn new(pending_calls: &'a PendingCalls, completion: Completion) -> Self {
    Self {
      pending_calls,
      completion,
    }
  }

  pub fn correlation_id(&self) -> CorrelationId {
    self.completion.correlation_id()
  }
}

impl Future for InFlightCall<'_> {
  type Output = RouterResult<Response>;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    Pin::new(&mut self.completion).poll(cx)
  }
}

impl Drop for InFlightCall<'_> {
  fn drop(&mut self) {
    self.completion.close();
    if let Some(call) = self.pending_calls.take_abandoned(self.correlation_id()) {
      log::debug!("withdraw abandoned rpc: target = {}, request = {}", call.target(), call.request());
    }
  }
}
