use thiserror::Error;

use crate::core::address::{ActorAddress, LaneAddress, LaneId, ProcessId};
use crate::core::dispatch::error_code::ErrorCode;
use crate::core::dispatch::message::{CorrelationId, MessagePayload, Request, Response};

pub type RouterResult<A> = Result<A, RouterError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
  #[error("actor address is unset: {payload:?}")]
  AddressInvalid { payload: MessagePayload },
  #[error("actor inner process diff: target {target}, local process {local_process}")]
  CrossProcessUnsupported {
    target: ActorAddress,
    local_process: ProcessId,
  },
  #[error("actor not found: target {target}, request {request}")]
  ActorNotFound { target: ActorAddress, request: Request },
  #[error("actor sender timeout: target {target}, request {request}")]
  RpcTimeout { target: ActorAddress, request: Request },
  #[error("actor rpc timed out on the destination, check for a deadlock or a missing reply: target {target}, request {request}, response {response}")]
  RemoteTimeout {
    target: ActorAddress,
    request: Request,
    response: Response,
  },
  #[error("rpc error: target {target}, request {request}, error {code}")]
  RemoteError {
    target: ActorAddress,
    request: Request,
    code: ErrorCode,
  },
  #[error("correlation id {correlation_id} is already pending on lane {lane}")]
  DuplicateCorrelationId {
    lane: LaneAddress,
    correlation_id: CorrelationId,
  },
  #[error("lane {lane} already has a router attached")]
  LaneAlreadyAttached { lane: LaneAddress },
  #[error("lane {lane} has no registered inbound queue")]
  LaneNotRegistered { lane: LaneId },
  #[error("failed to enqueue for lane {lane}: {reason}")]
  QueueFailure { lane: LaneId, reason: String },
  #[error("rpc #{correlation_id} was dropped before it resolved")]
  CompletionDropped { correlation_id: CorrelationId },
}

impl RouterError {
  /// The error code a caller would have seen in a response, if this error stands for one.
  pub fn error_code(&self) -> Option<ErrorCode> {
    match self {
      RouterError::ActorNotFound { .. } => Some(ErrorCode::ACTOR_NOT_FOUND),
      RouterError::RpcTimeout { .. } => Some(ErrorCode::TIMEOUT),
      RouterError::RemoteTimeout { response, .. } => Some(response.error()),
      RouterError::RemoteError { code, .. } => Some(*code),
      _ => None,
    }
  }
}
