use std::fmt;
use std::fmt::Formatter;

use crate::core::address::{ActorAddress, LaneAddress};
use crate::core::dispatch::any_message::{AnyMessage, Message};
use crate::core::dispatch::error_code::ErrorCode;
use crate::infrastructure::queue::Element;

/// Pairs a request with its response. Meaningful only to the router that issued the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId(u32);

impl CorrelationId {
  pub const fn new(value: u32) -> Self {
    Self(value)
  }

  pub fn value(&self) -> u32 {
    self.0
  }

  pub(crate) fn next(self) -> Self {
    Self(self.0.wrapping_add(1))
  }
}

impl fmt::Display for CorrelationId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
  correlation_id: CorrelationId,
  body: AnyMessage,
}

impl Request {
  pub fn new(correlation_id: CorrelationId, body: AnyMessage) -> Self {
    Self { correlation_id, body }
  }

  pub fn correlation_id(&self) -> CorrelationId {
    self.correlation_id
  }

  pub fn body(&self) -> &AnyMessage {
    &self.body
  }
}

impl fmt::Display for Request {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "Request(#{}, {:?})", self.correlation_id, self.body)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
  correlation_id: CorrelationId,
  error: ErrorCode,
  body: Option<AnyMessage>,
}

impl Response {
  pub fn new(correlation_id: CorrelationId, error: ErrorCode, body: Option<AnyMessage>) -> Self {
    Self {
      correlation_id,
      error,
      body,
    }
  }

  /// A successful response to `request` carrying `body`.
  pub fn of_success<T: Message>(request: &Request, body: T) -> Self {
    Self::new(request.correlation_id, ErrorCode::SUCCESS, Some(AnyMessage::new(body)))
  }

  /// An empty response to `request` carrying `error`.
  pub fn from_request(request: &Request, error: ErrorCode) -> Self {
    Self::new(request.correlation_id, error, None)
  }

  pub fn correlation_id(&self) -> CorrelationId {
    self.correlation_id
  }

  pub fn error(&self) -> ErrorCode {
    self.error
  }

  pub fn body(&self) -> Option<&AnyMessage> {
    self.body.as_ref()
  }

  pub fn is_success(&self) -> bool {
    self.error.is_success()
  }
}

impl fmt::Display for Response {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.body {
      Some(body) => write!(f, "Response(#{}, {}, {:?})", self.correlation_id, self.error, body),
      None => write!(f, "Response(#{}, {})", self.correlation_id, self.error),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
  Notification(AnyMessage),
  Request(Request),
  Response(Response),
}

impl MessagePayload {
  pub fn of_notification<T: Message>(msg: T) -> Self {
    MessagePayload::Notification(AnyMessage::new(msg))
  }

  pub fn correlation_id(&self) -> Option<CorrelationId> {
    match self {
      MessagePayload::Notification(_) => None,
      MessagePayload::Request(request) => Some(request.correlation_id()),
      MessagePayload::Response(response) => Some(response.correlation_id()),
    }
  }
}

impl From<Request> for MessagePayload {
  fn from(request: Request) -> Self {
    MessagePayload::Request(request)
  }
}

impl From<Response> for MessagePayload {
  fn from(response: Response) -> Self {
    MessagePayload::Response(response)
  }
}

impl From<AnyMessage> for MessagePayload {
  fn from(msg: AnyMessage) -> Self {
    MessagePayload::Notification(msg)
  }
}

/// One item of a lane's inbound queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedMessage {
  sender: LaneAddress,
  target: ActorAddress,
  payload: MessagePayload,
}

impl Element for RoutedMessage {}

impl RoutedMessage {
  pub fn new(sender: LaneAddress, target: ActorAddress, payload: MessagePayload) -> Self {
    Self {
      sender,
      target,
      payload,
    }
  }

  pub fn sender(&self) -> LaneAddress {
    self.sender
  }

  pub fn target(&self) -> ActorAddress {
    self.target
  }

  pub fn payload(&self) -> &MessagePayload {
    &self.payload
  }

  pub fn into_parts(self) -> (LaneAddress, ActorAddress, MessagePayload) {
    (self.sender, self.target, self.payload)
  }
}
