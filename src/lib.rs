//! Lane-local message routing between the actors of one process.
//!
//! Each lane (a single-threaded scheduling unit) owns a [`MessageRouter`]. Messages addressed
//! to an actor on the same lane are dispatched inline; messages addressed to another lane
//! are pushed to that lane's inbound queue in the shared [`LaneQueueRegistry`] and dispatched
//! when that lane's router ticks. Request/response calls are matched by correlation id and
//! bounded by a timeout.

pub mod core;
pub mod infrastructure;

pub use crate::core::address::{ActorAddress, InstanceId, LaneAddress, LaneId, ProcessId};
pub use crate::core::dispatch::any_message::{AnyMessage, Message};
pub use crate::core::dispatch::error_code::ErrorCode;
pub use crate::core::dispatch::lane_queue_registry::LaneQueueRegistry;
pub use crate::core::dispatch::mailbox::MailboxBehavior;
pub use crate::core::dispatch::mailboxes::{MailboxRegistryBehavior, Mailboxes};
pub use crate::core::dispatch::message::{CorrelationId, MessagePayload, Request, Response};
pub use crate::core::lane::Lane;
pub use crate::core::router::router_config::RouterConfig;
pub use crate::core::router::router_error::{RouterError, RouterResult};
pub use crate::core::router::MessageRouter;
