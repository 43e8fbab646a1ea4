pub mod any_message;
pub mod error_code;
pub mod lane_queue_registry;
pub mod mailbox;
pub mod mailboxes;
pub mod message;
