pub mod address;
pub mod dispatch;
pub mod lane;
pub mod router;
