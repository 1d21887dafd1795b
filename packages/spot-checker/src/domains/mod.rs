pub mod availability;
pub mod notification;
