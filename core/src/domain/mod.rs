pub mod common;
pub mod health;
pub mod notification;
pub mod notification_settings;
pub mod push;
