pub mod health;
pub mod internal;
pub mod notifications;
pub mod push;
pub mod server;
pub mod settings;
