#[cfg(test)]
pub(crate) mod canned_server;
pub mod client;
pub mod error;
pub mod markers;
pub mod notifications;
pub mod user;
pub mod warnings;
