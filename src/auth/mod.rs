pub mod error;
pub mod session;
pub mod token_store;
