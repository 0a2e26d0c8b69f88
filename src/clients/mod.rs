pub mod account_client;
pub mod friends_client;
pub mod warnings_client;
