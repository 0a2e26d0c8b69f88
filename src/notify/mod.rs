pub mod dedup;
pub mod proximity_notifier;
