pub mod throttle;
pub mod tracker;
