pub mod focus;
pub mod markers;
