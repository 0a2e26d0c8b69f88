pub mod coordinates;
pub mod flood_class;
pub mod flood_watch;
pub mod friend;
pub mod hazard;
pub mod special_warning;
pub mod user;
