pub mod locate_hazard;
