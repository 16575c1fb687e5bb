pub mod fare;
pub mod markers;
pub mod refresh;
pub mod region;
