pub mod driver;
pub mod location;
