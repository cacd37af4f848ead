//! Geographic helpers.

pub mod timezone;

pub use timezone::determine_timezone_from_coordinates;
