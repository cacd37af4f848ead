//! Presentation state derived from the tracker.

pub mod display;
