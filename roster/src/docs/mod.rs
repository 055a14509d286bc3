//! Documentation for Roster that doesn't belong to any one crate.

pub mod api;
pub mod overview;
pub mod testing;
