//! The public API of Roster.

pub mod ask;
