//! Middlewares specific to Roster.

mod metrics;

pub use self::metrics::Metrics;
