//! Command and result types for the domain services.

pub mod moods;
