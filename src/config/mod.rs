//! JSON config types for the demo binaries.

pub mod analyze;
pub mod lbp;
