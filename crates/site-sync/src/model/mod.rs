//! Domain records and their payloads.

pub mod project;
pub mod stats;
pub mod supplier;

pub use project::*;
pub use stats::*;
pub use supplier::*;
