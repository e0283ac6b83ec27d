//! Domain models for the patient chart.

mod directory;
mod patient;
mod record;

pub use directory::*;
pub use patient::*;
pub use record::*;
