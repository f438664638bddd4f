//! # Core Types
//!
//! The data model shared by every analysis crate: the immutable [`Panel`] of
//! country x year observations, its validation errors, and a few formatting helpers
//! used when turning results into text.

pub mod enums;
pub mod error;
pub mod format;
pub mod panel;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Direction;
pub use error::PanelError;
pub use panel::{CountrySeries, Panel, YearChange};
pub use structs::{Observation, YearRange};
