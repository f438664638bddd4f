//! # Movement Analyzer
//!
//! Finds each country's most significant year-over-year rises and dips and annotates them with
//! context from a static event knowledge base.
//!
//! The annotations are heuristic. A matching event is background for a movement, never a
//! claim that it caused it.
//!
//! ## Public API
//!
//! - `ExtremeMovementDetector`: ranks changes per country.
//! - `ContextualAnnotator`: resolves reasons against a `KnowledgeBase`.
//! - `explain` / `render_explanations`: display lines for presentation.

pub mod annotator;
pub mod detector;
pub mod error;
pub mod explain;
pub mod knowledge;

pub use annotator::{ContextualAnnotator, ExplanationEntry};
pub use detector::{CountryMovements, ExtremeMovementDetector, MovementRecord};
pub use error::AnalyzerError;
pub use explain::{explain, render_explanations, render_line};
pub use knowledge::{ContextRule, KnowledgeBase};
