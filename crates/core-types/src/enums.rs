use serde::{Deserialize, Serialize};

/// The sign of a year-over-year movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rise,
    Dip,
}
