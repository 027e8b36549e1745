use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::unit::Unit;

/// A property under development. Owns its units exclusively; the unit
/// collection always exists, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: Uuid,
    /// Unique across the portfolio.
    pub name: String,
    /// Free-text status ("active", "paused", ...); the workspace fallback
    /// compares it against the configured active marker.
    pub status: String,
    /// Free-text construction stage from a small closed set
    /// ("open-site", "act14", ...).
    pub stage: Option<String>,
    pub units: Vec<Unit>,
    pub notes: Option<String>,
}

impl Building {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: status.into(),
            stage: None,
            units: Vec::new(),
            notes: None,
        }
    }

    /// Units with a concluded sale contract; the only ones that participate
    /// in arrears and portfolio aggregates.
    pub fn sold_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|unit| unit.sold)
    }
}
