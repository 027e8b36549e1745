use thiserror::Error;

/// Failures surfaced by the engine to its callers.
///
/// The engine performs no retries and no rollback; callers own user-facing
/// messaging and transactional behavior.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An operation that requires an existing record was given an unknown id.
    #[error("{0}")]
    NotFound(String),

    /// Input failed validation before reaching the domain.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness invariant was violated (e.g. duplicate unit number
    /// within a building).
    #[error("{0}")]
    Conflict(String),

    /// The backing store failed to load or persist a graph.
    #[error("{0}")]
    Dependency(String),
}

impl CoreError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id} not found."))
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn not_found_mentions_entity_and_id() {
        let err = CoreError::not_found("building", "b-17");
        assert_eq!(err.to_string(), "building b-17 not found.");
    }
}
