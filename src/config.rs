use std::env;

/// Engine configuration, read once from the environment by the embedding
/// process and passed to the components that need it.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Localized Building status the workspace fallback policy prefers
    /// (deployments label it "active", "активна", ...).
    pub active_status_marker: String,
    /// When enabled, payment-plan inputs with milestone due-dates out of
    /// canonical order are rejected at the boundary. Stored plans are
    /// never re-validated.
    pub strict_plan_chronology: bool,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self {
            active_status_marker: env_or("ACTIVE_STATUS_MARKER", "active"),
            strict_plan_chronology: env_parse_bool_or("STRICT_PLAN_CHRONOLOGY", false),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            active_status_marker: "active".to_string(),
            strict_plan_chronology: false,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse_bool_or(key: &str, default: bool) -> bool {
    match env_opt(key).as_deref().map(str::to_ascii_lowercase) {
        Some(value) if value == "1" || value == "true" || value == "yes" || value == "on" => true,
        Some(value) if value == "0" || value == "false" || value == "no" || value == "off" => false,
        Some(_) => default,
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;

    #[test]
    fn defaults_are_permissive() {
        let config = CoreConfig::default();
        assert_eq!(config.active_status_marker, "active");
        assert!(!config.strict_plan_chronology);
    }
}
