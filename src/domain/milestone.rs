use serde::{Deserialize, Serialize};

/// The four billing checkpoints of a staged sale contract, in contract
/// order: preliminary contract, then the Act 14/15/16 construction
/// certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Preliminary,
    Act14,
    Act15,
    Act16,
}

impl Milestone {
    /// All milestones in canonical order.
    pub const ALL: [Milestone; 4] = [
        Milestone::Preliminary,
        Milestone::Act14,
        Milestone::Act15,
        Milestone::Act16,
    ];

    /// Stable machine key, used in logs and report fields.
    pub fn key(self) -> &'static str {
        match self {
            Milestone::Preliminary => "preliminary",
            Milestone::Act14 => "act14",
            Milestone::Act15 => "act15",
            Milestone::Act16 => "act16",
        }
    }

    /// Canonical human-readable unit stage label written by the stage
    /// cascade.
    pub fn unit_label(self) -> &'static str {
        match self {
            Milestone::Preliminary => "Preliminary contract",
            Milestone::Act14 => "Act 14",
            Milestone::Act15 => "Act 15",
            Milestone::Act16 => "Act 16",
        }
    }

    /// Milestones up to and including `self`, in canonical order.
    pub fn up_to(self) -> &'static [Milestone] {
        const ALL: &[Milestone] = &Milestone::ALL;
        let index = ALL
            .iter()
            .position(|milestone| *milestone == self)
            .unwrap_or(0);
        &ALL[..=index]
    }

    /// Resolve a unit's free-form stage label against the closed vocabulary.
    ///
    /// Recognizes the canonical labels plus the legacy localized spellings
    /// still present in imported data. Anything else is unrecognized.
    pub fn classify_unit_stage(label: &str) -> Option<Milestone> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "preliminary contract" | "предварителен договор" | "при предварителен договор" => {
                Some(Milestone::Preliminary)
            }
            "act 14" | "акт 14" => Some(Milestone::Act14),
            "act 15" | "акт 15" => Some(Milestone::Act15),
            "act 16" | "акт 16" => Some(Milestone::Act16),
            _ => None,
        }
    }

    /// Classify a free-text payment stage label against the milestones.
    ///
    /// Case-insensitive substring match, applied once at the entry/import
    /// boundary; unclassifiable labels belong to no milestone.
    pub fn classify_payment_label(label: &str) -> Option<Milestone> {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        if normalized.contains("предварителен") || normalized.contains("prelim") {
            Some(Milestone::Preliminary)
        } else if normalized.contains("акт 14") || normalized.contains("act 14") {
            Some(Milestone::Act14)
        } else if normalized.contains("акт 15") || normalized.contains("act 15") {
            Some(Milestone::Act15)
        } else if normalized.contains("акт 16") || normalized.contains("act 16") {
            Some(Milestone::Act16)
        } else {
            None
        }
    }

    /// Translate a building-level construction stage into the unit-level
    /// billing milestone. Unknown labels fall back to the preliminary
    /// contract stage; that fallback is documented behavior, not an error.
    pub fn from_construction_stage(label: &str) -> Milestone {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "act14" | "act 14" | "акт 14" => Milestone::Act14,
            "act15" | "act 15" | "акт 15" => Milestone::Act15,
            "act16" | "act 16" | "акт 16" => Milestone::Act16,
            // "open-site" and everything else map to the preliminary stage.
            _ => Milestone::Preliminary,
        }
    }
}
