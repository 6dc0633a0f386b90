//! Normalized battery state for a single controller adapter
//!
//! Created fresh per poll, populated by exactly one report parse, consumed
//! by the severity policy, then discarded. Nothing persists across polls.

use std::fmt;

/// Coarse BBU health classification as reported by the vendor tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Optimal,
    Learning,
    Degraded,
    Failed,
    Operational,
    NonOperational,
    /// Any label we do not recognize; the raw text is kept for display.
    Unknown(String),
}

impl LifecycleState {
    /// Classify a raw state label from a vendor report.
    ///
    /// "Non Operational" must be tested before the "Operational" prefix,
    /// otherwise a non-operational pack reads as healthy.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "Optimal" => LifecycleState::Optimal,
            "Learning" => LifecycleState::Learning,
            "Degraded" => LifecycleState::Degraded,
            "Failed" => LifecycleState::Failed,
            other if other.starts_with("Non Operational") => LifecycleState::NonOperational,
            other if other.starts_with("Operational") => LifecycleState::Operational,
            other => LifecycleState::Unknown(other.to_string()),
        }
    }

    /// The label shown to the operator; unknown states keep the vendor text.
    pub fn label(&self) -> &str {
        match self {
            LifecycleState::Optimal => "Optimal",
            LifecycleState::Learning => "Learning",
            LifecycleState::Degraded => "Degraded",
            LifecycleState::Failed => "Failed",
            LifecycleState::Operational => "Operational",
            LifecycleState::NonOperational => "Non Operational",
            LifecycleState::Unknown(raw) => raw,
        }
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        LifecycleState::Unknown(String::new())
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One BBU's reported condition, normalized across vendors.
///
/// Invariants:
/// - `acquisition_failed` true: no other field is meaningful.
/// - `missing` true: only `lifecycle` is meaningful besides the two flags;
///   charge, temperature and alarm fields stay unset.
/// - Numeric fields are fully present (parsed) or fully absent (label not
///   found in the report), never partially populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryState {
    /// The raw status could not be obtained from the tool at all.
    pub acquisition_failed: bool,
    /// The controller reports no physical battery pack installed.
    pub missing: bool,
    pub lifecycle: LifecycleState,
    pub learn_cycle_requested: bool,
    pub replacement_required: bool,
    pub failure_predicted: bool,
    pub over_temperature: bool,
    pub temperature_c: Option<i64>,      // °C
    pub relative_charge_pct: Option<i64>, // %
    pub absolute_charge_pct: Option<i64>, // %
    pub charge_remaining_mah: Option<i64>, // mAh
    pub charge_max_mah: Option<i64>,      // mAh (full charge capacity)
    pub design_capacity_mah: Option<i64>, // mAh
}

impl BatteryState {
    /// State recorded when the tool exited nonzero or reported its own
    /// query failure; the run continues for the remaining adapters.
    pub fn unavailable() -> Self {
        BatteryState {
            acquisition_failed: true,
            ..BatteryState::default()
        }
    }

    /// True when at least one numeric field was parsed; adapters without
    /// any contribute no performance data.
    pub fn has_metrics(&self) -> bool {
        self.temperature_c.is_some()
            || self.relative_charge_pct.is_some()
            || self.absolute_charge_pct.is_some()
            || self.charge_remaining_mah.is_some()
            || self.charge_max_mah.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(LifecycleState::from_label("Optimal"), LifecycleState::Optimal);
        assert_eq!(LifecycleState::from_label("Learning"), LifecycleState::Learning);
        assert_eq!(LifecycleState::from_label("Degraded"), LifecycleState::Degraded);
        assert_eq!(LifecycleState::from_label("Failed"), LifecycleState::Failed);
    }

    #[test]
    fn test_non_operational_not_shadowed_by_operational() {
        // The substring trap: "Non Operational" contains "Operational".
        assert_eq!(
            LifecycleState::from_label("Non Operational"),
            LifecycleState::NonOperational
        );
        assert_eq!(
            LifecycleState::from_label("Operational"),
            LifecycleState::Operational
        );
    }

    #[test]
    fn test_unknown_label_keeps_raw_text() {
        let state = LifecycleState::from_label("Charging");
        assert_eq!(state, LifecycleState::Unknown("Charging".to_string()));
        assert_eq!(state.to_string(), "Charging");
    }

    #[test]
    fn test_label_trimmed() {
        // StorCli's column layout leaves trailing whitespace on the capture.
        assert_eq!(LifecycleState::from_label(" Optimal  "), LifecycleState::Optimal);
    }

    #[test]
    fn test_unavailable_has_no_metrics() {
        let state = BatteryState::unavailable();
        assert!(state.acquisition_failed);
        assert!(!state.has_metrics());
    }
}
