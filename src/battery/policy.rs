//! Severity policy
//!
//! Maps one normalized `BatteryState` to a monitoring severity and a
//! human-readable message. Pure and deterministic: no I/O, no ambient
//! options, the configuration is passed in explicitly.

use crate::battery::state::{BatteryState, LifecycleState};

/// Fixed message for an adapter whose status could not be obtained.
pub const ACQUISITION_FAILED_MESSAGE: &str = "Unknown - could not get battery state";

/// Nagios-style monitoring outcome, combined across adapters via max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
}

impl Severity {
    /// Process exit status expected by the monitoring caller.
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy knobs threaded in from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyConfig {
    /// Treat a Degraded pack as OK while a learn cycle is requested;
    /// a learn cycle deliberately discharges the pack.
    pub learn_cycle_degraded_ok: bool,
}

/// Evaluate one battery. Severity only ever escalates within a single
/// evaluation; the message starts as the lifecycle label and collects
/// annotations.
pub fn evaluate(battery: &BatteryState, cfg: &PolicyConfig) -> (Severity, String) {
    if battery.acquisition_failed {
        return (Severity::Critical, ACQUISITION_FAILED_MESSAGE.to_string());
    }

    let mut severity = match battery.lifecycle {
        LifecycleState::Optimal | LifecycleState::Learning | LifecycleState::Operational => {
            Severity::Ok
        }
        LifecycleState::Degraded => {
            if battery.learn_cycle_requested && cfg.learn_cycle_degraded_ok {
                Severity::Ok
            } else {
                Severity::Warning
            }
        }
        LifecycleState::Failed | LifecycleState::NonOperational => Severity::Critical,
        LifecycleState::Unknown(_) => Severity::Warning,
    };
    let mut message = battery.lifecycle.label().to_string();

    if battery.replacement_required {
        // A replacement order supersedes diagnosis; no further annotations.
        severity = Severity::Critical;
        message.push_str(" - battery replacement required");
    } else {
        if battery.learn_cycle_requested {
            message.push_str(" - battery learn cycle requested");
        }
        if battery.failure_predicted {
            severity = severity.max(Severity::Warning);
            message.push_str(" - battery failure predicted");
        }
        // Temperature rises during an active learn cycle; not alarming then.
        if battery.over_temperature && !battery.learn_cycle_requested {
            severity = severity.max(Severity::Warning);
            message.push_str(" - battery over temperature");
            if let Some(temp) = battery.temperature_c {
                message.push_str(&format!(" ({} C)", temp));
            }
        }
    }

    (severity, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery(lifecycle: LifecycleState) -> BatteryState {
        BatteryState {
            lifecycle,
            ..BatteryState::default()
        }
    }

    #[test]
    fn test_severity_ordering_and_exit_codes() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(Severity::Ok.exit_code(), 0);
        assert_eq!(Severity::Warning.exit_code(), 1);
        assert_eq!(Severity::Critical.exit_code(), 2);
    }

    #[test]
    fn test_acquisition_failure_is_critical_regardless_of_fields() {
        let mut state = BatteryState::unavailable();
        // Fields left over from a bogus parse must not matter.
        state.lifecycle = LifecycleState::Optimal;
        state.replacement_required = true;
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Critical);
        assert_eq!(message, "Unknown - could not get battery state");
    }

    #[test]
    fn test_optimal_no_flags() {
        let (severity, message) = evaluate(
            &battery(LifecycleState::Optimal),
            &PolicyConfig::default(),
        );
        assert_eq!((severity, message.as_str()), (Severity::Ok, "Optimal"));
    }

    #[test]
    fn test_missing_pack_evaluates_without_charge_fields() {
        let state = BatteryState {
            missing: true,
            lifecycle: LifecycleState::Optimal,
            ..BatteryState::default()
        };
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Ok);
        assert_eq!(message, "Optimal");
    }

    #[test]
    fn test_degraded_warns_by_default() {
        let (severity, _) = evaluate(
            &battery(LifecycleState::Degraded),
            &PolicyConfig::default(),
        );
        assert_eq!(severity, Severity::Warning);
    }

    #[test]
    fn test_degraded_during_requested_learn_cycle_ok_when_configured() {
        let state = BatteryState {
            lifecycle: LifecycleState::Degraded,
            learn_cycle_requested: true,
            ..BatteryState::default()
        };
        let cfg = PolicyConfig {
            learn_cycle_degraded_ok: true,
        };
        let (severity, message) = evaluate(&state, &cfg);
        assert_eq!(severity, Severity::Ok);
        assert_eq!(message, "Degraded - battery learn cycle requested");

        // Without the knob the same battery warns.
        let (severity, _) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Warning);
    }

    #[test]
    fn test_failed_with_replacement_required() {
        let state = BatteryState {
            lifecycle: LifecycleState::Failed,
            replacement_required: true,
            ..BatteryState::default()
        };
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Critical);
        assert_eq!(message, "Failed - battery replacement required");
    }

    #[test]
    fn test_non_operational_is_critical() {
        let (severity, _) = evaluate(
            &battery(LifecycleState::NonOperational),
            &PolicyConfig::default(),
        );
        assert_eq!(severity, Severity::Critical);
    }

    #[test]
    fn test_unknown_state_warns_and_shows_raw_label() {
        let (severity, message) = evaluate(
            &battery(LifecycleState::Unknown("Charging".to_string())),
            &PolicyConfig::default(),
        );
        assert_eq!(severity, Severity::Warning);
        assert_eq!(message, "Charging");
    }

    #[test]
    fn test_replacement_required_excludes_other_annotations() {
        let state = BatteryState {
            lifecycle: LifecycleState::Optimal,
            replacement_required: true,
            failure_predicted: true,
            over_temperature: true,
            temperature_c: Some(61),
            ..BatteryState::default()
        };
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Critical);
        assert_eq!(message, "Optimal - battery replacement required");
        assert!(!message.contains("failure predicted"));
        assert!(!message.contains("over temperature"));
    }

    #[test]
    fn test_learn_cycle_suppresses_over_temperature() {
        let state = BatteryState {
            lifecycle: LifecycleState::Optimal,
            learn_cycle_requested: true,
            over_temperature: true,
            temperature_c: Some(58),
            ..BatteryState::default()
        };
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Ok);
        assert!(!message.contains("over temperature"));
        assert_eq!(message, "Optimal - battery learn cycle requested");
    }

    #[test]
    fn test_over_temperature_warns_and_appends_reading() {
        let state = BatteryState {
            lifecycle: LifecycleState::Optimal,
            over_temperature: true,
            temperature_c: Some(58),
            ..BatteryState::default()
        };
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(severity, Severity::Warning);
        assert_eq!(message, "Optimal - battery over temperature (58 C)");
    }

    #[test]
    fn test_over_temperature_without_reading() {
        let state = BatteryState {
            lifecycle: LifecycleState::Optimal,
            over_temperature: true,
            ..BatteryState::default()
        };
        let (_, message) = evaluate(&state, &PolicyConfig::default());
        assert_eq!(message, "Optimal - battery over temperature");
    }

    #[test]
    fn test_failure_predicted_escalates_but_never_downgrades() {
        let state = BatteryState {
            lifecycle: LifecycleState::Failed,
            failure_predicted: true,
            ..BatteryState::default()
        };
        let (severity, message) = evaluate(&state, &PolicyConfig::default());
        // Base CRITICAL from Failed must survive the WARNING-level annotation.
        assert_eq!(severity, Severity::Critical);
        assert_eq!(message, "Failed - battery failure predicted");
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let state = BatteryState {
            lifecycle: LifecycleState::Degraded,
            learn_cycle_requested: true,
            failure_predicted: true,
            ..BatteryState::default()
        };
        let cfg = PolicyConfig::default();
        assert_eq!(evaluate(&state, &cfg), evaluate(&state, &cfg));
    }
}
