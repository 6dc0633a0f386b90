//! Declarative field-label tables for the two vendor report layouts
//!
//! MegaCli and StorCli print the same battery facts with different label
//! anchoring: MegaCli uses colon-separated `Label: value` lines and spaces
//! its units (`95 %`, `22 C`), StorCli prints column-aligned property tables
//! (`Label        value`, `95%`). The two vendors differ ONLY in these
//! tables; extraction itself is shared.

use regex::Regex;
use tracing::debug;

use crate::battery::state::{BatteryState, LifecycleState};
use crate::errors::ParseError;

/// Marker both tools print when they could not query the BBU themselves.
pub const STATUS_FAILED_MARKER: &str = "Get BBU Status Failed";

/// One regex per field; group 1 carries the value.
pub struct FieldLabels {
    pub state: &'static str,
    pub pack_missing: &'static str,
    pub learn_cycle_requested: &'static str,
    pub replacement_required: &'static str,
    pub failure_predicted: &'static str,
    pub over_temperature: &'static str,
    pub temperature: &'static str,
    pub relative_charge: &'static str,
    pub absolute_charge: &'static str,
    pub remaining_capacity: &'static str,
    pub full_charge_capacity: &'static str,
    pub design_capacity: &'static str,
}

pub const MEGACLI_LABELS: FieldLabels = FieldLabels {
    state: r"(?m)^Battery State:\s*(\w+)",
    pack_missing: r"Battery Pack Missing\s*:\s*(\w+)",
    learn_cycle_requested: r"Learn Cycle Requested\s*:\s*(\w+)",
    replacement_required: r"Battery Replacement required\s*:\s*(\w+)",
    failure_predicted: r"Pack is about to fail & should be replaced\s*:\s*(\w+)",
    over_temperature: r"Over Temperature\s*:\s*(\w+)",
    temperature: r"(?m)^Temperature:\s(\d+) C",
    relative_charge: r"Relative State of Charge:\s(\d+) %",
    absolute_charge: r"Absolute State of charge:\s(\d+) %",
    remaining_capacity: r"Remaining Capacity:\s(\d+) mAh",
    full_charge_capacity: r"Full Charge Capacity:\s(\d+) mAh",
    design_capacity: r"Design Capacity:\s(\d+) mAh",
};

pub const STORCLI_LABELS: FieldLabels = FieldLabels {
    state: r"(?m)^Battery State\s+([\w ]+)",
    pack_missing: r"Battery Pack Missing\s+(\w+)",
    learn_cycle_requested: r"Learn Cycle Requested\s+(\w+)",
    replacement_required: r"Battery Replacement required\s+(\w+)",
    failure_predicted: r"Pack is about to fail & should be replaced\s+(\w+)",
    over_temperature: r"Over Temperature\s+(\w+)",
    temperature: r"(?m)^Temperature\s+(\d+) C",
    relative_charge: r"Relative State of Charge\s+(\d+)%",
    absolute_charge: r"Absolute State of charge\s+(\d+)%",
    remaining_capacity: r"Remaining Capacity\s+(\d+) mAh",
    full_charge_capacity: r"Full Charge Capacity\s+(\d+) mAh",
    design_capacity: r"Design Capacity\s+(\d+) mAh",
};

/// Vendor boolean fields are true for anything but the literal "No".
/// "Yes", "Unknown" and an empty value all count as set.
pub fn truthy(value: &str) -> bool {
    value != "No"
}

fn find_value<'t>(pattern: &'static str, text: &'t str) -> Option<&'t str> {
    Regex::new(pattern)
        .expect("built-in label pattern")
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn require_flag(pattern: &'static str, text: &str, field: &'static str) -> Result<bool, ParseError> {
    let value = find_value(pattern, text).ok_or(ParseError::MissingField(field))?;
    let flag = truthy(value);
    debug!("{}: {}", field, flag);
    Ok(flag)
}

fn find_number(pattern: &'static str, text: &str, field: &'static str) -> Option<i64> {
    let value = find_value(pattern, text).and_then(|v| v.parse().ok());
    if let Some(v) = value {
        debug!("{}: {}", field, v);
    }
    value
}

/// Parse one raw battery report into the normalized model.
///
/// A nonzero tool exit or the tool's own failure marker yields an
/// `acquisition_failed` state, not an error; sibling adapters still get
/// polled. A missing required field in otherwise-successful output is a
/// malformed report and surfaces as `ParseError`.
pub fn parse_battery(
    labels: &FieldLabels,
    raw: &str,
    exit_code: i32,
) -> Result<BatteryState, ParseError> {
    if exit_code != 0 || raw.contains(STATUS_FAILED_MARKER) {
        debug!("getting battery status failed (exit code {})", exit_code);
        return Ok(BatteryState::unavailable());
    }

    let state_label =
        find_value(labels.state, raw).ok_or(ParseError::MissingField("Battery State"))?;
    let lifecycle = LifecycleState::from_label(state_label);
    debug!("Battery State: {}", lifecycle);

    let missing = require_flag(labels.pack_missing, raw, "Battery Pack Missing")?;

    let mut battery = BatteryState {
        lifecycle,
        missing,
        ..BatteryState::default()
    };

    if battery.missing {
        // No pack installed: there is no charge or temperature to read.
        return Ok(battery);
    }

    battery.learn_cycle_requested =
        require_flag(labels.learn_cycle_requested, raw, "Learn Cycle Requested")?;
    battery.replacement_required = require_flag(
        labels.replacement_required,
        raw,
        "Battery Replacement required",
    )?;
    battery.failure_predicted = require_flag(
        labels.failure_predicted,
        raw,
        "Pack is about to fail & should be replaced",
    )?;
    battery.over_temperature = require_flag(labels.over_temperature, raw, "Over Temperature")?;

    battery.temperature_c = find_number(labels.temperature, raw, "Temperature");
    battery.relative_charge_pct =
        find_number(labels.relative_charge, raw, "Relative State of Charge");
    battery.absolute_charge_pct =
        find_number(labels.absolute_charge, raw, "Absolute State of charge");
    battery.charge_remaining_mah =
        find_number(labels.remaining_capacity, raw, "Remaining Capacity");
    battery.charge_max_mah =
        find_number(labels.full_charge_capacity, raw, "Full Charge Capacity");
    battery.design_capacity_mah = find_number(labels.design_capacity, raw, "Design Capacity");

    Ok(battery)
}
