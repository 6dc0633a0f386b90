//! Controller backends
//!
//! One backend per vendor tool. A backend knows how to discover the number
//! of controller adapters, how to ask for one adapter's battery report, and
//! how to fold the per-adapter results into the combined plugin output.

pub mod labels;

use std::path::{Path, PathBuf};

use nix::unistd::AccessFlags;
use regex::Regex;
use tracing::{debug, info};

use crate::battery::policy::{evaluate, PolicyConfig, Severity};
use crate::battery::state::BatteryState;
use crate::config::ToolPaths;
use crate::errors::{ParseError, ProbeError};
use crate::exec;
use labels::{FieldLabels, MEGACLI_LABELS, STORCLI_LABELS};

/// The two supported vendor tools, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    MegaCli,
    StorCli,
}

impl Vendor {
    pub fn name(self) -> &'static str {
        match self {
            Vendor::MegaCli => "MegaCli",
            Vendor::StorCli => "StorCli",
        }
    }

    fn labels(self) -> &'static FieldLabels {
        match self {
            Vendor::MegaCli => &MEGACLI_LABELS,
            Vendor::StorCli => &STORCLI_LABELS,
        }
    }

    /// Arguments of the adapter-discovery invocation.
    pub fn discovery_args(self) -> Vec<String> {
        match self {
            Vendor::MegaCli => vec!["-AdpAllInfo".to_string(), "-aALL".to_string()],
            Vendor::StorCli => vec!["show".to_string(), "ctrlcount".to_string()],
        }
    }

    /// Arguments of the battery-report invocation for one adapter.
    pub fn battery_args(self, adapter: usize) -> Vec<String> {
        match self {
            Vendor::MegaCli => vec!["-AdpBbuCmd".to_string(), format!("-a{}", adapter)],
            Vendor::StorCli => vec![format!("/c{}/bbu", adapter), "show".to_string(), "all".to_string()],
        }
    }

    /// Extract the adapter count from the discovery output.
    ///
    /// MegaCli lists one "Adapter #N" header per controller; StorCli prints
    /// a single "Controller Count = N" line. A StorCli output without that
    /// line is indistinguishable from garbage and is run-fatal.
    pub fn parse_adapter_count(self, output: &str) -> Result<usize, ParseError> {
        match self {
            Vendor::MegaCli => Ok(Regex::new(r"(?m)^Adapter #\d+")
                .expect("built-in discovery pattern")
                .find_iter(output)
                .count()),
            Vendor::StorCli => Regex::new(r"(?m)^Controller Count = (\d+)")
                .expect("built-in discovery pattern")
                .captures(output)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .ok_or(ParseError::MissingControllerCount),
        }
    }

    /// Parse one raw battery report with this vendor's label table.
    pub fn parse_battery(self, raw: &str, exit_code: i32) -> Result<BatteryState, ParseError> {
        labels::parse_battery(self.labels(), raw, exit_code)
    }
}

/// A located vendor tool bound to its parsing variant.
#[derive(Debug, Clone)]
pub struct Backend {
    vendor: Vendor,
    tool: PathBuf,
}

fn is_executable(path: &Path) -> bool {
    nix::unistd::access(path, AccessFlags::X_OK).is_ok()
}

impl Backend {
    pub fn new(vendor: Vendor, tool: PathBuf) -> Self {
        Backend { vendor, tool }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }

    /// Probe the configured install paths; MegaCli candidates first, then
    /// StorCli. Returns None when no tool is installed.
    pub fn locate(paths: &ToolPaths) -> Option<Backend> {
        for candidate in &paths.megacli {
            if is_executable(candidate) {
                return Some(Backend::new(Vendor::MegaCli, candidate.clone()));
            }
        }
        for candidate in &paths.storcli {
            if is_executable(candidate) {
                return Some(Backend::new(Vendor::StorCli, candidate.clone()));
            }
        }
        None
    }

    /// One discovery invocation; how many controller adapters exist.
    pub fn adapter_count(&self) -> Result<usize, ProbeError> {
        let out = exec::run_tool(&self.tool, &self.vendor.discovery_args())?;
        let count = self.vendor.parse_adapter_count(&out.stdout)?;
        debug!("found {} adapter(s)", count);
        Ok(count)
    }

    /// Poll every adapter strictly in sequence, one tool invocation each.
    ///
    /// Acquisition failures and malformed reports are captured into the
    /// adapter's reading and never abort the remaining adapters; only a
    /// failure to launch the tool is fatal.
    pub fn collect(&self) -> Result<Poll, ProbeError> {
        let count = self.adapter_count()?;
        info!(
            "polling {} adapter(s) via {} at {}",
            count,
            self.vendor.name(),
            self.tool.display()
        );

        let mut readings = Vec::with_capacity(count);
        for adapter in 0..count {
            debug!("checking battery for adapter {}", adapter);
            let out = exec::run_tool(&self.tool, &self.vendor.battery_args(adapter))?;
            readings.push(self.vendor.parse_battery(&out.stdout, out.exit_code));
        }
        Ok(Poll { readings })
    }
}

/// One adapter's outcome: a parsed state, or a malformed-report error.
pub type Reading = Result<BatteryState, ParseError>;

/// The per-run collection result, consumed by the aggregation below and
/// discarded afterwards.
#[derive(Debug)]
pub struct Poll {
    pub readings: Vec<Reading>,
}

impl Poll {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Evaluate every adapter and combine: max severity, ", "-joined
    /// messages, "Ctrl N: " prefixes only when more than one adapter exists.
    pub fn aggregate_status(&self, cfg: &PolicyConfig) -> (Severity, String) {
        let multi = self.readings.len() > 1;
        let mut combined = Severity::Ok;
        let mut parts = Vec::with_capacity(self.readings.len());

        for (adapter, reading) in self.readings.iter().enumerate() {
            let (severity, message) = match reading {
                Ok(battery) => evaluate(battery, cfg),
                // Malformed report: distinct from the acquisition-failure text.
                Err(err) => (Severity::Critical, format!("Unknown - {}", err)),
            };
            combined = combined.max(severity);
            if multi {
                parts.push(format!("Ctrl {}: {}", adapter, message));
            } else {
                parts.push(message);
            }
        }

        (combined, parts.join(", "))
    }

    /// Nagios perfdata tokens, space-joined across adapters. Adapters with
    /// no parsed numeric field contribute nothing, not even a placeholder.
    pub fn aggregate_statistics(&self) -> String {
        let multi = self.readings.len() > 1;
        let mut tokens: Vec<String> = Vec::new();

        for (adapter, reading) in self.readings.iter().enumerate() {
            let battery = match reading {
                Ok(b) if b.has_metrics() => b,
                _ => continue,
            };
            let prefix = if multi {
                format!("Ctrl {}: ", adapter)
            } else {
                String::new()
            };

            if let Some(v) = battery.relative_charge_pct {
                tokens.push(format!("'{}rel charge'={}%", prefix, v));
            }
            if let Some(v) = battery.absolute_charge_pct {
                tokens.push(format!("'{}abs charge'={}%", prefix, v));
            }
            if let Some(v) = battery.charge_remaining_mah {
                let mut token = format!("'{}charge (mAh)'={}", prefix, v);
                if let Some(max) = battery.charge_max_mah {
                    token.push_str(&format!(";;;;{}", max));
                }
                tokens.push(token);
            }
            if let Some(v) = battery.charge_max_mah {
                let mut token = format!("'{}charge max (mAh)'={}", prefix, v);
                if let Some(design) = battery.design_capacity_mah {
                    token.push_str(&format!(";;;;{}", design));
                }
                tokens.push(token);
            }
            if let Some(v) = battery.temperature_c {
                tokens.push(format!("'{}temperature (C)'={}", prefix, v));
            }
        }

        tokens.join(" ")
    }
}
