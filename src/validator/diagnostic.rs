//! Diagnostic shape shared by every check (spec §4.3: "Each diagnostic is
//! tagged `{severity, resident?, month?, station?, code, human_message}`").

use crate::station::StationKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One finding from a validation check. `code` is a stable string (spec
/// §6: "Backward compatibility is required: codes are stable strings"),
/// never renamed once shipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub resident: Option<String>,
    pub month: Option<u32>,
    pub station: Option<StationKey>,
    pub code: &'static str,
    pub human_message: String,
}

impl Diagnostic {
    pub fn error(code: &'static str, human_message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, resident: None, month: None, station: None, code, human_message: human_message.into() }
    }

    pub fn warning(code: &'static str, human_message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, resident: None, month: None, station: None, code, human_message: human_message.into() }
    }

    pub fn info(code: &'static str, human_message: impl Into<String>) -> Self {
        Self { severity: Severity::Info, resident: None, month: None, station: None, code, human_message: human_message.into() }
    }

    pub fn with_resident(mut self, name: impl Into<String>) -> Self {
        self.resident = Some(name.into());
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_station(mut self, station: StationKey) -> Self {
        self.station = Some(station);
        self
    }
}

/// Accumulated findings from one `validate` call (spec §4.3, §7: "errors
/// in one resident do not abort validation of the others; the report
/// accumulates").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub info: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
            Severity::Info => self.info.push(diagnostic),
        }
    }

    /// JSON egress (spec §6: "Validation report. JSON-shaped list of
    /// diagnostics ... codes are stable strings").
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("ValidationReport fields are all Serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_json_round_trips_through_errors_array() {
        let mut report = ValidationReport::default();
        report.push(Diagnostic::error("duration_mismatch", "ivf off by one").with_month(3));

        let value = report.to_json();
        assert_eq!(value["errors"][0]["code"], "duration_mismatch");
        assert_eq!(value["errors"][0]["month"], 3);
        assert!(value["warnings"].as_array().unwrap().is_empty());
    }
}
