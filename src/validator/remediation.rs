//! Optional, env-gated remediation hint (spec §4.3 supplement), grounded
//! on `validator.py`'s `get_ai_suggestions`/`_setup_ai`. The original
//! degrades silently when `GOOGLE_API_KEY` or the `genai` package is
//! absent; this crate carries the same degrade-silently shape but never
//! calls out to a network service (out of scope per spec.md §1's
//! chat-assistant non-goal) — it synthesizes a short local summary of
//! the report's distinct error codes instead.

use super::diagnostic::ValidationReport;

/// Name of the environment variable that opts into remediation hints
/// (spec §6: "the validator may consult a credential in the environment
/// to request optional natural-language remediation hints").
const REMEDIATION_HINT_ENV_VAR: &str = "GOOGLE_API_KEY";

/// Deliberately decoupled from `validate` (which stays pure and total).
/// Returns `None` whenever the environment variable is unset, without
/// affecting the validation result itself.
pub fn remediation_hint(report: &ValidationReport) -> Option<String> {
    if std::env::var(REMEDIATION_HINT_ENV_VAR).is_err() {
        return None;
    }
    if report.is_valid() {
        return Some("schedule is valid; no remediation needed".to_string());
    }

    let mut codes: Vec<&str> = report.errors.iter().map(|d| d.code).collect();
    codes.sort_unstable();
    codes.dedup();

    Some(format!(
        "{} error(s) across {} distinct check(s): {}. Review the earliest-numbered check first.",
        report.errors.len(),
        codes.len(),
        codes.join(", ")
    ))
}
