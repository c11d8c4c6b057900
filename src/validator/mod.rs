//! Schedule validator (spec §2 component 5, §4.3): a stateless, total
//! function over any schedule — solver-produced or hand-edited — that
//! never fails, only accumulates diagnostics.

mod accounting;
mod capacity;
mod completeness;
mod continuity;
mod department;
mod diagnostic;
mod history_lock;
mod ordering;
mod remediation;
mod stage;

pub use diagnostic::{Diagnostic, Severity, ValidationReport};
pub use remediation::remediation_hint;

use crate::resident::Resident;
use crate::rulebook::Rulebook;
use chrono::NaiveDate;

/// Runs all ten checks independently of the solver. `now`, when given,
/// additionally runs check 10 (history lock).
#[tracing::instrument(skip(residents, rulebook), fields(residents = residents.len()))]
pub fn validate(residents: &[Resident], rulebook: &Rulebook, now: Option<NaiveDate>) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.push(Diagnostic::info("validation_started", format!("validating schedules for {} residents", residents.len())));

    completeness::check_completeness(residents, rulebook, &mut report);
    completeness::check_durations(residents, rulebook, &mut report);
    ordering::check_precedence(residents, rulebook, &mut report);
    stage::check_stage_timing(residents, rulebook, &mut report);
    capacity::check_capacity(residents, rulebook, &mut report);
    continuity::check_continuity(residents, rulebook, &mut report);
    ordering::check_prerequisites(residents, rulebook, &mut report);
    department::check_department_assignment(residents, rulebook, &mut report);
    accounting::check_accounting(residents, rulebook, &mut report);

    if let Some(now) = now {
        history_lock::check_history_lock(residents, now, &mut report);
    }

    tracing::info!(errors = report.errors.len(), warnings = report.warnings.len(), "validation finished");

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rulebook::{Department, Model, ProgramConfiguration};
    use chrono::Datelike;

    #[test]
    fn empty_history_reports_completeness_error_only() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        let report = validate(&[resident], &rulebook, None);
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|d| d.code == "completeness_under"));
    }

    #[test]
    fn stage_a_month_field_is_plausible() {
        // sanity: calendar_month never panics across a full base horizon
        let r = Resident::new("X", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Model::A, Department::A);
        assert!(r.month_date(71).year() >= 2024);
    }
}
