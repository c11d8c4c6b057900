//! Check 10 (history lock) — spec §4.3. Only runs when `now` is supplied.
//!
//! The original (`validator.py::_validate_past_locked`) detects past
//! months but has nothing to diff them against — it is a deliberate stub
//! ("In production, you'd compare against saved original state"). This
//! crate implements the part that is actually checkable without a second
//! baseline: every month whose calendar date has already passed must be
//! present in the resident's assignment map at all.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use chrono::NaiveDate;

pub fn check_history_lock(residents: &[Resident], now: NaiveDate, report: &mut ValidationReport) {
    for resident in residents {
        let Some(current) = resident.current_month_index else { continue };

        for m in 0..=current {
            if resident.month_date(m) > now {
                continue;
            }
            if !resident.assignments.contains_key(&m) {
                report.push(
                    Diagnostic::error(
                        "history_lock_missing",
                        format!("month {m} is in the past but has no recorded assignment"),
                    )
                    .with_resident(resident.name.clone())
                    .with_month(m),
                );
            }
        }
    }
}
