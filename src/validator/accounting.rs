//! Check 9 (maternity/sick/unpaid accounting) — spec §4.3.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::{Model, Rulebook};

fn itemize_extensions(resident: &Resident, maternity_leave_deduction_limit: u16) -> String {
    let mut parts = Vec::new();

    if resident.maternity_leave_months > maternity_leave_deduction_limit {
        parts.push(format!("{}mo maternity extension", resident.maternity_leave_months - maternity_leave_deduction_limit));
    }

    let sick_extension: u16 =
        resident.sick_leave_months_by_year.values().map(|&count| count.saturating_sub(1)).sum();
    if sick_extension > 0 {
        parts.push(format!("{sick_extension}mo sick leave extension"));
    }

    if resident.unpaid_leave_months > 0 {
        parts.push(format!("{}mo unpaid extension", resident.unpaid_leave_months));
    }

    if parts.is_empty() {
        "no extensions".to_string()
    } else {
        parts.join(" + ")
    }
}

pub fn check_accounting(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let expected_total = resident.expected_total_months(
            rulebook.base_duration(Model::A),
            rulebook.base_duration(Model::B),
            rulebook.maternity_leave_deduction_limit(),
        );
        let actual_total = resident.assignments.len() as u32;

        if actual_total != expected_total {
            let base = resident.base_total_months(rulebook.base_duration(Model::A), rulebook.base_duration(Model::B));
            let extensions = itemize_extensions(resident, rulebook.maternity_leave_deduction_limit());
            report.push(
                Diagnostic::error(
                    "accounting_total_mismatch",
                    format!(
                        "program duration incorrect: expected {expected_total}mo ({base}mo base + {extensions}), found {actual_total}mo"
                    ),
                )
                .with_resident(resident.name.clone()),
            );
        }

        let effective_dept = resident.effective_department_months(
            rulebook.department_station_key(),
            rulebook.maternity_leave_deduction_limit(),
        );
        let required_dept = rulebook.department_base_months() as u32;

        if effective_dept < required_dept {
            report.push(
                Diagnostic::error(
                    "accounting_department_insufficient",
                    format!("department quota insufficient: required {required_dept}mo, effective {effective_dept}mo"),
                )
                .with_resident(resident.name.clone()),
            );
        } else if effective_dept > required_dept {
            report.push(
                Diagnostic::warning(
                    "accounting_department_exceeds",
                    format!("department quota exceeds requirement: {effective_dept}mo effective vs {required_dept}mo required"),
                )
                .with_resident(resident.name.clone()),
            );
        }
    }
}
