//! Check 1 (completeness) and check 2 (durations) — spec §4.3.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::{Department, Rulebook};
use crate::station::DepartmentScope;
use std::collections::BTreeMap;

/// Check 1: `|assignments_i| == expected_total_months_i`.
pub fn check_completeness(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let expected = resident.expected_total_months(
            rulebook.base_duration(crate::rulebook::Model::A),
            rulebook.base_duration(crate::rulebook::Model::B),
            rulebook.maternity_leave_deduction_limit(),
        );
        let assigned = resident.assignments.len() as u32;

        if assigned < expected {
            report.push(
                Diagnostic::error(
                    "completeness_under",
                    format!("only {assigned}/{expected} months assigned"),
                )
                .with_resident(resident.name.clone()),
            );
        } else if assigned > expected {
            report.push(
                Diagnostic::warning(
                    "completeness_over",
                    format!("{assigned} months assigned (expected {expected})"),
                )
                .with_resident(resident.name.clone()),
            );
        }
    }
}

/// Check 2: for each non-zero-duration, department-applicable station the
/// assigned count equals `duration_months`; assignment to a wrong-department
/// station is always an error, regardless of count.
pub fn check_durations(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let stations = rulebook.stations(resident.model);
        let mut counts: BTreeMap<_, u32> = BTreeMap::new();
        for station in resident.assignments.values() {
            *counts.entry(station.clone()).or_insert(0) += 1;
        }

        for (key, station) in stations {
            let Some(duration) = station.duration_months() else { continue };
            if duration == 0 {
                continue;
            }

            let actual = counts.get(key).copied().unwrap_or(0);
            let applicable = match station.department {
                DepartmentScope::Shared => true,
                DepartmentScope::AOnly => resident.department == Department::A,
                DepartmentScope::BOnly => resident.department == Department::B,
            };

            if !applicable {
                if actual > 0 {
                    report.push(
                        Diagnostic::error(
                            "duration_wrong_department",
                            format!(
                                "assigned to {} but belongs to department {}",
                                station.display_name,
                                resident.department.label()
                            ),
                        )
                        .with_resident(resident.name.clone())
                        .with_station(key.clone()),
                    );
                }
                continue;
            }

            if actual != duration as u32 {
                report.push(
                    Diagnostic::error(
                        "duration_mismatch",
                        format!("{} has {actual} months (expected {duration})", station.display_name),
                    )
                    .with_resident(resident.name.clone())
                    .with_station(key.clone()),
                );
            }
        }
    }
}
