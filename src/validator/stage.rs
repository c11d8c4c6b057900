//! Check 4 (stage calendar and windows) — spec §4.3.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::Rulebook;
use crate::station::StageWindow;

pub fn check_stage_timing(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let stations = rulebook.stations(resident.model);

        for (key, allowed_calendar_months) in
            [(rulebook.stage_a_key(), rulebook.stage_a_calendar_months()), (rulebook.stage_b_key(), rulebook.stage_b_calendar_months())]
        {
            let Some(station) = stations.get(key) else { continue };
            let Some(window) = station.kind.stage_window() else { continue };

            for (&m, assigned_key) in &resident.assignments {
                if assigned_key != key {
                    continue;
                }

                let calendar_month = resident.calendar_month(m);
                if !allowed_calendar_months.contains(&calendar_month) {
                    report.push(
                        Diagnostic::error(
                            "stage_calendar",
                            format!("{} must fall in an allowed calendar month (found month {calendar_month})", station.display_name),
                        )
                        .with_resident(resident.name.clone())
                        .with_month(m)
                        .with_station(key.clone()),
                    );
                }

                let in_window = match window {
                    StageWindow::FromStart { min_months, max_months } => {
                        let m = m as i64;
                        m >= min_months && m <= max_months
                    }
                    StageWindow::FromEnd { min_months, max_months } => {
                        let expected_total = resident.expected_total_months(
                            rulebook.base_duration(crate::rulebook::Model::A),
                            rulebook.base_duration(crate::rulebook::Model::B),
                            rulebook.maternity_leave_deduction_limit(),
                        ) as i64;
                        let remaining = expected_total - m as i64;
                        remaining >= min_months && remaining <= max_months
                    }
                };

                if !in_window {
                    report.push(
                        Diagnostic::error(
                            "stage_window",
                            format!("{} at month {m} falls outside its allowed timing window", station.display_name),
                        )
                        .with_resident(resident.name.clone())
                        .with_month(m)
                        .with_station(key.clone()),
                    );
                }
            }
        }
    }
}
