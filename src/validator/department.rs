//! Check 8 (department assignment) — spec §4.3.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::Rulebook;

pub fn check_department_assignment(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    if !rulebook.enforce_department_split() {
        return;
    }

    for resident in residents {
        let stations = rulebook.stations(resident.model);
        let required = rulebook.department_stations(resident.department);
        let forbidden = rulebook.department_stations(resident.department.opposite());

        for key in forbidden {
            if resident.assignments.values().any(|s| s == key) {
                let name = stations.get(key).map(|s| s.display_name.as_str()).unwrap_or(key.as_str());
                report.push(
                    Diagnostic::error(
                        "department_forbidden",
                        format!(
                            "assigned to {name} but belongs to department {}",
                            resident.department.label()
                        ),
                    )
                    .with_resident(resident.name.clone())
                    .with_station(key.clone()),
                );
            }
        }

        for key in required {
            let Some(station) = stations.get(key) else { continue };
            if station.duration_months().unwrap_or(0) == 0 {
                continue;
            }
            if !resident.assignments.values().any(|s| s == key) {
                report.push(
                    Diagnostic::error(
                        "department_missing",
                        format!(
                            "missing required {} for department {}",
                            station.display_name,
                            resident.department.label()
                        ),
                    )
                    .with_resident(resident.name.clone())
                    .with_station(key.clone()),
                );
            }
        }
    }
}
