//! Check 3 (immediate precedence) and check 7 (stage-A prerequisites) —
//! spec §4.3. Both compare min/max assigned months across a pair of
//! stations, so they share a file the way the teacher groups related
//! constraint checks.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::Rulebook;
use crate::station::StationKey;

fn months_at(resident: &Resident, key: &StationKey) -> Vec<u32> {
    resident.assignments.iter().filter(|(_, s)| *s == key).map(|(&m, _)| m).collect()
}

/// Check 3: for each immediate-precedence pair `(a,b)`, if a resident has
/// assignments to both, `min_m(b) == max_m(a) + 1`.
pub fn check_precedence(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let stations = rulebook.stations(resident.model);

        for (before, after) in rulebook.precedence_pairs() {
            if !stations.contains_key(before) || !stations.contains_key(after) {
                continue;
            }

            let before_months = months_at(resident, before);
            let after_months = months_at(resident, after);
            if before_months.is_empty() || after_months.is_empty() {
                continue;
            }

            let last_before = *before_months.iter().max().unwrap();
            let first_after = *after_months.iter().min().unwrap();

            if first_after != last_before + 1 {
                let before_name = &stations[before].display_name;
                let after_name = &stations[after].display_name;
                report.push(
                    Diagnostic::error(
                        "precedence_violation",
                        format!("{before_name} must immediately precede {after_name}"),
                    )
                    .with_resident(resident.name.clone()),
                );
            }
        }
    }
}

/// Check 7: `before_stage_a` stations must finish strictly before the
/// first stage-A month; `after_stage_a` stations must start strictly
/// after the last stage-A month; `prefer_after_stage_a` violations of the
/// same shape are warnings, not errors.
pub fn check_prerequisites(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let stations = rulebook.stations(resident.model);
        let stage_a_months = months_at(resident, rulebook.stage_a_key());
        if stage_a_months.is_empty() {
            continue;
        }

        let first_stage_a = *stage_a_months.iter().min().unwrap();
        let last_stage_a = *stage_a_months.iter().max().unwrap();

        for key in rulebook.before_stage_a() {
            let months = months_at(resident, key);
            if let Some(&last) = months.iter().max() {
                if last >= first_stage_a {
                    let name = stations.get(key).map(|s| s.display_name.as_str()).unwrap_or(key.as_str());
                    report.push(
                        Diagnostic::error("prerequisite_before_stage_a", format!("{name} must be completed before Stage A"))
                            .with_resident(resident.name.clone())
                            .with_station(key.clone()),
                    );
                }
            }
        }

        for key in rulebook.after_stage_a() {
            let months = months_at(resident, key);
            if let Some(&first) = months.iter().min() {
                if first <= last_stage_a {
                    let name = stations.get(key).map(|s| s.display_name.as_str()).unwrap_or(key.as_str());
                    report.push(
                        Diagnostic::error("prerequisite_after_stage_a", format!("{name} must be after Stage A"))
                            .with_resident(resident.name.clone())
                            .with_station(key.clone()),
                    );
                }
            }
        }

        for key in rulebook.prefer_after_stage_a() {
            let months = months_at(resident, key);
            if let Some(&first) = months.iter().min() {
                if first <= last_stage_a {
                    let name = stations.get(key).map(|s| s.display_name.as_str()).unwrap_or(key.as_str());
                    report.push(
                        Diagnostic::warning("prefer_after_stage_a", format!("{name} is preferably done after Stage A"))
                            .with_resident(resident.name.clone())
                            .with_station(key.clone()),
                    );
                }
            }
        }
    }
}
