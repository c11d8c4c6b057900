//! Check 6 (continuity / split-run analysis) — spec §4.3.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::Rulebook;
use crate::station::StationKind;

/// Groups sorted, ascending month indices into consecutive runs and
/// returns each run's length, e.g. `[0,1,2,3,5,6] -> [4,2]`.
fn run_lengths(months: &[u32]) -> Vec<usize> {
    let mut segments = Vec::new();
    let mut current = 1usize;

    for window in months.windows(2) {
        if window[1] == window[0] + 1 {
            current += 1;
        } else {
            segments.push(current);
            current = 1;
        }
    }
    segments.push(current);
    segments
}

pub fn check_continuity(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    for resident in residents {
        let stations = rulebook.stations(resident.model);

        for (key, station) in stations {
            let Some(duration) = station.duration_months() else { continue };
            if duration == 0 {
                continue;
            }

            let mut months: Vec<u32> =
                resident.assignments.iter().filter(|(_, s)| *s == key).map(|(&m, _)| m).collect();
            if months.is_empty() {
                continue;
            }
            months.sort_unstable();

            let segments = run_lengths(&months);
            if segments.len() <= 1 {
                continue;
            }

            if rulebook.no_split_allowed().contains(key) {
                report.push(
                    Diagnostic::error(
                        "continuity_split_error",
                        format!("{} is split (must be continuous); segments {:?}", station.display_name, segments),
                    )
                    .with_resident(resident.name.clone())
                    .with_station(key.clone()),
                );
                continue;
            }

            match &station.kind {
                StationKind::Splittable { split_config, .. } => {
                    let matches_preferred =
                        split_config.is_some_and(|(a, b)| segments == [a as usize, b as usize]);
                    if matches_preferred {
                        report.push(
                            Diagnostic::warning(
                                "continuity_split_allowed",
                                format!("{} is split {:?} (allowed pattern)", station.display_name, segments),
                            )
                            .with_resident(resident.name.clone())
                            .with_station(key.clone()),
                        );
                    } else {
                        report.push(
                            Diagnostic::warning(
                                "continuity_split_nonpreferred",
                                format!(
                                    "{} is split {:?} (not the preferred pattern {:?})",
                                    station.display_name, segments, split_config
                                ),
                            )
                            .with_resident(resident.name.clone())
                            .with_station(key.clone()),
                        );
                    }
                }
                _ => {
                    report.push(
                        Diagnostic::error(
                            "continuity_split_error",
                            format!("{} is split (must be consecutive); segments {:?}", station.display_name, segments),
                        )
                        .with_resident(resident.name.clone())
                        .with_station(key.clone()),
                    );
                }
            }
        }
    }
}
