//! Check 5 (capacity) — spec §4.3.

use super::diagnostic::{Diagnostic, ValidationReport};
use crate::resident::Resident;
use crate::rulebook::{Model, Rulebook};
use crate::station::{StationCapacity, StationKey, StationMax};
use std::collections::BTreeMap;

fn all_station_capacities(rulebook: &Rulebook) -> BTreeMap<StationKey, (StationCapacity, String)> {
    let mut capacities = BTreeMap::new();
    for model in [Model::A, Model::B] {
        for (key, station) in rulebook.stations(model) {
            capacities
                .entry(key.clone())
                .or_insert_with(|| (station.capacity, station.display_name.clone()));
        }
    }
    capacities
}

/// For every occupied `(m, s)`: count below `min` is a warning, above
/// `max` is an error.
pub fn check_capacity(residents: &[Resident], rulebook: &Rulebook, report: &mut ValidationReport) {
    let capacities = all_station_capacities(rulebook);
    let max_horizon = residents
        .iter()
        .map(|r| {
            r.expected_total_months(
                rulebook.base_duration(Model::A),
                rulebook.base_duration(Model::B),
                rulebook.maternity_leave_deduction_limit(),
            )
        })
        .max()
        .unwrap_or(0);

    for m in 0..max_horizon {
        let mut counts: BTreeMap<StationKey, u32> = BTreeMap::new();
        for resident in residents {
            if let Some(key) = resident.assignments.get(&m) {
                *counts.entry(key.clone()).or_insert(0) += 1;
            }
        }

        for (key, count) in &counts {
            let Some((capacity, display_name)) = capacities.get(key) else { continue };

            if *count < capacity.min {
                report.push(
                    Diagnostic::warning(
                        "capacity_under",
                        format!("month {m}: {display_name} has {count} residents (min: {})", capacity.min),
                    )
                    .with_month(m)
                    .with_station(key.clone()),
                );
            } else if let StationMax::Bounded(max) = capacity.max {
                if *count > max {
                    report.push(
                        Diagnostic::error(
                            "capacity_over",
                            format!("month {m}: {display_name} has {count} residents (max: {max})"),
                        )
                        .with_month(m)
                        .with_station(key.clone()),
                    );
                }
            }
        }
    }
}
