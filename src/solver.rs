//! Solver driver (spec §2 component 4, §4.2): invokes the CP-SAT backend
//! with a wall-clock budget, interprets status, extracts assignments; on
//! infeasibility retries with relaxation profile R1.

use crate::error::ConfigError;
use crate::model::build_constraint_model;
use crate::resident::Resident;
use crate::rulebook::{RelaxationProfile, Rulebook};
use crate::station::StationKey;
use cp_sat::proto::{CpSolverStatus, SatParameters};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Timeout,
}

/// Outcome of one `solve` call (spec §4.2). Both infeasibility and timeout
/// are non-exceptional: they are returned here as data, never as an
/// `Err` (spec §7).
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    pub wall_time: Duration,
    /// Set when this solution came from a relaxed re-attempt
    /// (`solve_with_relaxation`), naming the profile used.
    pub relaxation: Option<RelaxationProfile>,
}

impl Solution {
    pub fn is_feasible(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Rejects a resident whose existing assignments reference a station key
/// absent from their model's catalog (spec §9: "the core rejects unknown
/// keys with a configuration error").
fn validate_residents(rulebook: &Rulebook, residents: &[Resident]) -> Result<(), ConfigError> {
    for resident in residents {
        let stations = rulebook.stations(resident.model);
        for station in resident.assignments.values() {
            if !stations.contains_key(station) {
                return Err(ConfigError::UnknownStation {
                    key: station.clone(),
                    model: resident.model.label(),
                });
            }
        }
    }
    Ok(())
}

/// Solves once against `rulebook` with a wall-clock budget, and on
/// success overwrites each resident's non-locked assignments in place.
/// Locked history (`m <= current_month_index`) is preserved on every exit
/// path, including infeasibility and timeout (spec §4.2, §7: "the
/// previous (locked-history-only) state of residents is preserved on
/// failure").
#[tracing::instrument(skip(residents, rulebook), fields(residents = residents.len(), budget_seconds))]
pub fn solve(
    residents: &mut [Resident],
    rulebook: &Rulebook,
    budget_seconds: f64,
) -> Result<Solution, ConfigError> {
    rulebook.validate()?;
    validate_residents(rulebook, residents)?;

    tracing::debug!("building constraint model");
    let mut ctx = build_constraint_model(rulebook, residents);

    let mut params = SatParameters::default();
    params.max_time_in_seconds = Some(budget_seconds);

    tracing::debug!("solving");
    let started = Instant::now();
    let response = ctx.model.solve_with_parameters(&params);
    let wall_time = started.elapsed();

    let status = match response.status() {
        CpSolverStatus::Optimal => SolveStatus::Optimal,
        CpSolverStatus::Feasible => SolveStatus::Feasible,
        CpSolverStatus::Infeasible => SolveStatus::Infeasible,
        _ => SolveStatus::Timeout,
    };

    tracing::info!(?status, wall_time_secs = wall_time.as_secs_f64(), "solve finished");

    if matches!(status, SolveStatus::Optimal | SolveStatus::Feasible) {
        for (i, resident) in residents.iter_mut().enumerate() {
            let horizon = ctx.horizons[i];
            let mut new_assignments: std::collections::BTreeMap<u32, StationKey> =
                std::collections::BTreeMap::new();

            for m in 0..horizon {
                for (station, month_vars) in &ctx.vars[i] {
                    if month_vars[m as usize].solution_value(&response) {
                        new_assignments.insert(m, station.clone());
                        break;
                    }
                }
            }

            resident.assignments = new_assignments;
        }
    }

    Ok(Solution { status, wall_time, relaxation: None })
}

/// Tries `solve` once; on a non-feasible outcome, retries with relaxation
/// profile R1 (capacity bounds dropped) and returns the second result,
/// tagged with the profile used (spec §4.2).
#[tracing::instrument(skip(residents, rulebook), fields(residents = residents.len(), budget_seconds))]
pub fn solve_with_relaxation(
    residents: &mut [Resident],
    rulebook: &Rulebook,
    budget_seconds: f64,
) -> Result<Solution, ConfigError> {
    let first = solve(residents, rulebook, budget_seconds)?;
    if first.is_feasible() {
        return Ok(first);
    }

    tracing::warn!(status = ?first.status, "full constraint set infeasible, retrying with relaxation R1");
    let relaxed_rulebook = rulebook.relaxed(RelaxationProfile::R1);
    let mut second = solve(residents, &relaxed_rulebook, budget_seconds)?;
    second.relaxation = Some(RelaxationProfile::R1);
    Ok(second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::Resident;
    use crate::rulebook::{Department, Model, ProgramConfiguration};
    use chrono::NaiveDate;

    #[test]
    fn solve_rejects_unknown_station_in_history() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let mut resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        resident.current_month_index = Some(0);
        resident.assignments.insert(0, StationKey::new("not_a_real_station"));

        let mut residents = vec![resident];
        let err = solve(&mut residents, &rulebook, 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStation { .. }));
    }
}
