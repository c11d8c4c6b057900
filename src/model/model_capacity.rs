//! C4 (capacity per month) — spec §4.1.

use super::model_context::ModelBuilderContext;
use crate::rulebook::{Department, Model};
use crate::station::{DepartmentScope, StationCapacity, StationKey, StationMax};
use cp_sat::builder::LinearExpr;
use std::collections::BTreeMap;

/// C4: `for every month m and every station key s shared across residents
/// present at m: min_interns(s) <= sum_i x[i][s][m] <= max_interns(s)`.
/// `Unbounded` caps omit the upper bound (spec §4.1: "`infinity` caps omit
/// the upper bound"). "Present" excludes residents for whom C3 already
/// forces this station to zero for the wrong department — a department-B
/// station isn't really present for an all-department-A cohort, matching
/// the department-applicability test `add_duration_constraints` uses.
pub fn add_capacity_constraints(ctx: &mut ModelBuilderContext) {
    let capacities = all_station_capacities(ctx);
    let max_horizon = ctx.horizons.iter().copied().max().unwrap_or(0);

    for m in 0..max_horizon {
        for (key, capacity) in &capacities {
            let mut terms = Vec::new();
            for i in 0..ctx.residents.len() {
                if m >= ctx.horizon(i) {
                    continue;
                }
                let resident = &ctx.residents[i];
                let Some(station) = ctx.rulebook.station(resident.model, key) else { continue };
                let applicable = match station.department {
                    DepartmentScope::Shared => true,
                    DepartmentScope::AOnly => resident.department == Department::A,
                    DepartmentScope::BOnly => resident.department == Department::B,
                };
                if !applicable {
                    continue;
                }
                if let Some(station_vars) = ctx.vars[i].get(key) {
                    terms.push(station_vars[m as usize].clone());
                }
            }

            if terms.is_empty() {
                continue;
            }

            let mut sum = LinearExpr::from(0);
            for v in terms {
                sum = sum + LinearExpr::from(v);
            }

            ctx.model.add_ge(sum.clone(), LinearExpr::from(capacity.min as i64));
            if let StationMax::Bounded(max) = capacity.max {
                ctx.model.add_le(sum, LinearExpr::from(max as i64));
            }
        }
    }
}

fn all_station_capacities(ctx: &ModelBuilderContext) -> BTreeMap<StationKey, StationCapacity> {
    let mut capacities = BTreeMap::new();
    for model in [Model::A, Model::B] {
        for (key, station) in ctx.rulebook.stations(model) {
            capacities.entry(key.clone()).or_insert(station.capacity);
        }
    }
    capacities
}
