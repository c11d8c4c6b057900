//! C3 (required duration) — spec §4.1.

use super::model_context::ModelBuilderContext;
use crate::rulebook::Department;
use crate::station::{DepartmentScope, StationKind};
use cp_sat::builder::LinearExpr;

/// C3: for every non-zero-duration, department-applicable station, the
/// assigned count equals `duration_months`; department-filtered stations
/// get `= 0` for the wrong department. Elastic and Stage stations carry no
/// duration constraint here (spec §4.1: "the extra months must be filled
/// with elastic stations").
pub fn add_duration_constraints(ctx: &mut ModelBuilderContext) {
    for i in 0..ctx.residents.len() {
        let resident = &ctx.residents[i];
        let horizon = ctx.horizon(i);
        let stations = ctx.rulebook.stations(resident.model).clone();

        for (key, station) in &stations {
            let Some(duration) = station.duration_months() else { continue };
            if matches!(station.kind, StationKind::Stage { .. }) {
                continue;
            }

            let station_vars = &ctx.vars[i][key];
            let mut sum = LinearExpr::from(0);
            for m in 0..horizon as usize {
                sum = sum + LinearExpr::from(station_vars[m].clone());
            }

            let applicable = match station.department {
                DepartmentScope::Shared => true,
                DepartmentScope::AOnly => resident.department == Department::A,
                DepartmentScope::BOnly => resident.department == Department::B,
            };

            if applicable {
                ctx.model.add_eq(sum, LinearExpr::from(duration as i64));
            } else {
                ctx.model.add_eq(sum, LinearExpr::from(0));
            }
        }
    }
}
