//! C1 (exclusivity) and C2 (history lock) — spec §4.1.

use super::model_context::ModelBuilderContext;
use cp_sat::builder::LinearExpr;

/// C1: `for all i, m: sum_s x[i][s][m] = 1`.
pub fn add_exclusivity_constraints(ctx: &mut ModelBuilderContext) {
    for i in 0..ctx.residents.len() {
        let horizon = ctx.horizon(i);
        for m in 0..horizon {
            let mut sum = LinearExpr::from(0);
            for station_vars in ctx.vars[i].values() {
                sum = sum + LinearExpr::from(station_vars[m as usize].clone());
            }
            ctx.model.add_eq(sum, LinearExpr::from(1));
        }
    }
}

/// C2: `for all i and m <= current_month_index_i with historical station h:
/// x[i][h][m] = 1`. A resident with no history (`current_month_index =
/// None`, spec §4.1 edge case) contributes no constraints here.
pub fn add_history_lock_constraints(ctx: &mut ModelBuilderContext) {
    for i in 0..ctx.residents.len() {
        let resident = &ctx.residents[i];
        let Some(current) = resident.current_month_index else { continue };

        for (&month, station) in resident.assignments.range(..=current) {
            if let Some(station_vars) = ctx.vars[i].get(station) {
                let var = station_vars[month as usize].clone();
                ctx.model.add_eq(LinearExpr::from(var), LinearExpr::from(1));
            }
        }
    }
}
