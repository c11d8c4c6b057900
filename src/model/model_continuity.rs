//! Continuity objective term, and the no-split-allowed hard re-expression
//! of it (spec §4.1: "No-split-allowed stations are hard: they re-express
//! the above as a constraint (weight -> infinity)").

use super::model_context::ModelBuilderContext;
use cp_sat::builder::LinearExpr;

const CONTINUITY_PENALTY_WEIGHT: i64 = 10;

/// Builds the continuity objective and applies it with `model.minimize`.
/// Returns the penalty terms in case a caller wants to combine them with
/// other objective components; this crate has exactly one, so it minimizes
/// directly.
pub fn add_continuity_objective(ctx: &mut ModelBuilderContext) {
    let mut penalty_terms: Vec<(i64, cp_sat::builder::BoolVar)> = Vec::new();

    for i in 0..ctx.residents.len() {
        let resident = &ctx.residents[i];
        let horizon = ctx.horizon(i);
        let stations = ctx.rulebook.stations(resident.model).clone();
        let no_split_allowed = ctx.rulebook.no_split_allowed().clone();

        for (key, station) in &stations {
            if station.duration_months().is_none() {
                continue;
            }
            if horizon == 0 {
                continue;
            }

            let hard = no_split_allowed.contains(key);

            for m in 0..horizon - 1 {
                let at_now = ctx.var(i, key, m).clone();
                let at_next = ctx.var(i, key, m + 1).clone();

                // left = at_now AND NOT at_next
                let left = ctx.model.new_bool_var();
                ctx.model
                    .add_le(LinearExpr::from(left.clone()), LinearExpr::from(at_now.clone()));
                ctx.model.add_le(
                    LinearExpr::from(left.clone()),
                    LinearExpr::from(1) - LinearExpr::from(at_next.clone()),
                );
                ctx.model.add_ge(
                    LinearExpr::from(left.clone()),
                    LinearExpr::from(at_now) - LinearExpr::from(at_next),
                );

                for future_month in (m + 2)..horizon {
                    let at_future = ctx.var(i, key, future_month).clone();

                    // returned = left AND at_future
                    let returned = ctx.model.new_bool_var();
                    ctx.model.add_le(
                        LinearExpr::from(returned.clone()),
                        LinearExpr::from(left.clone()),
                    );
                    ctx.model.add_le(
                        LinearExpr::from(returned.clone()),
                        LinearExpr::from(at_future.clone()),
                    );
                    ctx.model.add_ge(
                        LinearExpr::from(returned.clone()),
                        LinearExpr::from(left.clone()) + LinearExpr::from(at_future) - LinearExpr::from(1),
                    );

                    if hard {
                        ctx.model.add_eq(LinearExpr::from(returned), LinearExpr::from(0));
                    } else {
                        penalty_terms.push((CONTINUITY_PENALTY_WEIGHT, returned));
                    }
                }
            }
        }
    }

    if !penalty_terms.is_empty() {
        let objective: LinearExpr = penalty_terms.into_iter().collect();
        ctx.model.minimize(objective);
    }
}
