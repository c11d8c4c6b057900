//! C5 (immediate precedence) — spec §4.1.
//!
//! Reified indicator encoded with the AND-via-linear-inequalities idiom the
//! teacher uses for option/assignment booleans (`model_geneds.rs`):
//! `v <= a`, `v <= 1 - b`, `v >= a - b` encodes `v := a AND NOT b` exactly.

use super::model_context::ModelBuilderContext;
use cp_sat::builder::LinearExpr;

/// C5: for each ordered pair `(before, after)` in the rulebook, for each
/// resident with both stations in its model and each `m < H_i - 1`: an
/// indicator `last_before[i,m]` is true iff resident i is at `before` in
/// month `m` and not in month `m+1`; when true it forces `x[after][m+1] = 1`.
pub fn add_precedence_constraints(ctx: &mut ModelBuilderContext) {
    let pairs = ctx.rulebook.precedence_pairs().to_vec();

    for i in 0..ctx.residents.len() {
        let resident = &ctx.residents[i];
        let horizon = ctx.horizon(i);
        let stations = ctx.rulebook.stations(resident.model);

        for (before, after) in &pairs {
            if !stations.contains_key(before) || !stations.contains_key(after) {
                continue;
            }
            if horizon == 0 {
                continue;
            }

            for m in 0..horizon - 1 {
                let before_now = ctx.var(i, before, m).clone();
                let before_next = ctx.var(i, before, m + 1).clone();
                let after_next = ctx.var(i, after, m + 1).clone();

                let last_before = ctx.model.new_bool_var();

                // last_before <= before_now
                ctx.model.add_le(
                    LinearExpr::from(last_before.clone()),
                    LinearExpr::from(before_now.clone()),
                );
                // last_before <= 1 - before_next
                ctx.model.add_le(
                    LinearExpr::from(last_before.clone()),
                    LinearExpr::from(1) - LinearExpr::from(before_next.clone()),
                );
                // last_before >= before_now - before_next
                ctx.model.add_ge(
                    LinearExpr::from(last_before.clone()),
                    LinearExpr::from(before_now) - LinearExpr::from(before_next),
                );

                // last_before == 1 forces after_next == 1.
                ctx.model.add_ge(LinearExpr::from(after_next), LinearExpr::from(last_before));
            }
        }
    }
}
