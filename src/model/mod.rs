//! Constraint builder: turns a rulebook snapshot plus a resident set into a
//! boolean-variable CSP (spec §2 component 3, §4.1).

mod model_basic;
mod model_capacity;
mod model_context;
mod model_continuity;
mod model_duration;
mod model_precedence;
mod model_stage;

pub use model_context::{DecisionVars, ModelBuilderContext};

use crate::resident::Resident;
use crate::rulebook::Rulebook;

/// Builds the full CSP (C1-C8 plus the continuity objective) for the given
/// rulebook and resident set. Constraint generation order is deterministic
/// given the rulebook and resident order (spec §5 ordering guarantee).
pub fn build_constraint_model<'a>(
    rulebook: &'a Rulebook,
    residents: &'a [Resident],
) -> ModelBuilderContext<'a> {
    let mut ctx = ModelBuilderContext::new(rulebook, residents);

    model_basic::add_exclusivity_constraints(&mut ctx);
    model_basic::add_history_lock_constraints(&mut ctx);
    model_duration::add_duration_constraints(&mut ctx);
    model_capacity::add_capacity_constraints(&mut ctx);
    model_precedence::add_precedence_constraints(&mut ctx);
    model_stage::add_stage_constraints(&mut ctx);
    model_continuity::add_continuity_objective(&mut ctx);

    ctx
}
