//! C6 (stage calendar lock), C7 (stage-A elapsed window), C8 (stage-B
//! remaining window) — spec §4.1.

use super::model_context::ModelBuilderContext;
use crate::station::StageWindow;
use cp_sat::builder::LinearExpr;

pub fn add_stage_constraints(ctx: &mut ModelBuilderContext) {
    for i in 0..ctx.residents.len() {
        let resident = &ctx.residents[i];
        let horizon = ctx.horizon(i);
        let stations = ctx.rulebook.stations(resident.model).clone();

        for (key, station) in &stations {
            let Some(window) = station.kind.stage_window() else { continue };

            let allowed_calendar_months = if key == ctx.rulebook.stage_a_key() {
                Some(ctx.rulebook.stage_a_calendar_months().clone())
            } else if key == ctx.rulebook.stage_b_key() {
                Some(ctx.rulebook.stage_b_calendar_months().clone())
            } else {
                None
            };

            for m in 0..horizon {
                let mut locked_out = false;

                // C6: stage calendar lock.
                if let Some(allowed) = &allowed_calendar_months {
                    if !allowed.contains(&resident.calendar_month(m)) {
                        locked_out = true;
                    }
                }

                // C7 / C8: elapsed-from-start / remaining-to-end window.
                match window {
                    StageWindow::FromStart { min_months, max_months } => {
                        let m = m as i64;
                        if m < min_months || m > max_months {
                            locked_out = true;
                        }
                    }
                    StageWindow::FromEnd { min_months, max_months } => {
                        let remaining = horizon as i64 - m as i64;
                        if remaining < min_months || remaining > max_months {
                            locked_out = true;
                        }
                    }
                }

                if locked_out {
                    let var = ctx.var(i, key, m).clone();
                    ctx.model.add_eq(LinearExpr::from(var), LinearExpr::from(0));
                }
            }
        }
    }
}
