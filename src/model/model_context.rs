//! Decision variables and the shared context the constraint functions in
//! this module operate on (spec §4.1: "one variable per (resident,
//! station, month) triple").

use crate::resident::Resident;
use crate::rulebook::Rulebook;
use crate::station::StationKey;
use cp_sat::builder::{BoolVar, CpModelBuilder};
use std::collections::BTreeMap;

/// `x[i][s][m]` decision variables, indexed by resident, then station key,
/// then month index.
pub type DecisionVars = Vec<BTreeMap<StationKey, Vec<BoolVar>>>;

/// Holds the in-progress CP-SAT model plus everything the constraint
/// functions need to read (residents, rulebook, per-resident month
/// horizons) and write (the model itself). Every temporary this context
/// creates lives only for the duration of one `solve` call (spec §5).
pub struct ModelBuilderContext<'a> {
    pub model: CpModelBuilder,
    pub rulebook: &'a Rulebook,
    pub residents: &'a [Resident],
    /// `H_i` per resident: `expected_total_months`.
    pub horizons: Vec<u32>,
    pub vars: DecisionVars,
}

impl<'a> ModelBuilderContext<'a> {
    pub fn new(rulebook: &'a Rulebook, residents: &'a [Resident]) -> Self {
        let mut model = CpModelBuilder::new();

        let horizons: Vec<u32> = residents
            .iter()
            .map(|r| {
                r.expected_total_months(
                    rulebook.base_duration(crate::rulebook::Model::A),
                    rulebook.base_duration(crate::rulebook::Model::B),
                    rulebook.maternity_leave_deduction_limit(),
                )
            })
            .collect();

        let vars: DecisionVars = residents
            .iter()
            .zip(horizons.iter())
            .map(|(resident, &horizon)| {
                let stations = rulebook.stations(resident.model);
                stations
                    .keys()
                    .map(|key| {
                        let month_vars: Vec<BoolVar> =
                            (0..horizon).map(|_| model.new_bool_var()).collect();
                        (key.clone(), month_vars)
                    })
                    .collect()
            })
            .collect();

        Self { model, rulebook, residents, horizons, vars }
    }

    pub fn horizon(&self, resident_idx: usize) -> u32 {
        self.horizons[resident_idx]
    }

    pub fn var(&self, resident_idx: usize, station: &StationKey, month: u32) -> &BoolVar {
        &self.vars[resident_idx][station][month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rulebook::{Department, Model, ProgramConfiguration};
    use chrono::NaiveDate;

    #[test]
    fn horizon_matches_expected_total_months() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        let ctx = ModelBuilderContext::new(&rulebook, std::slice::from_ref(&resident));
        assert_eq!(ctx.horizon(0), 72);
    }

    #[test]
    fn one_month_var_per_station_per_month() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        let ctx = ModelBuilderContext::new(&rulebook, std::slice::from_ref(&resident));
        let station_count = rulebook.stations(Model::A).len();
        assert_eq!(ctx.vars[0].len(), station_count);
        for month_vars in ctx.vars[0].values() {
            assert_eq!(month_vars.len(), 72);
        }
    }

    #[test]
    fn extended_horizon_from_leave_increases_var_count() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let mut resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        resident.maternity_leave_months = 9;
        resident.unpaid_leave_months = 2;
        let ctx = ModelBuilderContext::new(&rulebook, std::slice::from_ref(&resident));
        assert_eq!(ctx.horizon(0), 77);
    }
}
