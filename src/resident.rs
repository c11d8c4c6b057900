//! Per-resident state and its derived quantities (spec §3 Resident,
//! Derivations).

use crate::rulebook::{Department, Model};
use crate::station::StationKey;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resident's full, month-indexed rotation history/plan (spec §3:
/// "mapping from month-index to station-key"). Indices `<= current_month_index`
/// are locked history; later indices are the solver's/editor's domain.
pub type AssignmentMap = BTreeMap<u32, StationKey>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resident {
    pub name: String,
    pub start_date: NaiveDate,
    pub model: Model,
    pub department: Department,
    /// Largest month index `<= "now"` at ingest time; `None` means no
    /// history (spec §4.1 edge case: "current_month_index = -1").
    pub current_month_index: Option<u32>,
    pub assignments: AssignmentMap,
    pub maternity_leave_months: u16,
    pub unpaid_leave_months: u16,
    /// Sick leave months, keyed by calendar year (spec §3 Derivations: one
    /// sick month per *year* is absorbed, so a flat count would lose the
    /// information the formula needs).
    pub sick_leave_months_by_year: BTreeMap<i32, u16>,
    pub email: Option<String>,
}

impl Resident {
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        model: Model,
        department: Department,
    ) -> Self {
        Self {
            name: name.into(),
            start_date,
            model,
            department,
            current_month_index: None,
            assignments: AssignmentMap::new(),
            maternity_leave_months: 0,
            unpaid_leave_months: 0,
            sick_leave_months_by_year: BTreeMap::new(),
            email: None,
        }
    }

    /// Base program length for this resident's model, before leave-induced
    /// extension (spec GLOSSARY: Model A/B, 72/66 months).
    pub fn base_total_months(&self, base_duration_a: u16, base_duration_b: u16) -> u16 {
        match self.model {
            Model::A => base_duration_a,
            Model::B => base_duration_b,
        }
    }

    /// `get_month_date(m) = start_date + m calendar months` (spec §3
    /// Derivations). Calendar-aware, not a fixed day-count approximation —
    /// stage-calendar checks depend on the actual calendar month.
    pub fn month_date(&self, month_index: u32) -> NaiveDate {
        self.start_date + Months::new(month_index)
    }

    pub fn calendar_month(&self, month_index: u32) -> u32 {
        self.month_date(month_index).month()
    }

    /// `expected_total_months = base + max(0, maternity - 6) +
    /// sum_year max(0, sick_year - 1) + unpaid` (spec §3 Derivations).
    pub fn expected_total_months(
        &self,
        base_duration_a: u16,
        base_duration_b: u16,
        maternity_leave_deduction_limit: u16,
    ) -> u32 {
        let base = self.base_total_months(base_duration_a, base_duration_b) as u32;
        let maternity_extension =
            (self.maternity_leave_months as i32 - maternity_leave_deduction_limit as i32).max(0) as u32;
        let sick_extension: u32 = self
            .sick_leave_months_by_year
            .values()
            .map(|&count| (count as i32 - 1).max(0) as u32)
            .sum();
        base + maternity_extension + sick_extension + self.unpaid_leave_months as u32
    }

    /// `effective_department_months = department months + min(maternity, 6)
    /// + sum_year min(sick_year, 1)` (spec §3 Derivations).
    pub fn effective_department_months(
        &self,
        department_station: &StationKey,
        maternity_leave_deduction_limit: u16,
    ) -> u32 {
        let actual_department_months = self
            .assignments
            .values()
            .filter(|&key| key == department_station)
            .count() as u32;
        let maternity_credit = self.maternity_leave_months.min(maternity_leave_deduction_limit) as u32;
        let sick_credit: u32 = self
            .sick_leave_months_by_year
            .values()
            .map(|&count| count.min(1) as u32)
            .sum();
        actual_department_months + maternity_credit + sick_credit
    }

    /// Progress ratio over completed months, excluding unpaid leave and
    /// capping maternity/sick credit the same way as
    /// `effective_department_months` (spec §3 Derivations).
    pub fn progress(
        &self,
        base_duration_a: u16,
        base_duration_b: u16,
        unpaid_leave_key: &StationKey,
        maternity_leave_key: &StationKey,
        sick_leave_key: &StationKey,
    ) -> f64 {
        let base = self.base_total_months(base_duration_a, base_duration_b) as f64;
        if base <= 0.0 {
            return 0.0;
        }
        let Some(current) = self.current_month_index else { return 0.0 };

        let mut maternity_credited = 0u32;
        let mut sick_by_year: BTreeMap<i32, u32> = BTreeMap::new();
        let mut counted = 0u32;

        for (&month_index, station) in &self.assignments {
            if month_index > current {
                continue;
            }
            if station == unpaid_leave_key {
                continue;
            }
            if station == maternity_leave_key {
                if maternity_credited < 6 {
                    maternity_credited += 1;
                    counted += 1;
                }
                continue;
            }
            if station == sick_leave_key {
                let year = self.month_date(month_index).year();
                let entry = sick_by_year.entry(year).or_insert(0);
                if *entry < 1 {
                    *entry += 1;
                    counted += 1;
                }
                continue;
            }
            counted += 1;
        }

        counted as f64 / base
    }

    /// Whether `month_index` is locked history (spec §3: "assignments at
    /// indices <= current_month_index are locked").
    pub fn is_locked(&self, month_index: u32) -> bool {
        self.current_month_index.is_some_and(|current| month_index <= current)
    }

    /// Recomputes leave tallies from the assignment map against the given
    /// leave station keys (spec §3 invariant: leave counts must equal the
    /// re-tallied totals).
    pub fn recalculate_leave_counts(
        &mut self,
        maternity_leave_key: &StationKey,
        unpaid_leave_key: &StationKey,
        sick_leave_key: &StationKey,
    ) {
        self.maternity_leave_months =
            self.assignments.values().filter(|&k| k == maternity_leave_key).count() as u16;
        self.unpaid_leave_months =
            self.assignments.values().filter(|&k| k == unpaid_leave_key).count() as u16;

        let mut by_year: BTreeMap<i32, u16> = BTreeMap::new();
        for (&month_index, station) in &self.assignments {
            if station == sick_leave_key {
                *by_year.entry(self.month_date(month_index).year()).or_insert(0) += 1;
            }
        }
        self.sick_leave_months_by_year = by_year;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident() -> Resident {
        Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        )
    }

    #[test]
    fn expected_total_months_s4_leave_extension() {
        let mut r = resident();
        r.maternity_leave_months = 9;
        r.unpaid_leave_months = 2;
        assert_eq!(r.expected_total_months(72, 66, 6), 77);
    }

    #[test]
    fn month_date_is_calendar_aware_not_30_day_approximation() {
        let r = resident();
        // Jan 1 2024 + 36 months = Jan 1 2027, a leap-free run that a
        // 30*36-day approximation would drift away from.
        let d = r.month_date(36);
        assert_eq!(d, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn no_history_means_not_locked() {
        let r = resident();
        assert!(!r.is_locked(0));
    }
}
