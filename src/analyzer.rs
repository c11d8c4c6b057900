//! Capacity/bottleneck analyzer (spec §2 component 6, §4.4): forward scan
//! over a look-ahead window surfacing staffing deficits and surpluses,
//! grounded on `bottleneck_analyzer.py`'s `BottleneckAnalyzer`.

use crate::resident::Resident;
use crate::rulebook::{Model, Rulebook};
use crate::station::{StationCapacity, StationKey, StationMax};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Critical,
    Warning,
}

/// One capacity problem at a single `(month, station)` (spec §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CapacityIssue {
    Understaffed { station: StationKey, display_name: String, current: u32, required: u32, deficit: u32, severity: IssueSeverity },
    Overstaffed { station: StationKey, display_name: String, current: u32, maximum: u32, excess: u32 },
    NoCoverage { station: StationKey, display_name: String, required: u32, deficit: u32 },
}

impl CapacityIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            CapacityIssue::Understaffed { severity, .. } => *severity,
            CapacityIssue::Overstaffed { .. } => IssueSeverity::Warning,
            CapacityIssue::NoCoverage { .. } => IssueSeverity::Critical,
        }
    }

    pub fn station(&self) -> &StationKey {
        match self {
            CapacityIssue::Understaffed { station, .. }
            | CapacityIssue::Overstaffed { station, .. }
            | CapacityIssue::NoCoverage { station, .. } => station,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CapacityIssue::Understaffed { display_name, .. }
            | CapacityIssue::Overstaffed { display_name, .. }
            | CapacityIssue::NoCoverage { display_name, .. } => display_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthBottleneck {
    pub month: u32,
    pub issues: Vec<CapacityIssue>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub critical: u32,
    pub warning: u32,
}

/// A compact per-month status line (spec §4.4 supplement,
/// `bottleneck_analyzer.py::get_monthly_summary`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub critical: u32,
    pub warning: u32,
    pub headline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityReport {
    pub analyzed_months: u32,
    pub bottlenecks: Vec<MonthBottleneck>,
    pub summary_counts: SummaryCounts,
    pub recommendations: Vec<String>,
    /// Per-month station occupancy over the full analyzed window,
    /// including months with no issues — kept so `station_forecast` can
    /// be a thin derived view instead of a second scan over residents.
    monthly_counts: Vec<(u32, BTreeMap<StationKey, u32>)>,
    station_display_names: BTreeMap<StationKey, String>,
}

impl CapacityReport {
    /// Per-month status lines for the months that had at least one issue
    /// (spec §4.4 supplement).
    pub fn monthly_summary(&self) -> Vec<MonthlySummary> {
        self.bottlenecks
            .iter()
            .map(|b| {
                let critical = b.issues.iter().filter(|i| i.severity() == IssueSeverity::Critical).count() as u32;
                let warning = b.issues.iter().filter(|i| i.severity() == IssueSeverity::Warning).count() as u32;
                let headline = b
                    .issues
                    .iter()
                    .take(3)
                    .map(|i| format!("{}: {}", i.display_name(), issue_type_label(i)))
                    .collect::<Vec<_>>()
                    .join(", ");
                MonthlySummary { month: b.month, critical, warning, headline }
            })
            .collect()
    }

    /// Per-station occupancy time series over the analyzed window (spec
    /// §4.4 supplement, `get_station_forecast`), keyed by display name.
    pub fn station_forecast(&self) -> BTreeMap<String, Vec<u32>> {
        let mut forecast: BTreeMap<String, Vec<u32>> =
            self.station_display_names.values().map(|name| (name.clone(), Vec::new())).collect();

        for (_, counts) in &self.monthly_counts {
            for (key, name) in &self.station_display_names {
                let count = counts.get(key).copied().unwrap_or(0);
                forecast.get_mut(name).unwrap().push(count);
            }
        }

        forecast
    }

    /// JSON egress matching spec §6's capacity report shape
    /// (`{analyzed_months, bottlenecks, summary_counts, recommendations}`).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("CapacityReport fields are all Serialize")
    }
}

fn issue_type_label(issue: &CapacityIssue) -> &'static str {
    match issue {
        CapacityIssue::Understaffed { .. } => "understaffed",
        CapacityIssue::Overstaffed { .. } => "overstaffed",
        CapacityIssue::NoCoverage { .. } => "no_coverage",
    }
}

fn all_station_capacities(rulebook: &Rulebook) -> BTreeMap<StationKey, (StationCapacity, String)> {
    let mut capacities = BTreeMap::new();
    for model in [Model::A, Model::B] {
        for (key, station) in rulebook.stations(model) {
            capacities
                .entry(key.clone())
                .or_insert_with(|| (station.capacity, station.display_name.clone()));
        }
    }
    capacities
}

fn analyze_month(
    month: u32,
    residents: &[Resident],
    capacities: &BTreeMap<StationKey, (StationCapacity, String)>,
) -> (Vec<CapacityIssue>, BTreeMap<StationKey, u32>) {
    let mut counts: BTreeMap<StationKey, u32> = BTreeMap::new();
    for resident in residents {
        if let Some(key) = resident.assignments.get(&month) {
            *counts.entry(key.clone()).or_insert(0) += 1;
        }
    }

    let mut issues = Vec::new();
    for (key, (capacity, display_name)) in capacities {
        let count = counts.get(key).copied().unwrap_or(0);

        if count == 0 && capacity.min > 0 {
            issues.push(CapacityIssue::NoCoverage {
                station: key.clone(),
                display_name: display_name.clone(),
                required: capacity.min,
                deficit: capacity.min,
            });
            continue;
        }

        if count < capacity.min {
            issues.push(CapacityIssue::Understaffed {
                station: key.clone(),
                display_name: display_name.clone(),
                current: count,
                required: capacity.min,
                deficit: capacity.min - count,
                severity: IssueSeverity::Warning,
            });
        } else if let StationMax::Bounded(max) = capacity.max {
            if count > max {
                issues.push(CapacityIssue::Overstaffed {
                    station: key.clone(),
                    display_name: display_name.clone(),
                    current: count,
                    maximum: max,
                    excess: count - max,
                });
            }
        }
    }

    (issues, counts)
}

fn generate_recommendations(bottlenecks: &[MonthBottleneck], lookahead_months: u32) -> Vec<String> {
    if bottlenecks.is_empty() {
        return vec![format!("no capacity bottlenecks detected in the next {lookahead_months} months")];
    }

    let mut recommendations = Vec::new();
    let all_issues: Vec<&CapacityIssue> = bottlenecks.iter().flat_map(|b| b.issues.iter()).collect();

    let critical_count = all_issues.iter().filter(|i| i.severity() == IssueSeverity::Critical).count();
    let understaffed_count = all_issues
        .iter()
        .filter(|i| matches!(i, CapacityIssue::Understaffed { .. } | CapacityIssue::NoCoverage { .. }))
        .count();
    let overstaffed_count = all_issues.iter().filter(|i| matches!(i, CapacityIssue::Overstaffed { .. })).count();

    if critical_count > 0 {
        recommendations.push(format!("critical: {critical_count} critical capacity issue(s) require immediate attention"));
    }
    if understaffed_count > 0 {
        recommendations.push(format!(
            "{understaffed_count} instance(s) of understaffing detected; consider adjusting rotation schedules or extending timelines"
        ));
    }
    if overstaffed_count > 0 {
        recommendations.push(format!("{overstaffed_count} instance(s) of overstaffing detected; redistribute residents to understaffed stations"));
    }

    let mut problem_stations: BTreeMap<&str, u32> = BTreeMap::new();
    for issue in &all_issues {
        *problem_stations.entry(issue.display_name()).or_insert(0) += 1;
    }
    if !problem_stations.is_empty() {
        let mut ranked: Vec<(&str, u32)> = problem_stations.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let top: Vec<String> = ranked.into_iter().take(3).map(|(name, count)| format!("{name} ({count} months)")).collect();
        recommendations.push(format!("focus on: {}", top.join(", ")));
    }

    recommendations.push("run solver with relaxation R1 if unresolved".to_string());
    recommendations
}

/// Forward-scans `[m_start, min(m_start + lookahead_months, max horizon))`,
/// where `m_start` is the highest currently-assigned month index across
/// all residents (spec §4.4).
#[tracing::instrument(skip(residents, rulebook), fields(residents = residents.len(), lookahead_months))]
pub fn analyze(residents: &[Resident], rulebook: &Rulebook, lookahead_months: u32) -> CapacityReport {
    let capacities = all_station_capacities(rulebook);
    let station_display_names: BTreeMap<StationKey, String> =
        capacities.iter().map(|(key, (_, name))| (key.clone(), name.clone())).collect();

    let m_start = residents.iter().flat_map(|r| r.assignments.keys().copied()).max().unwrap_or(0);
    let max_horizon = residents
        .iter()
        .map(|r| {
            r.expected_total_months(
                rulebook.base_duration(Model::A),
                rulebook.base_duration(Model::B),
                rulebook.maternity_leave_deduction_limit(),
            )
        })
        .max()
        .unwrap_or(0);
    let m_end = (m_start + lookahead_months).min(max_horizon);

    let mut bottlenecks = Vec::new();
    let mut monthly_counts = Vec::new();

    for month in m_start..m_end {
        let (issues, counts) = analyze_month(month, residents, &capacities);
        monthly_counts.push((month, counts));
        if !issues.is_empty() {
            bottlenecks.push(MonthBottleneck { month, issues });
        }
    }

    let critical = bottlenecks.iter().filter(|b| b.issues.iter().any(|i| i.severity() == IssueSeverity::Critical)).count() as u32;
    let warning = bottlenecks.iter().filter(|b| b.issues.iter().any(|i| i.severity() == IssueSeverity::Warning)).count() as u32;

    let recommendations = generate_recommendations(&bottlenecks, lookahead_months);

    tracing::info!(bottlenecks = bottlenecks.len(), critical, warning, "capacity analysis finished");

    CapacityReport {
        analyzed_months: lookahead_months,
        bottlenecks,
        summary_counts: SummaryCounts { critical, warning },
        recommendations,
        monthly_counts,
        station_display_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rulebook::{Department, ProgramConfiguration};
    use chrono::NaiveDate;

    #[test]
    fn empty_cohort_reports_no_bottlenecks() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let report = analyze(&[], &rulebook, 12);
        assert!(report.bottlenecks.is_empty());
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn future_deficit_is_reported_as_understaffed() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let mut resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        // birth requires min=3; only one resident present at month 40.
        resident.assignments.insert(40, StationKey::new("birth"));
        let report = analyze(&[resident], &rulebook, 1);

        assert_eq!(report.bottlenecks.len(), 1);
        let month_40 = &report.bottlenecks[0];
        assert_eq!(month_40.month, 40);
        assert!(month_40
            .issues
            .iter()
            .any(|i| matches!(i, CapacityIssue::Understaffed { current: 1, required: 3, deficit: 2, .. })));
    }

    #[test]
    fn to_json_exposes_spec_shaped_fields() {
        let rulebook = ProgramConfiguration::new().snapshot();
        let mut resident = Resident::new(
            "Dana Cohen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Model::A,
            Department::A,
        );
        resident.assignments.insert(40, StationKey::new("birth"));
        let report = analyze(&[resident], &rulebook, 1);

        let value = report.to_json();
        assert_eq!(value["analyzed_months"], 1);
        assert_eq!(value["bottlenecks"][0]["month"], 40);
        assert!(value["summary_counts"]["warning"].as_u64().unwrap() >= 1);
    }
}
