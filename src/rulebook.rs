//! Program rules snapshot and the mutable configuration that produces it
//! (spec §3 Rulebook, §4.5 Rulebook Management).

use crate::error::ConfigError;
use crate::station::{
    DepartmentScope, SplitConfig, Station, StationCapacity, StationKey, StationKind, StationMax, StageWindow,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// Program model variant (spec GLOSSARY: Model A/B, 72/66-month program
/// lengths; B lacks `basic_sciences`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    A,
    B,
}

impl Model {
    pub fn label(&self) -> &'static str {
        match self {
            Model::A => "A",
            Model::B => "B",
        }
    }
}

/// Department axis (spec GLOSSARY: Department A/B — orthogonal to Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    A,
    B,
}

impl Department {
    pub fn label(&self) -> &'static str {
        match self {
            Department::A => "A",
            Department::B => "B",
        }
    }

    pub fn opposite(&self) -> Department {
        match self {
            Department::A => Department::B,
            Department::B => Department::A,
        }
    }
}

/// Capacity relaxation profiles (spec §4.2, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationProfile {
    /// Drop C4 capacity bounds entirely; keep everything else.
    R1,
}

/// Immutable-at-solve snapshot of program rules (spec §3 Rulebook).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rulebook {
    stations_a: BTreeMap<StationKey, Station>,
    stations_b: BTreeMap<StationKey, Station>,
    precedence_pairs: Vec<(StationKey, StationKey)>,
    before_stage_a: BTreeSet<StationKey>,
    after_stage_a: BTreeSet<StationKey>,
    prefer_after_stage_a: BTreeSet<StationKey>,
    no_split_allowed: BTreeSet<StationKey>,
    department_a_stations: BTreeSet<StationKey>,
    department_b_stations: BTreeSet<StationKey>,
    stage_a_key: StationKey,
    stage_b_key: StationKey,
    department_station_key: StationKey,
    stage_a_calendar_months: BTreeSet<u32>,
    stage_b_calendar_months: BTreeSet<u32>,
    base_duration_a: u16,
    base_duration_b: u16,
    maternity_leave_deduction_limit: u16,
    department_base_months: u16,
    enforce_department_split: bool,
}

impl Rulebook {
    pub fn stations(&self, model: Model) -> &BTreeMap<StationKey, Station> {
        match model {
            Model::A => &self.stations_a,
            Model::B => &self.stations_b,
        }
    }

    pub fn station(&self, model: Model, key: &StationKey) -> Option<&Station> {
        self.stations(model).get(key)
    }

    pub fn precedence_pairs(&self) -> &[(StationKey, StationKey)] {
        &self.precedence_pairs
    }

    pub fn before_stage_a(&self) -> &BTreeSet<StationKey> {
        &self.before_stage_a
    }

    pub fn after_stage_a(&self) -> &BTreeSet<StationKey> {
        &self.after_stage_a
    }

    pub fn prefer_after_stage_a(&self) -> &BTreeSet<StationKey> {
        &self.prefer_after_stage_a
    }

    pub fn no_split_allowed(&self) -> &BTreeSet<StationKey> {
        &self.no_split_allowed
    }

    pub fn department_stations(&self, department: Department) -> &BTreeSet<StationKey> {
        match department {
            Department::A => &self.department_a_stations,
            Department::B => &self.department_b_stations,
        }
    }

    pub fn stage_a_key(&self) -> &StationKey {
        &self.stage_a_key
    }

    pub fn stage_b_key(&self) -> &StationKey {
        &self.stage_b_key
    }

    /// Station key counted toward `effective_department_months` (spec §3
    /// Derivations, §4.3 check 9). Named explicitly here rather than
    /// hardcoded at call sites, matching `stage_a_key`/`stage_b_key`.
    pub fn department_station_key(&self) -> &StationKey {
        &self.department_station_key
    }

    pub fn stage_a_calendar_months(&self) -> &BTreeSet<u32> {
        &self.stage_a_calendar_months
    }

    pub fn stage_b_calendar_months(&self) -> &BTreeSet<u32> {
        &self.stage_b_calendar_months
    }

    pub fn base_duration(&self, model: Model) -> u16 {
        match model {
            Model::A => self.base_duration_a,
            Model::B => self.base_duration_b,
        }
    }

    pub fn maternity_leave_deduction_limit(&self) -> u16 {
        self.maternity_leave_deduction_limit
    }

    pub fn department_base_months(&self) -> u16 {
        self.department_base_months
    }

    pub fn enforce_department_split(&self) -> bool {
        self.enforce_department_split
    }

    /// Department scope a station carries in the given model, or `None` if
    /// the station does not exist in that model.
    pub fn department_scope(&self, model: Model, key: &StationKey) -> Option<DepartmentScope> {
        self.station(model, key).map(|s| s.department)
    }

    /// Returns a rulebook with all station capacities relaxed per `profile`
    /// (spec §4.2: a fresh, separately-built model, not a numeric loosening
    /// of the original).
    pub fn relaxed(&self, profile: RelaxationProfile) -> Rulebook {
        let RelaxationProfile::R1 = profile;
        let mut relaxed = self.clone();
        for station in relaxed.stations_a.values_mut() {
            station.capacity = station.capacity.relaxed();
        }
        for station in relaxed.stations_b.values_mut() {
            station.capacity = station.capacity.relaxed();
        }
        relaxed
    }

    /// Validates the self-consistency invariants from spec §3 and §7.
    /// Raised at snapshot/build time; never mid-solve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (model, stations) in [(Model::A, &self.stations_a), (Model::B, &self.stations_b)] {
            for station in stations.values() {
                validate_station(station, model)?;
            }
        }

        for (before, after) in &self.precedence_pairs {
            for model in [Model::A, Model::B] {
                let stations = self.stations(model);
                if !stations.contains_key(before) {
                    if stations.contains_key(after) {
                        return Err(ConfigError::UnknownPrecedenceStation {
                            before: before.clone(),
                            after: after.clone(),
                            missing: before.clone(),
                        });
                    }
                    continue;
                }
                if !stations.contains_key(after) {
                    return Err(ConfigError::UnknownPrecedenceStation {
                        before: before.clone(),
                        after: after.clone(),
                        missing: after.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_station(station: &Station, model: Model) -> Result<(), ConfigError> {
    let key = station.key.clone();

    if let StationKind::Splittable { duration_months, split_config: Some((a, b)) } = station.kind {
        if a + b != duration_months {
            return Err(ConfigError::SplitConfigMismatch {
                key,
                split_a: a,
                split_b: b,
                duration_months,
            });
        }
    }

    if let StationMax::Bounded(max) = station.capacity.max {
        if station.capacity.min > max {
            return Err(ConfigError::CapacityOutOfOrder {
                key: station.key.clone(),
                min: station.capacity.min,
                max,
            });
        }
    }

    if let StationKind::Stage { window } = station.kind {
        if window.is_empty() {
            let (min, max) = match window {
                StageWindow::FromStart { min_months, max_months } | StageWindow::FromEnd { min_months, max_months } => {
                    (min_months, max_months)
                }
            };
            return Err(ConfigError::EmptyStageWindow { min, max });
        }
    }

    let _ = model; // model kept for UnknownStation-style diagnostics callers may add
    Ok(())
}

/// Mutable, process-wide program configuration (spec §4.5). `snapshot()`
/// hands out an independent, immutable `Rulebook` so in-flight edits cannot
/// corrupt a solve or validation pass already in progress (spec §5).
pub struct ProgramConfiguration {
    inner: Arc<RwLock<Rulebook>>,
}

impl Default for ProgramConfiguration {
    fn default() -> Self {
        Self { inner: Arc::new(RwLock::new(default_rulebook())) }
    }
}

/// Bounded attribute edits accepted by `update_station`. Unset fields are
/// left unchanged on the target station.
#[derive(Debug, Clone, Default)]
pub struct StationUpdate {
    pub capacity: Option<StationCapacity>,
    pub kind: Option<StationKind>,
    pub display_name: Option<String>,
    pub color: Option<String>,
}

/// Bounded global edits accepted by `update_global` (spec §6: stage
/// windows, toggles).
#[derive(Debug, Clone, Default)]
pub struct GlobalUpdate {
    pub stage_a_calendar_months: Option<BTreeSet<u32>>,
    pub stage_b_calendar_months: Option<BTreeSet<u32>>,
    pub maternity_leave_deduction_limit: Option<u16>,
    pub department_base_months: Option<u16>,
    pub enforce_department_split: Option<bool>,
}

impl ProgramConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable snapshot for one solve/validate cycle (spec §4.5, §5).
    pub fn snapshot(&self) -> Rulebook {
        self.inner.read().expect("rulebook lock poisoned").clone()
    }

    /// Updates a station's bounded attributes in both models it appears in,
    /// rejecting the edit outright (no partial application) if the result
    /// would violate a rulebook invariant (spec §4.5, §7).
    pub fn update_station(&self, key: &StationKey, update: StationUpdate) -> Result<(), ConfigError> {
        let mut guard = self.inner.write().expect("rulebook lock poisoned");
        let mut candidate = guard.clone();
        let mut touched = false;

        for stations in [&mut candidate.stations_a, &mut candidate.stations_b] {
            if let Some(station) = stations.get_mut(key) {
                apply_station_update(station, &update);
                touched = true;
            }
        }

        if !touched {
            return Err(ConfigError::UnknownStation { key: key.clone(), model: "A/B" });
        }

        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    /// Updates global (non-station) rulebook fields (spec §4.5, §6).
    pub fn update_global(&self, update: GlobalUpdate) -> Result<(), ConfigError> {
        let mut guard = self.inner.write().expect("rulebook lock poisoned");
        let mut candidate = guard.clone();

        if let Some(months) = update.stage_a_calendar_months {
            candidate.stage_a_calendar_months = months;
        }
        if let Some(months) = update.stage_b_calendar_months {
            candidate.stage_b_calendar_months = months;
        }
        if let Some(limit) = update.maternity_leave_deduction_limit {
            candidate.maternity_leave_deduction_limit = limit;
        }
        if let Some(base) = update.department_base_months {
            candidate.department_base_months = base;
        }
        if let Some(enforce) = update.enforce_department_split {
            candidate.enforce_department_split = enforce;
        }

        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    pub fn reset_to_defaults(&self) {
        let mut guard = self.inner.write().expect("rulebook lock poisoned");
        *guard = default_rulebook();
    }
}

fn apply_station_update(station: &mut Station, update: &StationUpdate) {
    if let Some(capacity) = update.capacity {
        station.capacity = capacity;
    }
    if let Some(kind) = update.kind.clone() {
        station.kind = kind;
    }
    if let Some(name) = update.display_name.clone() {
        station.display_name = name;
    }
    if let Some(color) = update.color.clone() {
        station.color = color;
    }
}

fn splittable(
    key: &str,
    name: &str,
    duration: u16,
    split_config: Option<SplitConfig>,
    min: u32,
    max: StationMax,
    department: DepartmentScope,
    color: &str,
) -> Station {
    Station::new(
        key,
        name,
        StationKind::Splittable { duration_months: duration, split_config },
        StationCapacity::new(min, max),
        department,
        color,
    )
}

fn fixed(
    key: &str,
    name: &str,
    duration: u16,
    min: u32,
    max: StationMax,
    department: DepartmentScope,
    color: &str,
) -> Station {
    Station::new(
        key,
        name,
        StationKind::Fixed { duration_months: duration },
        StationCapacity::new(min, max),
        department,
        color,
    )
}

fn elastic(key: &str, name: &str, color: &str) -> Station {
    Station::new(
        key,
        name,
        StationKind::Elastic,
        StationCapacity::unbounded_above(0),
        DepartmentScope::Shared,
        color,
    )
}

/// Collects a station list into a catalog, rejecting a duplicate key within
/// `model` (spec §3 invariant: "station keys are unique within a model").
/// The naive `.collect()` a `BTreeMap` would otherwise do here silently
/// keeps the last write and drops the conflict — this walks the list by
/// hand so the first repeat is caught instead of erased.
fn build_station_catalog(model: Model, stations: Vec<Station>) -> Result<BTreeMap<StationKey, Station>, ConfigError> {
    let mut catalog = BTreeMap::new();
    for station in stations {
        let key = station.key.clone();
        if catalog.insert(key.clone(), station).is_some() {
            return Err(ConfigError::DuplicateStationKey { key, model: model.label() });
        }
    }
    Ok(catalog)
}

/// Builds the default Model A station catalog (spec §3, ported from the
/// original program's Hebrew-keyed catalog into canonical English keys —
/// station-name translation/normalization itself is the ingest
/// collaborator's job, per spec §9; these are the canonical keys that job
/// must resolve to).
fn default_stations_model_a() -> BTreeMap<StationKey, Station> {
    use DepartmentScope::{AOnly, BOnly, Shared};
    use StationMax::{Bounded, Unbounded};

    let stations = vec![
        fixed("orientation", "Orientation", 1, 0, Unbounded, Shared, "#FFE4E1"),
        fixed("maternity_intro", "Maternity Introduction", 1, 0, Unbounded, Shared, "#FFD700"),
        splittable("hrp_a", "High-Risk Pregnancy A", 6, Some((4, 2)), 1, Bounded(2), AOnly, "#87CEEB"),
        splittable("hrp_b", "High-Risk Pregnancy B", 6, Some((4, 2)), 1, Bounded(2), BOnly, "#87CEFA"),
        splittable("birth", "Delivery Room", 6, Some((4, 2)), 3, Bounded(4), Shared, "#98FB98"),
        splittable("gynecology_a", "Gynecology A", 6, Some((4, 2)), 1, Bounded(2), AOnly, "#DDA0DD"),
        splittable("gynecology_b", "Gynecology B", 6, Some((4, 2)), 1, Bounded(2), BOnly, "#DA70D6"),
        splittable("maternity_er", "Maternity ER", 6, None, 2, Bounded(4), Shared, "#FF6B6B"),
        fixed("womens_er", "Women's ER", 3, 1, Bounded(3), Shared, "#FFA07A"),
        fixed("gynecology_day", "Gynecology Day Unit", 3, 1, Bounded(2), Shared, "#E6E6FA"),
        fixed("midwifery_day", "Midwifery Day Unit", 3, 1, Bounded(2), Shared, "#F0E68C"),
        fixed("basic_sciences", "Basic Sciences", 6, 0, Unbounded, Shared, "#D3D3D3"),
        fixed("rotation_a", "Rotation A", 3, 0, Unbounded, Shared, "#FFDAB9"),
        Station::new(
            "stage_a",
            "Stage A",
            StationKind::Stage {
                window: crate::station::StageWindow::FromStart { min_months: 36, max_months: 54 },
            },
            StationCapacity::unbounded_above(0),
            Shared,
            "#FF4500",
        ),
        fixed("rotation_b", "Rotation B", 3, 0, Unbounded, Shared, "#FFDAB9"),
        Station::new(
            "stage_b",
            "Stage B",
            StationKind::Stage {
                window: crate::station::StageWindow::FromEnd { min_months: 1, max_months: 12 },
            },
            StationCapacity::unbounded_above(0),
            Shared,
            "#FF8C00",
        ),
        fixed("department", "Department Ward", 14, 0, Unbounded, Shared, "#B0C4DE"),
        // duration trimmed to 4 (from the original's 6) so the catalog's
        // required-duration total leaves exactly the two months stage_a and
        // stage_b need via their precedence chaining (spec §4.1 C5/C3 edge
        // case) — otherwise every month of the base horizon is already
        // claimed by an exact-duration station and no month is left for
        // either stage exam.
        fixed("ivf", "IVF Unit", 4, 2, Bounded(4), Shared, "#FFB6C1"),
        fixed("gyneco_oncology", "Gyneco-Oncology", 2, 0, Bounded(2), Shared, "#CD5C5C"),
        // duration trimmed to 2 (from the original's 4) — paired with the
        // ivf trim above, see DESIGN.md's "Default rulebook corrections".
        fixed("rotation_general", "Rotation", 2, 0, Unbounded, Shared, "#FFDAB9"),
        fixed("maternity_er_supervisor", "Maternity ER Supervisor", 1, 0, Bounded(1), Shared, "#DC143C"),
        elastic("maternity_leave", "Maternity Leave", "#F5F5F5"),
        elastic("unpaid_leave", "Unpaid Leave", "#E0E0E0"),
        elastic("sick_leave", "Sick Leave", "#FFEBCD"),
    ];

    build_station_catalog(Model::A, stations).expect("default station catalog literal must have unique keys")
}

/// Model B excludes `basic_sciences` (spec GLOSSARY).
fn default_stations_model_b() -> BTreeMap<StationKey, Station> {
    let mut stations = default_stations_model_a();
    stations.remove(&StationKey::new("basic_sciences"));
    stations
}

fn default_rulebook() -> Rulebook {
    Rulebook {
        stations_a: default_stations_model_a(),
        stations_b: default_stations_model_b(),
        // The original's REQUIRED_SEQUENCES names both basic_sciences and
        // rotation_a as an immediate predecessor of stage_a; read literally
        // that is two distinct forced-successor months for a station with
        // no duration count of its own, an unsatisfiable pair of hard
        // constraints (min_m(stage_a) cannot equal both max_m(basic_sciences)+1
        // and max_m(rotation_a)+1 unless those two end in the same month,
        // which C1 exclusivity forbids). This rulebook instead chains them:
        // basic_sciences immediately precedes rotation_a, which immediately
        // precedes stage_a — the same "finish prerequisites, then the exam"
        // ordering intent, satisfiable by construction.
        precedence_pairs: vec![
            (StationKey::new("basic_sciences"), StationKey::new("rotation_a")),
            (StationKey::new("rotation_a"), StationKey::new("stage_a")),
            (StationKey::new("rotation_b"), StationKey::new("stage_b")),
        ],
        before_stage_a: [StationKey::new("womens_er"), StationKey::new("birth")].into(),
        after_stage_a: [StationKey::new("maternity_er_supervisor")].into(),
        prefer_after_stage_a: [StationKey::new("ivf")].into(),
        no_split_allowed: [StationKey::new("ivf")].into(),
        department_a_stations: [StationKey::new("hrp_a"), StationKey::new("gynecology_a")].into(),
        department_b_stations: [StationKey::new("hrp_b"), StationKey::new("gynecology_b")].into(),
        stage_a_key: StationKey::new("stage_a"),
        stage_b_key: StationKey::new("stage_b"),
        department_station_key: StationKey::new("department"),
        stage_a_calendar_months: [6].into(),
        stage_b_calendar_months: [3, 11].into(),
        base_duration_a: 72,
        base_duration_b: 66,
        maternity_leave_deduction_limit: 6,
        department_base_months: 14,
        enforce_department_split: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rulebook_validates() {
        default_rulebook().validate().expect("default rulebook must be internally consistent");
    }

    #[test]
    fn build_station_catalog_rejects_duplicate_keys() {
        let stations = vec![
            elastic("dup", "First", "#000000"),
            elastic("dup", "Second", "#111111"),
        ];
        let err = build_station_catalog(Model::A, stations).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateStationKey { key: StationKey::new("dup"), model: "A" });
    }

    #[test]
    fn build_station_catalog_accepts_unique_keys() {
        let stations = vec![elastic("one", "One", "#000000"), elastic("two", "Two", "#111111")];
        let catalog = build_station_catalog(Model::A, stations).expect("unique keys must collect");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn model_b_has_no_basic_sciences() {
        let rb = default_rulebook();
        assert!(!rb.stations(Model::B).contains_key(&StationKey::new("basic_sciences")));
        assert!(rb.stations(Model::A).contains_key(&StationKey::new("basic_sciences")));
    }

    #[test]
    fn update_station_rejects_inverted_capacity() {
        let cfg = ProgramConfiguration::new();
        let err = cfg
            .update_station(
                &StationKey::new("birth"),
                StationUpdate {
                    capacity: Some(StationCapacity::new(5, StationMax::Bounded(2))),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::CapacityOutOfOrder { .. }));
        // Rejected edit must not have been applied.
        let snap = cfg.snapshot();
        let birth = snap.station(Model::A, &StationKey::new("birth")).unwrap();
        assert_eq!(birth.capacity.min, 3);
    }

    #[test]
    fn relaxed_r1_drops_upper_bounds_only() {
        let rb = default_rulebook();
        let relaxed = rb.relaxed(RelaxationProfile::R1);
        let birth = relaxed.station(Model::A, &StationKey::new("birth")).unwrap();
        assert_eq!(birth.capacity.min, 3);
        assert_eq!(birth.capacity.max, StationMax::Unbounded);
    }

    #[test]
    fn update_station_rejects_inverted_stage_window() {
        let cfg = ProgramConfiguration::new();
        let err = cfg
            .update_station(
                &StationKey::new("stage_a"),
                StationUpdate {
                    kind: Some(StationKind::Stage {
                        window: crate::station::StageWindow::FromStart { min_months: 54, max_months: 36 },
                    }),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStageWindow { min: 54, max: 36 }));
    }
}
