//! Station catalog entries (spec §3, §9 redesign note).
//!
//! The original dataclass (`config.py::Station`) is a flat record with
//! boolean/optional fields (`splittable`, `split_config`). §9 flags that
//! shape for a tagged variant so the constraint builder and validator can
//! match exhaustively instead of branching on `duration_months == 0` /
//! `splittable`. `StationKind` is that variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Canonical, stable station identifier. Cheap to clone (interned string),
/// resolved against the rulebook's station tables rather than carried as a
/// back-pointer (spec §9: "arena + string keys").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationKey(Arc<str>);

impl StationKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StationKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A preferred non-consecutive run-length shape, e.g. `(4, 2)` for a
/// 6-month station split into a 4-month block followed by a 2-month block.
pub type SplitConfig = (u16, u16);

/// Calendar/elapsed-time window a stage-exam station is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageWindow {
    /// Elapsed months from the resident's own `start_date`, e.g. Stage A's
    /// `[36, 54]`.
    FromStart { min_months: i64, max_months: i64 },
    /// Remaining months to the resident's `expected_total_months`, e.g.
    /// Stage B's `[1, 12]`.
    FromEnd { min_months: i64, max_months: i64 },
}

impl StageWindow {
    pub fn is_empty(&self) -> bool {
        match *self {
            StageWindow::FromStart { min_months, max_months }
            | StageWindow::FromEnd { min_months, max_months } => min_months > max_months,
        }
    }
}

/// The tagged variant spec §9 calls for, replacing `duration_months`/
/// `splittable`/`split_config` booleans with an exhaustively-matchable kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationKind {
    /// Must be occupied for exactly `duration_months`, consecutively
    /// (continuity preference, not a hard constraint — see §9).
    Fixed { duration_months: u16 },
    /// Must be occupied for exactly `duration_months`; non-consecutive runs
    /// are tolerated, preferably in the `split_config` shape when one is
    /// named (§4.3 check 6 — a splittable station with no preferred shape,
    /// e.g. the original's `maternity_er`, tolerates any split as a
    /// non-preferred-pattern warning).
    Splittable {
        duration_months: u16,
        split_config: Option<SplitConfig>,
    },
    /// Zero required duration: leave types and other "fills the remaining
    /// months" states (spec §4.1 edge cases).
    Elastic,
    /// A calendar- and elapsed-time-locked board-exam month (§4.1 C6-C8).
    /// Carries no required duration of its own — in the original, stage
    /// months are occupied exactly once as a side effect of the immediate-
    /// precedence constraint chaining into them, not via a duration count.
    Stage { window: StageWindow },
}

impl StationKind {
    /// Required total months at this station, or `None` for elastic/stage
    /// stations (no fixed duration to check).
    pub fn duration_months(&self) -> Option<u16> {
        match self {
            StationKind::Fixed { duration_months } => Some(*duration_months),
            StationKind::Splittable { duration_months, .. } => Some(*duration_months),
            StationKind::Elastic => None,
            StationKind::Stage { .. } => None,
        }
    }

    pub fn is_elastic(&self) -> bool {
        matches!(self, StationKind::Elastic)
    }

    pub fn split_config(&self) -> Option<SplitConfig> {
        match self {
            StationKind::Splittable { split_config, .. } => *split_config,
            _ => None,
        }
    }

    pub fn stage_window(&self) -> Option<StageWindow> {
        match self {
            StationKind::Stage { window } => Some(*window),
            _ => None,
        }
    }
}

/// Upper capacity bound; `Unbounded` models spec §3's `∞` cap (the
/// original's `999` sentinel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationMax {
    Bounded(u32),
    Unbounded,
}

impl StationMax {
    pub fn as_option(&self) -> Option<u32> {
        match self {
            StationMax::Bounded(n) => Some(*n),
            StationMax::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationCapacity {
    pub min: u32,
    pub max: StationMax,
}

impl StationCapacity {
    pub fn new(min: u32, max: StationMax) -> Self {
        Self { min, max }
    }

    pub fn unbounded_above(min: u32) -> Self {
        Self { min, max: StationMax::Unbounded }
    }

    /// The relaxation profile R1 drops the upper bound entirely but keeps
    /// the minimum (spec §4.2: "drop C4 capacity bounds; keep everything
    /// else").
    pub fn relaxed(&self) -> Self {
        Self { min: self.min, max: StationMax::Unbounded }
    }

    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && self.max.as_option().is_none_or(|max| count <= max)
    }
}

/// Department eligibility of a station: shared stations apply to every
/// resident; `AOnly`/`BOnly` stations apply only to the matching
/// department (spec §3 invariant: `{A_only, B_only, shared}` partitions
/// the catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepartmentScope {
    Shared,
    AOnly,
    BOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub key: StationKey,
    pub display_name: String,
    pub kind: StationKind,
    pub capacity: StationCapacity,
    pub department: DepartmentScope,
    pub color: String,
}

impl Station {
    pub fn new(
        key: impl Into<StationKey>,
        display_name: impl Into<String>,
        kind: StationKind,
        capacity: StationCapacity,
        department: DepartmentScope,
        color: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            kind,
            capacity,
            department,
            color: color.into(),
        }
    }

    pub fn duration_months(&self) -> Option<u16> {
        self.kind.duration_months()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_key_from_str_and_string_are_equal() {
        let a: StationKey = "birth".into();
        let b: StationKey = "birth".to_string().into();
        assert_eq!(a, b);
    }

    #[test]
    fn stage_window_empty_detects_inverted_bounds() {
        let empty = StageWindow::FromStart { min_months: 54, max_months: 36 };
        assert!(empty.is_empty());
        let ok = StageWindow::FromEnd { min_months: 1, max_months: 12 };
        assert!(!ok.is_empty());
    }

    #[test]
    fn station_max_unbounded_has_no_option() {
        assert_eq!(StationMax::Unbounded.as_option(), None);
        assert_eq!(StationMax::Bounded(4).as_option(), Some(4));
    }

    #[test]
    fn capacity_contains_respects_min_and_max() {
        let cap = StationCapacity::new(3, StationMax::Bounded(4));
        assert!(!cap.contains(2));
        assert!(cap.contains(3));
        assert!(cap.contains(4));
        assert!(!cap.contains(5));
    }

    #[test]
    fn capacity_relaxed_keeps_min_drops_max() {
        let cap = StationCapacity::new(3, StationMax::Bounded(4));
        let relaxed = cap.relaxed();
        assert_eq!(relaxed.min, 3);
        assert_eq!(relaxed.max, StationMax::Unbounded);
        assert!(relaxed.contains(1_000_000));
    }

    #[test]
    fn station_kind_duration_months_none_for_elastic_and_stage() {
        assert_eq!(StationKind::Elastic.duration_months(), None);
        let stage = StationKind::Stage { window: StageWindow::FromStart { min_months: 36, max_months: 54 } };
        assert_eq!(stage.duration_months(), None);
        assert_eq!(
            StationKind::Splittable { duration_months: 6, split_config: Some((4, 2)) }.duration_months(),
            Some(6)
        );
    }

    #[test]
    fn station_kind_split_config_only_on_splittable() {
        let fixed = StationKind::Fixed { duration_months: 3 };
        assert_eq!(fixed.split_config(), None);
        let splittable = StationKind::Splittable { duration_months: 6, split_config: Some((4, 2)) };
        assert_eq!(splittable.split_config(), Some((4, 2)));
    }
}
