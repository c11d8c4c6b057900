//! Property-based tests (spec.md §8 properties 1, 3, 4), run over randomly
//! generated small inputs rather than full CP-SAT solves — per
//! SPEC_FULL.md, these check that hand-constructed solutions/schedules
//! satisfy the checked invariants, not that a real solve produces one
//! (CP-SAT is comparatively slow to drive from `proptest`).

use chrono::NaiveDate;
use proptest::prelude::*;
use resiplan_core::{validate, Department, Model, ProgramConfiguration, Resident, StationKey};

fn resident_at(model: Model, department: Department) -> Resident {
    Resident::new("R", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), model, department)
}

proptest! {
    /// Property 1 (exclusivity): `AssignmentMap` is a `BTreeMap<month,
    /// station>`, so it cannot represent two stations occupying the same
    /// month by construction — fuzz a random, possibly duplicate-heavy
    /// stream of (month, station) writes and confirm the map that results
    /// always holds exactly one station per distinct month written, with
    /// the later write winning (last-write-wins, never a union of both).
    #[test]
    fn exclusivity_holds_for_any_assignment_stream(
        writes in prop::collection::vec((0u32..20, 0usize..5), 0..40)
    ) {
        let stations = ["orientation", "maternity_intro", "ivf", "gyneco_oncology", "rotation_general"];
        let mut expected_last: std::collections::BTreeMap<u32, &str> = std::collections::BTreeMap::new();
        let mut resident = resident_at(Model::A, Department::A);

        for (month, station_idx) in &writes {
            let key = stations[*station_idx];
            resident.assignments.insert(*month, StationKey::new(key));
            expected_last.insert(*month, key);
        }

        prop_assert_eq!(resident.assignments.len(), expected_last.len());
        for (month, key) in &expected_last {
            prop_assert_eq!(resident.assignments.get(month).map(|k| k.as_str()), Some(*key));
        }
    }

    /// Property 3 (duration faithfulness): a station occupied for exactly
    /// its `duration_months` never triggers `duration_mismatch`; any other
    /// count does.
    #[test]
    fn duration_faithfulness_matches_catalog(
        station_idx in 0usize..4,
        delta in -3i32..=3,
    ) {
        // (key, duration, department-applicable-to-dept-A)
        let stations = [
            ("ivf", 4u16),
            ("gyneco_oncology", 2u16),
            ("womens_er", 3u16),
            ("rotation_general", 2u16),
        ];
        let (key, duration) = stations[station_idx];
        let rulebook = ProgramConfiguration::new().snapshot();
        let mut resident = resident_at(Model::A, Department::A);

        let count = (duration as i32 + delta).max(0) as u32;
        for m in 0..count {
            resident.assignments.insert(m, StationKey::new(key));
        }

        let report = validate(std::slice::from_ref(&resident), &rulebook, None);
        let has_mismatch = report
            .errors
            .iter()
            .any(|d| d.code == "duration_mismatch" && d.station.as_ref() == Some(&StationKey::new(key)));

        if delta == 0 {
            prop_assert!(!has_mismatch, "exact duration count must not be flagged: {:?}", report.errors);
        } else {
            prop_assert!(has_mismatch, "wrong duration count must be flagged: count={count} duration={duration}");
        }
    }

    /// Property 4 (capacity): for a station with known `(min, max)`, the
    /// validator reports `capacity_over` iff the occupying count exceeds
    /// `max`, and never reports it when the count is within bounds.
    #[test]
    fn capacity_over_matches_bound(count in 1u32..8) {
        // ivf: min 2, max 4 (Bounded).
        let rulebook = ProgramConfiguration::new().snapshot();
        let residents: Vec<Resident> = (0..count)
            .map(|n| {
                let mut r = Resident::new(
                    format!("R{n}"),
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    Model::A,
                    Department::A,
                );
                r.assignments.insert(0, StationKey::new("ivf"));
                r
            })
            .collect();

        let report = validate(&residents, &rulebook, None);
        let over = report
            .errors
            .iter()
            .any(|d| d.code == "capacity_over" && d.station.as_ref() == Some(&StationKey::new("ivf")));

        prop_assert_eq!(over, count > 4);
    }
}
