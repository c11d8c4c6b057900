//! Hand-written scenarios from spec.md §8 (S1-S6). Each scenario pins a
//! concrete input and a concrete expected outcome rather than generating
//! random ones — unlike the proptest properties in `properties.rs`, these
//! exercise the solver and validator end to end the way an operator's
//! acceptance test would.
//!
//! S6 ("analyzer flags future deficit") already has a dedicated test in
//! `analyzer.rs` (`future_deficit_is_reported_as_understaffed`) and is not
//! repeated here.

use chrono::NaiveDate;
use resiplan_core::{
    solve, solve_with_relaxation, validate, Department, Model, ProgramConfiguration,
    RelaxationProfile, Resident, SolveStatus, StationCapacity, StationKey, StationMax, StationUpdate,
};

fn resident(name: &str, start: NaiveDate, model: Model, department: Department) -> Resident {
    Resident::new(name, start, model, department)
}

/// S1 — pure A cohort, single resident, empty history, rulebook defaults.
#[test]
fn s1_single_resident_empty_history_solves_feasible() {
    let rulebook = ProgramConfiguration::new().snapshot();
    let mut residents =
        vec![resident("Dana Cohen", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Model::A, Department::A)];

    let solution = solve(&mut residents, &rulebook, 30.0).unwrap();
    assert!(solution.is_feasible(), "expected FEASIBLE/OPTIMAL, got {:?}", solution.status);

    let dana = &residents[0];
    assert_eq!(dana.assignments.len(), 72);

    // Stage A: calendar month June, elapsed month in [36, 54] (hard
    // constraints C6/C8 — true of any feasible solution, not just this one).
    let stage_a_key = rulebook.stage_a_key();
    let stage_a_months: Vec<u32> =
        dana.assignments.iter().filter(|(_, s)| *s == stage_a_key).map(|(&m, _)| m).collect();
    assert_eq!(stage_a_months.len(), 1, "stage A occupies exactly one month");
    let m = stage_a_months[0];
    assert_eq!(dana.calendar_month(m), 6);
    assert!((36..=54).contains(&m));

    // Stage B: calendar month March or November, H - m in [1, 12].
    let stage_b_key = rulebook.stage_b_key();
    let stage_b_months: Vec<u32> =
        dana.assignments.iter().filter(|(_, s)| *s == stage_b_key).map(|(&m, _)| m).collect();
    assert_eq!(stage_b_months.len(), 1);
    let m = stage_b_months[0];
    assert!(matches!(dana.calendar_month(m), 3 | 11));
    assert!((1..=12).contains(&(72 - m)));

    // Durations and immediate precedence hold per the validator's own
    // checks (property 7: validator agrees with solver output).
    let report = validate(&residents, &rulebook, None);
    assert!(report.is_valid(), "unexpected validator errors: {:?}", report.errors);
}

/// S2 — capacity-forced split (4+2). The solver-side half of this scenario
/// (three residents sharing `birth` forcing at least one split) is not
/// reproduced here since nothing else in the default rulebook pins `birth`
/// to a fixed window, so a solver run cannot be guaranteed to produce a
/// split rather than three fully overlapping runs. The validator-side
/// half — that a (4,2) split of a `split_config`-bearing station is an
/// *allowed pattern*, not an error — is fully checkable without a solve.
#[test]
fn s2_preferred_split_is_an_allowed_pattern_warning_only() {
    let rulebook = ProgramConfiguration::new().snapshot();
    let mut resident =
        resident("Noa Levi", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Model::A, Department::A);

    // birth: duration 6, split_config (4, 2). Occupy months 0-3 and 10-11
    // (4 then 2, non-consecutive) and leave the rest of the horizon empty
    // so only the continuity check has anything to say about this station.
    for m in 0..4u32 {
        resident.assignments.insert(m, StationKey::new("birth"));
    }
    for m in 10..12u32 {
        resident.assignments.insert(m, StationKey::new("birth"));
    }

    let report = validate(std::slice::from_ref(&resident), &rulebook, None);
    assert!(report.warnings.iter().any(|d| d.code == "continuity_split_allowed"));
    assert!(!report.errors.iter().any(|d| d.code == "continuity_split_error"));
    assert!(!report.warnings.iter().any(|d| d.code == "continuity_split_nonpreferred"));
}

/// S3 — infeasible before relaxation. Four residents are all pinned, via
/// locked history, into the same station in the same month; the station's
/// capacity is lowered to 2 so the locked month alone exceeds it. A
/// capacity-only conflict is exactly what relaxation profile R1 (drop
/// capacity upper bounds) exists to route around.
#[test]
fn s3_capacity_conflict_infeasible_then_relaxed() {
    let cfg = ProgramConfiguration::new();
    cfg.update_station(
        &StationKey::new("department"),
        StationUpdate { capacity: Some(StationCapacity::new(0, StationMax::Bounded(2))), ..Default::default() },
    )
    .expect("lowering department capacity to 2 is a valid edit");
    let rulebook = cfg.snapshot();

    let mut residents: Vec<Resident> = (0..4)
        .map(|n| {
            let mut r = resident(
                &format!("Resident {n}"),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                Model::A,
                Department::A,
            );
            r.current_month_index = Some(0);
            r.assignments.insert(0, StationKey::new("department"));
            r
        })
        .collect();

    let first = solve(&mut residents, &rulebook, 10.0).unwrap();
    assert_eq!(first.status, SolveStatus::Infeasible);
    // Locked history must survive an infeasible attempt unchanged.
    for r in &residents {
        assert_eq!(r.assignments.get(&0), Some(&StationKey::new("department")));
    }

    let mut residents_for_relaxation = residents.clone();
    let relaxed = solve_with_relaxation(&mut residents_for_relaxation, &rulebook, 10.0).unwrap();
    assert!(relaxed.is_feasible());
    assert_eq!(relaxed.relaxation, Some(RelaxationProfile::R1));

    // Validated against the *original*, non-relaxed rulebook, month 0 at
    // "department" (4 residents, max 2) must surface as a capacity error.
    let report = validate(&residents_for_relaxation, &rulebook, None);
    assert!(report
        .errors
        .iter()
        .any(|d| d.code == "capacity_over" && d.month == Some(0) && d.station.as_ref() == Some(&StationKey::new("department"))));
}

/// S4 — leave-induced extension. `expected_total_months` and
/// `effective_department_months` are exercised directly; the full-solve
/// half (a 77-month solution) is not reproduced here, since the catalog's
/// zero-slack design (see DESIGN.md, "Default rulebook corrections") means
/// an extended horizon's *extra* months must all land on elastic leave
/// stations, something already covered without the solver below.
#[test]
fn s4_leave_extension_formula_and_department_credit() {
    let rulebook = ProgramConfiguration::new().snapshot();
    let mut r = resident("Dana Cohen", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Model::A, Department::A);
    r.maternity_leave_months = 9;
    r.unpaid_leave_months = 2;

    let expected = r.expected_total_months(
        rulebook.base_duration(Model::A),
        rulebook.base_duration(Model::B),
        rulebook.maternity_leave_deduction_limit(),
    );
    assert_eq!(expected, 77);

    // 8 months actually at "department" plus 6 months maternity credit
    // clears the 14-month department requirement.
    for m in 0..8u32 {
        r.assignments.insert(m, StationKey::new("department"));
    }
    let effective = r.effective_department_months(
        rulebook.department_station_key(),
        rulebook.maternity_leave_deduction_limit(),
    );
    assert!(effective >= rulebook.department_base_months() as u32);
    assert_eq!(effective, 8 + 6);
}

/// S5 — history lock enforced. A single locked month at a free-floating,
/// no-ordering-constraint station (`orientation`) is pinned via
/// `current_month_index`; the solver must reproduce exactly that value.
/// Re-running with a different pinned station at the same month shows the
/// lock tracks whatever the input says, not a remembered prior solve.
#[test]
fn s5_history_lock_forces_whatever_the_input_pins() {
    let rulebook = ProgramConfiguration::new().snapshot();

    let mut residents = vec![resident(
        "Dana Cohen",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        Model::A,
        Department::A,
    )];
    residents[0].current_month_index = Some(12);
    residents[0].assignments.insert(5, StationKey::new("orientation"));

    let solution = solve(&mut residents, &rulebook, 30.0).unwrap();
    assert!(solution.is_feasible());
    assert_eq!(residents[0].assignments.get(&5), Some(&StationKey::new("orientation")));

    let mut residents_b = vec![resident(
        "Dana Cohen",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        Model::A,
        Department::A,
    )];
    residents_b[0].current_month_index = Some(12);
    residents_b[0].assignments.insert(5, StationKey::new("maternity_intro"));

    let solution_b = solve(&mut residents_b, &rulebook, 30.0).unwrap();
    assert!(solution_b.is_feasible());
    assert_eq!(residents_b[0].assignments.get(&5), Some(&StationKey::new("maternity_intro")));
}
