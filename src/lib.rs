//! Constraint model, solver driver, validator and capacity analyzer for
//! residency rotation scheduling (spec.md §1, §2).

pub mod analyzer;
pub mod error;
pub mod model;
pub mod resident;
pub mod rulebook;
pub mod solver;
pub mod station;
pub mod validator;

pub use analyzer::{analyze, CapacityIssue, CapacityReport, IssueSeverity, MonthBottleneck, MonthlySummary, SummaryCounts};
pub use error::ConfigError;
pub use model::{build_constraint_model, DecisionVars, ModelBuilderContext};
pub use resident::{AssignmentMap, Resident};
pub use rulebook::{Department, GlobalUpdate, Model, ProgramConfiguration, RelaxationProfile, Rulebook, StationUpdate};
pub use solver::{solve, solve_with_relaxation, SolveStatus, Solution};
pub use station::{
    DepartmentScope, SplitConfig, Station, StationCapacity, StationKey, StationKind, StationMax, StageWindow,
};
pub use validator::{remediation_hint, validate, Diagnostic, Severity, ValidationReport};
