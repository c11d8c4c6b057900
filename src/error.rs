//! Typed configuration errors (spec §7: configuration errors terminate the
//! operation at snapshot/build time; solve outcomes and validation
//! diagnostics are plain data, never `Err`).

use crate::station::StationKey;
use thiserror::Error;

/// Rulebook self-inconsistency, raised at `ProgramConfiguration::snapshot`
/// or `Rulebook::build` time. Never raised mid-solve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("station {key}: duration_months must be non-negative, got {duration_months}")]
    NegativeDuration {
        key: StationKey,
        duration_months: i64,
    },

    #[error("station {key}: min_interns ({min}) must not exceed max_interns ({max})")]
    CapacityOutOfOrder { key: StationKey, min: u32, max: u32 },

    #[error(
        "station {key}: split_config {split_a}+{split_b} does not sum to duration_months {duration_months}"
    )]
    SplitConfigMismatch {
        key: StationKey,
        split_a: u16,
        split_b: u16,
        duration_months: u16,
    },

    #[error("station {key}: split_config present but splittable=false")]
    SplitConfigWithoutSplittable { key: StationKey },

    #[error("duplicate station key {key} within model {model}")]
    DuplicateStationKey { key: StationKey, model: &'static str },

    #[error("immediate-precedence pair ({before}, {after}) references unknown station {missing}")]
    UnknownPrecedenceStation {
        before: StationKey,
        after: StationKey,
        missing: StationKey,
    },

    #[error("stage window [{min}, {max}] is empty")]
    EmptyStageWindow { min: i64, max: i64 },

    #[error("station {key} is unknown in model {model}")]
    UnknownStation { key: StationKey, model: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_out_of_order_message_names_station_and_bounds() {
        let err = ConfigError::CapacityOutOfOrder { key: StationKey::new("birth"), min: 5, max: 2 };
        let message = err.to_string();
        assert!(message.contains("birth"));
        assert!(message.contains('5'));
        assert!(message.contains('2'));
    }

    #[test]
    fn split_config_mismatch_message_names_both_halves() {
        let err = ConfigError::SplitConfigMismatch {
            key: StationKey::new("birth"),
            split_a: 4,
            split_b: 3,
            duration_months: 6,
        };
        assert!(err.to_string().contains("4+3"));
    }

    #[test]
    fn config_errors_are_comparable_for_test_assertions() {
        let a = ConfigError::UnknownStation { key: StationKey::new("x"), model: "A" };
        let b = ConfigError::UnknownStation { key: StationKey::new("x"), model: "A" };
        assert_eq!(a, b);
    }
}
