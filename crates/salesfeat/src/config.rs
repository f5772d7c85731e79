//! Pipeline configuration.

use salesfeat_features::{DateRange, JoinPolicy};
use serde::{Deserialize, Serialize};

/// Run-time choices for a pipeline run. Window and lag lengths are fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Inclusive sales date range (default 2021-01-08 to 2021-05-30)
    pub date_range: DateRange,
    /// Handling of sales rows without reference matches
    pub join_policy: JoinPolicy,
}

impl PipelineConfig {
    /// Replace the date range.
    pub const fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Replace the join policy.
    pub const fn with_join_policy(mut self, join_policy: JoinPolicy) -> Self {
        self.join_policy = join_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.date_range, DateRange::default());
        assert_eq!(config.join_policy, JoinPolicy::DropAndLog);
    }

    #[test]
    fn test_deserialize() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{
                "date_range": {"min": "2021-02-01", "max": "2021-02-28"},
                "join_policy": "fail-on-mismatch"
            }"#,
        )
        .unwrap();
        assert_eq!(config.join_policy, JoinPolicy::FailOnMismatch);
        assert_eq!(config.date_range.max.to_string(), "2021-02-28");
    }
}
