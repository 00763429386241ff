use ranking::{AggregatorOptions, DayBoundary, DerivedKeyMode};
use serde::{Deserialize, Serialize};

/// Loaded from `RANKING_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Ranking namespace, e.g. "articles". `--namespace` takes precedence.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
    /// Timezone deciding which day's partition a write lands in.
    #[serde(default)]
    pub day_boundary: DayBoundary,
    /// `shared` keeps the fixed window key names, `per_request` isolates readers.
    #[serde(default)]
    pub derived_keys: DerivedKeyMode,
    #[serde(default = "default_allow_negative_deltas")]
    pub allow_negative_deltas: bool,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".into()
}

fn default_allow_negative_deltas() -> bool {
    true
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            allow_negative_deltas: self.allow_negative_deltas,
            derived_keys: self.derived_keys,
        }
    }
}
