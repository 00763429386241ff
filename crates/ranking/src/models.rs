use serde::{Deserialize, Serialize};

/// One ranked identity and its score.
///
/// Scores are floating point: a window union sums several partitions and
/// is not guaranteed to stay integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub identity: String,
    pub score: f64,
}

impl Entry {
    pub fn new(identity: impl Into<String>, score: f64) -> Self {
        Self {
            identity: identity.into(),
            score,
        }
    }
}

impl From<(String, f64)> for Entry {
    fn from((identity, score): (String, f64)) -> Self {
        Self { identity, score }
    }
}
