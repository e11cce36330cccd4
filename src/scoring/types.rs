use serde::{Deserialize, Serialize};

/// One scored entry of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Identifier of the stored entry.
    pub identifier: String,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
}

impl ScoreResult {
    pub fn new(identifier: impl Into<String>, score: f32) -> Self {
        Self {
            identifier: identifier.into(),
            score,
        }
    }
}

impl std::fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.4})", self.identifier, self.score)
    }
}
