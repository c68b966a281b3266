//! Dataset and result shapes for offline evaluation

use serde::{Deserialize, Serialize};

/// One dataset entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub query: String,
    pub expected: String,
}

/// The judge's structured assessment of one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub verdict: String,
    pub total: u32,
}

impl JudgeVerdict {
    /// Recorded when the judge output cannot be parsed
    pub fn error() -> Self {
        Self {
            verdict: "Error".to_string(),
            total: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.verdict == "Error" && self.total == 0
    }
}

/// Result entry written to the evaluation dump, keyed by question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub expected: String,
    pub actual: String,
    pub verdict: JudgeVerdict,
}

/// Response schema the judge is asked to follow
pub fn judge_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "verdict": {"type": "STRING"},
            "total": {"type": "INTEGER"}
        },
        "required": ["verdict", "total"]
    })
}
