//! Offline evaluation: answer every dataset query, then have the model
//! grade its own answer against the expected one.

pub mod models;

pub use models::{judge_schema, EvaluationRecord, JudgeVerdict, Sample};

use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{CosmosError, Result};
use crate::generation::{parse_json, GenerationRequest, GenerationService, SamplingOverrides};

/// Used when no judge prompt file is available
pub const DEFAULT_JUDGE_PROMPT: &str = "You are a strict grader for an astronomy tutor. \
Compare the answer that was given with the expected answer. \
Reply with a JSON object {\"verdict\": \"Correct\" | \"Partially correct\" | \"Incorrect\", \"total\": <integer score from 0 to 10>}.";

/// Results keyed by question, in dataset order
pub type EvaluationResults = IndexMap<String, EvaluationRecord>;

pub struct Evaluator {
    generation: Arc<GenerationService>,
    judge_prompt: String,
}

impl Evaluator {
    pub fn new(generation: Arc<GenerationService>, judge_prompt: impl Into<String>) -> Self {
        Self {
            generation,
            judge_prompt: judge_prompt.into(),
        }
    }

    /// Read the judge prompt, falling back to [`DEFAULT_JUDGE_PROMPT`]
    pub fn load_judge_prompt(path: &Path) -> String {
        match std::fs::read_to_string(path) {
            Ok(text) => text.trim_end().to_string(),
            Err(e) => {
                warn!(
                    "Judge prompt {} unavailable ({}); using the built-in prompt",
                    path.display(),
                    e
                );
                DEFAULT_JUDGE_PROMPT.to_string()
            }
        }
    }

    pub fn load_dataset(path: &Path) -> Result<Vec<Sample>> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CosmosError::Config(format!("Failed to read dataset {}: {}", path.display(), e))
        })?;
        let samples: Vec<Sample> = serde_json::from_str(&text)?;
        info!("Loaded {} evaluation samples from {}", samples.len(), path.display());
        Ok(samples)
    }

    /// Answer and judge every sample.
    ///
    /// A repeated query keeps its first position and its last result.
    pub async fn run(&self, samples: &[Sample]) -> Result<EvaluationResults> {
        let mut results = EvaluationResults::with_capacity(samples.len());

        for (i, sample) in samples.iter().enumerate() {
            let answer = self.generation.generate_text(sample.query.as_str()).await?;
            let verdict = self.judge(&sample.expected, &answer.text).await?;

            info!(
                "[{}/{}] {:?} -> {} ({})",
                i + 1,
                samples.len(),
                sample.query,
                verdict.verdict,
                verdict.total
            );

            results.insert(
                sample.query.clone(),
                EvaluationRecord {
                    expected: sample.expected.clone(),
                    actual: answer.text,
                    verdict,
                },
            );
        }

        Ok(results)
    }

    /// Grade `actual` against `expected`; unparsable judge output becomes [`JudgeVerdict::error`]
    pub async fn judge(&self, expected: &str, actual: &str) -> Result<JudgeVerdict> {
        let prompt = format!("{}\n\nExpected: {}\nGot: {}", self.judge_prompt, expected, actual);
        let sampling = self.generation.sampling(&SamplingOverrides {
            temperature: Some(0.0),
            ..Default::default()
        });
        let request = GenerationRequest::new(prompt, sampling).with_schema(judge_schema());
        let result = self.generation.generate(request).await?;

        Ok(parse_json::<JudgeVerdict>(&result.text).unwrap_or_else(|e| {
            warn!("Judge output did not parse: {}", e);
            JudgeVerdict::error()
        }))
    }
}

/// Write `results` as pretty JSON
pub fn write_results(path: &Path, results: &EvaluationResults) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;
    info!("Wrote {} evaluation results to {}", results.len(), path.display());
    Ok(())
}
