//! Prompt selection: turns a mode and a raw query into the final prompt text

pub mod dynamic;
pub mod templates;

pub use templates::{TemplateStore, QUERY_MARKER};

use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

use crate::error::{PromptError, Result};

/// How a raw query becomes a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptMode {
    System,
    ZeroShot,
    OneShot,
    MultiShot,
    Dynamic,
    ChainOfThought,
    Structured,
    FunctionCall,
    Embeddings,
}

impl PromptMode {
    pub const ALL: [PromptMode; 9] = [
        PromptMode::System,
        PromptMode::ZeroShot,
        PromptMode::OneShot,
        PromptMode::MultiShot,
        PromptMode::Dynamic,
        PromptMode::ChainOfThought,
        PromptMode::Structured,
        PromptMode::FunctionCall,
        PromptMode::Embeddings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::System => "system",
            PromptMode::ZeroShot => "zeroShot",
            PromptMode::OneShot => "oneShot",
            PromptMode::MultiShot => "multiShot",
            PromptMode::Dynamic => "dynamic",
            PromptMode::ChainOfThought => "chainOfThought",
            PromptMode::Structured => "structured",
            PromptMode::FunctionCall => "functionCall",
            PromptMode::Embeddings => "embeddings",
        }
    }

    /// Template file for template-backed modes
    pub fn template_file(&self) -> Option<&'static str> {
        match self {
            PromptMode::System => Some("system.txt"),
            PromptMode::ZeroShot => Some("zero_shot.txt"),
            PromptMode::OneShot => Some("one_shot.txt"),
            PromptMode::MultiShot => Some("multi_shot.txt"),
            PromptMode::ChainOfThought => Some("chain_of_thought.txt"),
            PromptMode::Dynamic
            | PromptMode::Structured
            | PromptMode::FunctionCall
            | PromptMode::Embeddings => None,
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = PromptError;

    /// Accepts `zeroShot`, `zero_shot`, `zero-shot` and any casing thereof
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "system" => Ok(PromptMode::System),
            "zeroshot" => Ok(PromptMode::ZeroShot),
            "oneshot" => Ok(PromptMode::OneShot),
            "multishot" => Ok(PromptMode::MultiShot),
            "dynamic" => Ok(PromptMode::Dynamic),
            "chainofthought" | "cot" => Ok(PromptMode::ChainOfThought),
            "structured" => Ok(PromptMode::Structured),
            "functioncall" | "functioncalling" => Ok(PromptMode::FunctionCall),
            "embeddings" | "embedding" => Ok(PromptMode::Embeddings),
            _ => Err(PromptError::UnknownMode(s.to_string())),
        }
    }
}

/// Instruction prefix for `structured` mode
pub const STRUCTURED_INSTRUCTION: &str = "Respond ONLY with a single valid JSON object, without Markdown fences or commentary. \
Use exactly these keys: \"term\", \"definition\", \"explanation\", \"analogy\", \"summary\"; every value is a string.";

/// Response schema matching [`STRUCTURED_INSTRUCTION`]
pub fn structured_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "term": {"type": "STRING"},
            "definition": {"type": "STRING"},
            "explanation": {"type": "STRING"},
            "analogy": {"type": "STRING"},
            "summary": {"type": "STRING"}
        },
        "required": ["term", "definition", "explanation", "analogy", "summary"]
    })
}

/// Maps a mode and query to the final prompt text
#[derive(Debug, Clone, Default)]
pub struct PromptSelector {
    templates: TemplateStore,
}

impl PromptSelector {
    pub fn new(templates: TemplateStore) -> Self {
        Self { templates }
    }

    /// Build the prompt for `mode`
    pub fn select(&self, mode: PromptMode, query: &str) -> String {
        match mode {
            PromptMode::System
            | PromptMode::ZeroShot
            | PromptMode::OneShot
            | PromptMode::MultiShot
            | PromptMode::ChainOfThought => self.from_template(mode, query),
            PromptMode::Dynamic => dynamic::build(query),
            PromptMode::Structured => {
                format!("{}\n\nUser Question: {}", STRUCTURED_INSTRUCTION, query)
            }
            PromptMode::FunctionCall | PromptMode::Embeddings => query.to_string(),
        }
    }

    /// Parse `mode` by name, then build the prompt
    pub fn select_named(&self, mode: &str, query: &str) -> Result<String> {
        let mode: PromptMode = mode.parse()?;
        Ok(self.select(mode, query))
    }

    fn from_template(&self, mode: PromptMode, query: &str) -> String {
        match self.templates.get(mode) {
            Some(template) => templates::fill(template, query),
            None => templates::fallback(query),
        }
    }
}
