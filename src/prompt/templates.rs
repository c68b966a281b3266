//! Prompt templates loaded once from disk

use super::PromptMode;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Substitution marker replaced by the user query
pub const QUERY_MARKER: &str = "{{query}}";

/// Read-only set of templates keyed by mode
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<PromptMode, String>,
}

impl TemplateStore {
    /// Load every template-backed mode from `dir`.
    ///
    /// Missing or unreadable files are skipped with a warning; those modes
    /// fall back to a bare `User Question:` prompt.
    pub fn load_dir(dir: &Path) -> Self {
        let mut templates = HashMap::new();

        for mode in PromptMode::ALL {
            let Some(file_name) = mode.template_file() else {
                continue;
            };
            let path = dir.join(file_name);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    if text.matches(QUERY_MARKER).count() > 1 {
                        warn!(
                            "Template {} has more than one {} marker; only the first is filled",
                            path.display(),
                            QUERY_MARKER
                        );
                    }
                    templates.insert(mode, text.trim_end().to_string());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(
                        "Template {} not found; {} will use the fallback prompt",
                        path.display(),
                        mode
                    );
                }
                Err(e) => {
                    warn!(
                        "Failed to read template {}: {}; {} will use the fallback prompt",
                        path.display(),
                        e,
                        mode
                    );
                }
            }
        }

        info!("Loaded {} prompt templates from {}", templates.len(), dir.display());
        Self { templates }
    }

    /// Build a store from in-memory templates
    pub fn from_templates(templates: impl IntoIterator<Item = (PromptMode, String)>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
        }
    }

    pub fn get(&self, mode: PromptMode) -> Option<&str> {
        self.templates.get(&mode).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Fill `template` with `query`, verbatim.
///
/// A template without a marker is treated as a system preamble and the
/// query is appended after it.
pub fn fill(template: &str, query: &str) -> String {
    if template.contains(QUERY_MARKER) {
        template.replacen(QUERY_MARKER, query, 1)
    } else {
        format!("{}\n\nUser Question: {}", template, query)
    }
}

/// Prompt used when a mode's template is unavailable
pub fn fallback(query: &str) -> String {
    format!("User Question: {}", query)
}
