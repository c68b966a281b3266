//! Session-wide token accounting

use super::models::TokenUsage;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals of tokens consumed since process start
#[derive(Debug, Default)]
pub struct SessionTokenCounter {
    input: AtomicU64,
    output: AtomicU64,
    total: AtomicU64,
}

impl SessionTokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one call's usage; a call without usage metadata counts as zero
    pub fn record(&self, usage: Option<&TokenUsage>) {
        if let Some(usage) = usage {
            self.input.fetch_add(usage.input, Ordering::Relaxed);
            self.output.fetch_add(usage.output, Ordering::Relaxed);
            self.total.fetch_add(usage.total, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> TokenUsage {
        TokenUsage {
            input: self.input.load(Ordering::Relaxed),
            output: self.output.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
        }
    }
}
