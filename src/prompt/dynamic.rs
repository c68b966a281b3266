//! Length-based prompt branching
//!
//! Token count is the only signal: two or fewer whitespace-separated tokens
//! get a short definition, anything longer gets a structured explanation.

/// Queries with at most this many tokens take the short branch
const SHORT_QUERY_MAX_TOKENS: usize = 2;

pub const SHORT_INSTRUCTION: &str =
    "Answer in very short and simple terms: give a one or two sentence definition.";

pub const LONG_INSTRUCTION: &str =
    "Provide a detailed, structured explanation with 1) Definition 2) Explanation 3) Analogy 4) Summary.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Short,
    Long,
}

impl Branch {
    pub fn for_query(query: &str) -> Self {
        if query.split_whitespace().count() <= SHORT_QUERY_MAX_TOKENS {
            Branch::Short
        } else {
            Branch::Long
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Branch::Short => SHORT_INSTRUCTION,
            Branch::Long => LONG_INSTRUCTION,
        }
    }
}

pub fn build(query: &str) -> String {
    format!("{}\n\nUser Question: {}", Branch::for_query(query).instruction(), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_boundaries() {
        assert_eq!(Branch::for_query("hi"), Branch::Short);
        assert_eq!(Branch::for_query("a b"), Branch::Short);
        assert_eq!(Branch::for_query("  a \t b \n"), Branch::Short);
        assert_eq!(Branch::for_query("a b c"), Branch::Long);
        assert_eq!(Branch::for_query("what is a black hole"), Branch::Long);
        assert_eq!(Branch::for_query(""), Branch::Short);
    }

    #[test]
    fn test_build_uses_branch_instruction() {
        assert!(build("nebula").starts_with(SHORT_INSTRUCTION));
        assert!(build("why do stars twinkle").starts_with(LONG_INSTRUCTION));
    }
}
