//! Command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::generation::SamplingOverrides;
use crate::prompt::PromptMode;
use crate::vector_store::SimilarityMetric;

/// COSMOS: an astronomy tutor built on prompt engineering over Gemini
#[derive(Parser, Debug)]
#[command(name = "cosmos", version)]
pub struct Cli {
    /// Configuration file (TOML); missing files are ignored
    #[arg(long, global = true, env = "COSMOS_CONFIG", default_value = "cosmos.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one question in the given prompt mode and print the answer
    Invoke {
        /// system, zeroShot, oneShot, multiShot, dynamic, chainOfThought,
        /// structured, functionCall or embeddings
        mode: PromptMode,

        /// The question; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Run the HTTP server
    Serve {
        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,
    },

    /// Embed the given documents and print the closest ones to a query
    Search {
        /// Document to index; repeat for several
        #[arg(long = "doc", required = true)]
        docs: Vec<String>,

        #[arg(long)]
        top_k: Option<usize>,

        /// cosine, euclidean or dot
        #[arg(long)]
        metric: Option<SimilarityMetric>,

        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Answer and judge every entry of a dataset, writing a results file
    Evaluate {
        #[arg(long)]
        dataset: Option<PathBuf>,

        #[arg(long)]
        judge_prompt: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Per-call sampling flags; unset flags keep the configured defaults
#[derive(Args, Debug, Clone, Default)]
pub struct SamplingArgs {
    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub top_p: Option<f32>,

    #[arg(long)]
    pub top_k: Option<u32>,

    /// Stop sequence; repeat for several
    #[arg(long = "stop")]
    pub stop_sequences: Vec<String>,

    #[arg(long)]
    pub max_output_tokens: Option<u32>,
}

impl From<SamplingArgs> for SamplingOverrides {
    fn from(args: SamplingArgs) -> Self {
        Self {
            temperature: args.temperature,
            top_p: args.top_p,
            top_k: args.top_k,
            max_output_tokens: args.max_output_tokens,
            stop_sequences: args.stop_sequences,
        }
    }
}
