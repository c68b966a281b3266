//! COSMOS binary: one-shot prompts, the HTTP server, ad-hoc search and
//! offline evaluation.

use anyhow::Context;
use clap::Parser;
use cosmos::{
    api::{build_router, AppState, SearchDefaults},
    assistant::Assistant,
    cli::{Cli, Commands},
    config::Config,
    embedding::{EmbeddingClient, EmbeddingProvider},
    evaluation::{self, Evaluator},
    generation::{GeminiClient, GenerationService, SamplingParams},
    observability::init_observability,
    prompt::{PromptSelector, TemplateStore},
    shutdown::shutdown_signal,
    vector_store::{MemoryVectorStore, SemanticIndex, VectorStore},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

/// Everything a command needs, built once from configuration
struct Services {
    assistant: Arc<Assistant>,
    generation: Arc<GenerationService>,
    index: Arc<SemanticIndex>,
}

impl Services {
    fn build(config: &Config) -> anyhow::Result<Self> {
        let gemini = GeminiClient::new(&config.api, &config.generation)?;
        let generation = Arc::new(GenerationService::new(
            Arc::new(gemini),
            SamplingParams::from(&config.generation.defaults),
        ));
        info!("Generation client initialized ({})", config.generation.model);

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(EmbeddingClient::new(&config.api, config.embedding.clone())?);
        info!("Embedding client initialized ({})", config.embedding.model);

        let store: Arc<dyn VectorStore> = match config.vector_store.dimension {
            Some(dimension) => Arc::new(MemoryVectorStore::with_dimension(dimension)),
            None => Arc::new(MemoryVectorStore::new()),
        };
        let index = Arc::new(SemanticIndex::new(embedder.clone(), store));

        let selector = PromptSelector::new(TemplateStore::load_dir(&config.prompts.dir));
        let assistant = Arc::new(Assistant::new(selector, generation.clone(), embedder));

        Ok(Self {
            assistant,
            generation,
            index,
        })
    }

    fn print_usage(&self) {
        let usage = self.generation.usage();
        eprintln!(
            "Token usage: input={} output={} total={}",
            usage.input, usage.output, usage.total
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = Config::load(Some(cli.config.as_path()))
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    init_observability(&config.logging.level, &config.logging.format);

    let services = Services::build(&config)?;

    match cli.command {
        Commands::Invoke {
            mode,
            question,
            sampling,
        } => {
            let query = question.join(" ");
            let reply = services
                .assistant
                .respond(mode, &query, &sampling.into())
                .await?;
            println!("{}", reply.render());
            services.print_usage();
        }
        Commands::Serve { port, host } => {
            let mut server = config.server.clone();
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(host) = host {
                server.host = host;
            }
            serve(&services, &config, &server).await?;
        }
        Commands::Search {
            docs,
            top_k,
            metric,
            query,
        } => {
            services.index.insert_many(&docs).await?;
            let top_k = top_k.unwrap_or(config.vector_store.default_top_k);
            let metric = metric.unwrap_or(config.vector_store.default_metric);

            let hits = services.index.search(&query.join(" "), top_k, metric).await?;
            for (rank, hit) in hits.iter().enumerate() {
                println!("{}. [{:.4}] {}", rank + 1, hit.score, hit.record.text);
            }
        }
        Commands::Evaluate {
            dataset,
            judge_prompt,
            output,
        } => {
            let dataset = dataset.unwrap_or_else(|| config.evaluation.dataset_path.clone());
            let judge_prompt =
                judge_prompt.unwrap_or_else(|| config.evaluation.judge_prompt_path.clone());
            let output = output.unwrap_or_else(|| config.evaluation.output_path.clone());

            let samples = Evaluator::load_dataset(&dataset)?;
            let evaluator = Evaluator::new(
                services.generation.clone(),
                Evaluator::load_judge_prompt(&judge_prompt),
            );
            let results = evaluator.run(&samples).await?;
            evaluation::write_results(&output, &results)?;

            for (question, record) in &results {
                println!("Q: {}", question);
                println!("Model Answer: {}", record.actual);
                println!("Judge: {} ({})", record.verdict.verdict, record.verdict.total);
                println!("---------------");
            }
            services.print_usage();
        }
    }

    Ok(())
}

async fn serve(
    services: &Services,
    config: &Config,
    server: &cosmos::config::ServerConfig,
) -> anyhow::Result<()> {
    let state = AppState {
        assistant: services.assistant.clone(),
        index: services.index.clone(),
        search: SearchDefaults {
            top_k: config.vector_store.default_top_k,
            metric: config.vector_store.default_metric,
        },
    };
    let app = build_router(state, server);

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", server.host, server.port))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
