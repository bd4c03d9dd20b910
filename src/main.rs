use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use explainer::corpus::Corpus;
use explainer::explain::ExplainService;
use explainer::gemini::GeminiClient;
use explainer::{run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env()?;
    let corpus = Corpus::new(config.corpus_dir.clone());
    tracing::info!("serving corpus from {}", corpus.dir().display());

    let gemini = GeminiClient::new(config.generator.clone());
    let explain = ExplainService::new(corpus, Arc::new(gemini), config.max_occurrences);

    run_server(config, explain).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
