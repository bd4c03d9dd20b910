use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use explainer::config::AppConfig;
use explainer::corpus::Corpus;
use explainer::explain::ExplainService;
use explainer::gemini::GeminiClient;
use explainer::models::ExplainParams;
use explainer::render::{render_body, ResponseFormat};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Html,
    Text,
}

impl From<Format> for ResponseFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Json => ResponseFormat::Json,
            Format::Html => ResponseFormat::Html,
            Format::Text => ResponseFormat::Text,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "explain")]
#[command(about = "Explain a character or term once, using the local book corpus")]
struct Cli {
    #[arg(long, short)]
    query: String,
    #[arg(long, short)]
    source: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let gemini = GeminiClient::new(config.generator.clone());
    let service = ExplainService::new(
        Corpus::new(config.corpus_dir.clone()),
        Arc::new(gemini),
        config.max_occurrences,
    );

    let params = ExplainParams {
        q: Some(cli.query),
        source: cli.source,
    };

    let explanation = service.explain(&params).await?;
    println!("{}", render_body(&explanation, cli.format.into())?);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
