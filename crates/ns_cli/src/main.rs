use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ns_core::{InferenceModel, Region, SearchRequest};
use ns_inference::models::DummyModel;
use ns_providers::NewsPipeline;
use ns_web::{create_app, AppState};
use tracing::info;

mod config;
mod logging;

use config::ConfigArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, enrich and analyze news articles", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 5002)]
        port: u16,
    },
    /// Run one request and print the JSON response.
    Analyze {
        #[arg(default_value = "latest")]
        query: String,
        #[arg(long, default_value = "general")]
        category: String,
        /// `global` or `indian`
        #[arg(long, default_value = "global")]
        region: String,
        #[arg(long, default_value = "en")]
        language: String,
        /// Use the offline model instead of Gemini.
        #[arg(long)]
        dummy_model: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();
    let config = cli.config.into_pipeline_config();
    info!(?config, "⚙️ Configuration loaded");

    match cli.command {
        Commands::Serve { host, port } => {
            let pipeline = NewsPipeline::from_config(config)?;
            let app = create_app(AppState::new(pipeline));
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("🚀 Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Analyze {
            query,
            category,
            region,
            language,
            dummy_model,
        } => {
            let pipeline = if dummy_model {
                let model: Arc<dyn InferenceModel> = Arc::new(DummyModel::new());
                NewsPipeline::with_model(config, Some(model))?
            } else {
                NewsPipeline::from_config(config)?
            };
            let request = SearchRequest::new(query, category)
                .with_region(Region::parse_lossy(&region))
                .with_language(language);
            let response = pipeline.run(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::try_parse_from(["newsense", "analyze"]).unwrap();
        match cli.command {
            Commands::Analyze {
                query,
                category,
                region,
                dummy_model,
                ..
            } => {
                assert_eq!(query, "latest");
                assert_eq!(category, "general");
                assert_eq!(region, "global");
                assert!(!dummy_model);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_serve_port_flag() {
        let cli = Cli::try_parse_from(["newsense", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: 8080, .. }));
    }
}
