use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sentiment_api::server::{init_logging, startup};
use sentiment_api::state::{DEFAULT_MAX_UPLOAD_BYTES, ServiceConfig, ServiceState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sentiment Analysis API", long_about = None)]
struct Args {
    #[arg(
        long,
        env = "HOST",
        default_value = "0.0.0.0",
        help = "Host address to bind the server to"
    )]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 5001, help = "Port number to listen on")]
    port: u16,

    #[arg(
        long,
        env = "VECTORIZER_PATH",
        default_value = "tfidf_vectorizer.json",
        help = "Path to the fitted TF-IDF vectorizer exported as JSON"
    )]
    vectorizer_path: PathBuf,

    #[arg(
        long,
        env = "MODEL_PATH",
        default_value = "sentiment_model.json",
        help = "Path to the fitted classifier exported as JSON"
    )]
    model_path: PathBuf,

    #[arg(
        long,
        env = "REQUIRE_ARTIFACTS",
        help = "Refuse to start when the vectorizer or classifier cannot be loaded"
    )]
    require_artifacts: bool,

    #[arg(
        long,
        env = "MAX_UPLOAD_BYTES",
        default_value_t = DEFAULT_MAX_UPLOAD_BYTES,
        help = "Largest accepted size of an uploaded CSV file or text field"
    )]
    max_upload_bytes: usize,

    #[arg(
        long,
        env = "LOG_LEVEL",
        default_value = "info",
        help = "Log level: off, error, warn, info, debug or trace"
    )]
    log_level: log::LevelFilter,
}

impl From<Args> for ServiceConfig {
    fn from(args: Args) -> Self {
        ServiceConfig {
            host: args.host,
            port: args.port,
            vectorizer_path: args.vectorizer_path,
            model_path: args.model_path,
            require_artifacts: args.require_artifacts,
            max_upload_bytes: args.max_upload_bytes,
            log_level: args.log_level,
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from(Args::parse());
    init_logging(config.log_level);

    let state = ServiceState::new(&config)?;
    startup(config, state)
        .await
        .context("HTTP server terminated with an error")
}
