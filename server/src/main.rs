use anyhow::Result;
use axum::Router;
use clap::Parser;
use docsearch_core::{AnalyzerConfig, IndexConfig};
use docsearch_server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Directory uploaded files are stored in
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Maximum request body size for uploads, in MiB
    #[arg(long, default_value_t = 32)]
    max_upload_mb: usize,
    /// Apply English stemming to indexed and query terms
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Index stop words instead of dropping them
    #[arg(long, default_value_t = false)]
    keep_stopwords: bool,
    /// Use 1 + ln(tf) instead of raw term counts
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = AppConfig {
        upload_dir: args.upload_dir,
        index: IndexConfig {
            analyzer: AnalyzerConfig { stem: args.stem, remove_stopwords: !args.keep_stopwords },
            sublinear_tf: args.sublinear_tf,
        },
        max_upload_bytes: args.max_upload_mb * 1024 * 1024,
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
