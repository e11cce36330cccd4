//! `lodestar <key> <relative-path>`: loads one embedding set, then ranks each stdin line
//! against it and prints one JSON object per query.

use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use lodestar::config::Config;
use lodestar::search::{SearchError, SemanticSearch};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: lodestar [--health-check] <key> <relative-path>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [key, rel_path] = args.as_slice() else {
        anyhow::bail!(USAGE);
    };

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        asset_base = %config.asset_base,
        model = ?config.model_path,
        queue_capacity = config.queue_capacity,
        preload = config.preload_model,
        "Lodestar starting"
    );

    let search = SemanticSearch::new(
        config.asset_source(),
        Arc::new(config.encoder_config()),
        config.worker_options(),
    );

    search
        .ensure_embeddings_loaded(key, rel_path)
        .await
        .with_context(|| format!("loading embedding set {key:?} from {rel_path:?}"))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let output = match search.get_scores(key, query).await {
            Ok(results) => serde_json::json!({ "query": query, "results": results }),
            Err(e @ SearchError::Transport { .. }) => return Err(e.into()),
            Err(e) => {
                tracing::warn!(query, error = %e, "Query failed");
                serde_json::json!({ "query": query, "error": e.to_string() })
            }
        };

        let mut rendered = serde_json::to_vec(&output)?;
        rendered.push(b'\n');
        stdout.write_all(&rendered).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Exit code 0 when the environment configuration is usable.
fn run_health_check() -> i32 {
    let ok = Config::from_env()
        .and_then(|config| config.validate().map(|()| config))
        .is_ok_and(|config| config.encoder_config().validate().is_ok());

    if ok { 0 } else { 1 }
}
