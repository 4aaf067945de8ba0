//! Blogsync RPC server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.add", "params":{"post":{...}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; filter them with `RUST_LOG`.

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blogsync::app::App;
use blogsync::config::SyncConfig;
use blogsync::platform;
use blogsync::rpc_handler::handle_method;

async fn respond(stdout: &mut io::Stdout, response: Value) -> io::Result<()> {
    stdout.write_all(format!("{}\n", response).as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let mut config = SyncConfig::load(config_path.as_deref())?;
    config.apply_env();
    if config.data_dir.is_none() {
        config.data_dir = Some(platform::default_data_dir());
    }

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to initialize blogsync");
            return Err(e);
        }
    };

    let mut stdout = io::stdout();
    respond(&mut stdout, json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;
    info!("blogsync rpc ready");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&mut stdout, json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(&mut stdout, response).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
