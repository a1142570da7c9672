//! Linkshelf RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.add", "params":{"url":"...","title":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Each request runs as its own task, so a slow metadata lookup does not hold
//! up other calls. Responses may therefore arrive out of request order; clients
//! match them by `id`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use linkshelf::app::App;
use linkshelf::rpc_handler::handle_method;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let app = match App::new(settings_path) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            log::error!("[RPC] Failed to initialize Linkshelf: {}", e);
            std::process::exit(1);
        }
    };

    // Single writer: every response funnels through this channel to stdout.
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = rx.recv().await {
            let line = format!("{}\n", message);
            if let Err(e) = stdout.write_all(line.as_bytes()).await {
                log::error!("[RPC] stdout write failed: {}", e);
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let _ = tx.send(json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}));
    log::info!("[RPC] Ready");

    let mut rate_limiter = RateLimiter::new(200);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                log::error!("[RPC] stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() { continue; }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = tx.send(json!({"id":null,"error":format!("parse error: {}",e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            log::warn!("[RPC] Rate limit exceeded");
            let _ = tx.send(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("").to_string();
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let app = app.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            log::debug!("[RPC] {} (id {})", method, id);
            let response = match handle_method(&app, &method, &params).await {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => json!({"id": id, "error": err}),
            };
            let _ = tx.send(response);
        });
    }

    drop(tx);
    let _ = writer.await;
}
