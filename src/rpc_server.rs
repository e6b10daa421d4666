//! author-details RPC host: JSON-RPC over stdin/stdout for an out-of-process UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"details.open", "params":{"author":{...},"online":true}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Event:    {"event":"details.state", "state":{...}} after each state change
//!           of the open details screen
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use author_details::app::App;
use author_details::rpc_handler::handle_method;
use author_details::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use env_logger::{Env, Target};
use log::{info, warn};
use serde_json::{json, Value};

/// Fixed-window limiter on requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(out: &mut impl Write, response: Value) {
    // a closed stdout means the shell is gone; the read loop ends on its own
    let _ = writeln!(out, "{}", response).and_then(|_| out.flush());
}

fn main() {
    let mut settings_engine = SettingsEngine::new(std::env::var("AUTHOR_DETAILS_CONFIG").ok());
    let level = settings_engine
        .load()
        .map(|s| s.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Stderr)
        .init();

    let runtime = tokio::runtime::Runtime::new().expect("Failed to start Tokio runtime");
    let guard = runtime.enter();

    let mut app = App::new(settings_engine).expect("Failed to initialize author-details");
    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel::<Value>();
    app.set_event_sink(events_tx);
    let app = Mutex::new(app);

    respond(&mut io::stdout().lock(), json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    info!("RPC host ready");

    // stdout is locked per line so events and responses never interleave
    let writer = runtime.spawn_blocking(move || {
        while let Some(event) = events_rx.blocking_recv() {
            respond(&mut io::stdout().lock(), event);
        }
    });

    let mut rate_limiter = RateLimiter::new(200);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Dropping malformed request: {}", e);
                respond(&mut io::stdout().lock(), json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            respond(&mut io::stdout().lock(), json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(&mut io::stdout().lock(), response);
    }

    if let Ok(mut a) = app.lock() {
        a.close_details();
    }
    drop(app);
    info!("RPC host shutting down");

    drop(writer);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));
}
