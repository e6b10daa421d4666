//! RPC method handler for the details screen JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches calls from the UI shell to the `App`.

use std::sync::Mutex;

use log::debug;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::App;
use crate::managers::details_view_model::StateStream;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::author::Author;
use crate::types::view_state::ViewState;

/// Renders a snapshot together with its derived classification.
pub fn state_to_json(state: &ViewState) -> Value {
    json!({
        "is_loading": state.is_loading,
        "is_online": state.is_online,
        "is_offline_loaded": state.is_offline_loaded,
        "is_offline_data_empty": state.is_offline_data_empty(),
        "repos": state.repos,
        "followers_qty": state.followers_qty,
        "origin": state.origin,
        "phase": state.phase(),
        "mode": state.screen_mode(),
    })
}

/// Pushes every new snapshot of `stream` to `sink` as a `details.state`
/// event. Ends when the screen closes or the sink is gone.
pub fn forward_state_events(mut stream: StateStream, sink: UnboundedSender<Value>) {
    tokio::spawn(async move {
        while let Some(state) = stream.changed().await {
            let event = json!({"event": "details.state", "state": state_to_json(&state)});
            if sink.send(event).is_err() {
                break;
            }
        }
        debug!("State event forwarding ended");
    });
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Methods that start loads must run inside a Tokio runtime.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Details screen ───
        "details.open" => {
            let author_value = params.get("author").cloned().ok_or("missing author")?;
            let author: Author = serde_json::from_value(author_value)
                .map_err(|e| format!("invalid author: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let online = params
                .get("online")
                .and_then(|v| v.as_bool())
                .unwrap_or_else(|| a.is_online());
            a.open_details(author, online);
            let stream = a.observe_details().map_err(|e| e.to_string())?;
            let state = stream.current();
            if let Some(sink) = a.event_sink() {
                forward_state_events(stream, sink.clone());
            }
            Ok(state_to_json(&state))
        }
        "details.state" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let state = a.details_state().map_err(|e| e.to_string())?;
            Ok(state_to_json(&state))
        }
        "details.load_last" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            a.load_last_data().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "details.close" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let closed = a.close_details();
            Ok(json!({"closed": closed}))
        }

        // ─── Connectivity ───
        "network.update" => {
            let online = params.get("online").and_then(|v| v.as_bool()).ok_or("missing online")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            a.update_network_status(online);
            Ok(json!({"online": online}))
        }
        "network.status" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"online": a.is_online()}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
