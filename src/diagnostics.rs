//! Operability report served at `GET /test`.

use serde::Serialize;

use crate::config::Config;
use crate::store::RecordStore;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Never fails: store errors are folded into the `database` field.
pub async fn inspect(store: &dyn RecordStore, config: &Config) -> DiagnosticsReport {
    let (database, collections) = match store.collections().await {
        Ok(mut names) => {
            names.truncate(MAX_COLLECTIONS);
            ("✅ Connected & Working".to_string(), names)
        }
        Err(err) => {
            let message: String = err.to_string().chars().take(MAX_ERROR_CHARS).collect();
            (format!("⚠️  Connected but Error: {message}"), Vec::new())
        }
    };
    DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database,
        database_url: set_marker(config.database_url.is_some()),
        database_name: set_marker(config.database_name.is_some()),
        connection_status: "Connected".to_string(),
        collections,
    }
}

fn set_marker(is_set: bool) -> String {
    if is_set { "✅ Set" } else { "❌ Not Set" }.to_string()
}
