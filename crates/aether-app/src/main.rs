mod cli;
mod repl;

use tracing_subscriber::EnvFilter;

use aether_client::ApiConfig;
use aether_config::{AppConfig, CredentialStore};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root (aether/) — two levels up from crates/aether-app/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn load_config(args: &cli::Args) -> AppConfig {
    let result = match &args.config {
        Some(path) => aether_config::toml_loader::load_from_path(std::path::Path::new(path)),
        None => aether_config::load_config(),
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        AppConfig::default()
    })
}

/// Resolve the backend base URL: CLI flag, then `AETHER_API_URL`, then the
/// config file.
fn resolve_api(args: &cli::Args, config: &AppConfig) -> ApiConfig {
    match &args.api_url {
        Some(url) => ApiConfig::new(url),
        None => match std::env::var("AETHER_API_URL") {
            Ok(url) if !url.trim().is_empty() => ApiConfig::new(url.trim()),
            _ => ApiConfig::new(&config.api.base_url),
        },
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    load_dotenv();

    // Parse CLI arguments
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("aether=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "aether=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Aether v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args);
    tracing::info!("Config loaded (theme: {})", config.theme);

    let api = resolve_api(&args, &config);
    tracing::info!("Backend: {}", api.base_url);

    let store = match CredentialStore::default_store() {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!("Credential store unavailable: {e}");
            None
        }
    };

    let model = args
        .model
        .clone()
        .unwrap_or_else(|| config.chat.default_model.clone());

    let mut app = repl::App::new(api, store, model);
    if let Err(e) = app.run().await {
        tracing::error!("Terminal loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
