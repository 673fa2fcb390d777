//! Aether client configuration.
//!
//! TOML-based configuration with sensible defaults, so a missing or partial
//! config file works out of the box. Also owns the persisted credentials
//! record (the authenticated user) stored next to the config file.

pub mod credentials;
pub mod schema;
pub mod theme;
pub mod toml_loader;
pub mod toml_writer;

// Re-export core types for convenience
pub use credentials::{CredentialStore, StoredUser};
pub use schema::AppConfig;
pub use theme::Theme;
pub use toml_writer::{save_config, save_config_to_path};

use aether_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creating a default
/// file if none exists.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    toml_loader::load_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_dark_theme() {
        let config = AppConfig::default();
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.theme, config.theme);
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.chat.default_model, config.chat.default_model);
    }
}
