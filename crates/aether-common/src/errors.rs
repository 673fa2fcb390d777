use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config write error: {0}")]
    WriteError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AetherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("api error: {0}")]
    Api(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::WriteError("disk full".into());
        assert_eq!(err.to_string(), "config write error: disk full");
    }

    #[test]
    fn aether_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: AetherError = config_err.into();
        assert!(matches!(err, AetherError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn aether_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: AetherError = io_err.into();
        assert!(matches!(err, AetherError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn aether_error_other_variants() {
        let err = AetherError::Api("backend unavailable".into());
        assert_eq!(err.to_string(), "api error: backend unavailable");

        let err = AetherError::Auth("invalid credentials".into());
        assert_eq!(err.to_string(), "auth error: invalid credentials");

        let err = AetherError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
