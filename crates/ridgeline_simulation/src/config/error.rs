use std::path::PathBuf;

/// Errors produced while loading an `EnemyConfig`.
///
/// Out-of-range values are not errors: they are clamped by `EnemyConfig::validated`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
