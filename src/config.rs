use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CorralConfig {
    pub source: SourceConfig,
    pub dataset: DatasetConfig,
    pub embedding: EmbeddingConfig,
    pub clustering: ClusteringConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the msgvault SQLite database (opened read-only).
    pub db_path: String,
    /// Maximum number of emails to sample, newest first.
    pub limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    /// Where `extract` writes the sampled emails (JSON Lines).
    pub sample_path: String,
    /// Where `cluster` writes the clustered emails (JSON Lines).
    pub clustered_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Target number of clusters (K).
    pub clusters: usize,
    /// Seed for centroid initialization. Fixed so reruns reproduce labels.
    pub seed: u64,
    /// Number of independent initialization trials; lowest inertia wins.
    pub init_trials: usize,
    /// Iteration cap per trial.
    pub max_iterations: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for CorralConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            dataset: DatasetConfig::default(),
            embedding: EmbeddingConfig::default(),
            clustering: ClusteringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            db_path: "data/raw/msgvault.db".into(),
            limit: 300,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            sample_path: "data/processed/emails_sample.jsonl".into(),
            clustered_path: "data/processed/emails_clustered.jsonl".into(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_corral_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            clusters: 6,
            seed: 43,
            init_trials: 10,
            max_iterations: 300,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Returns `~/.corral/`
pub fn default_corral_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".corral")
}

/// Returns the default config file path: `~/.corral/config.toml`
pub fn default_config_path() -> PathBuf {
    default_corral_dir().join("config.toml")
}

impl CorralConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CorralConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (CORRAL_DB, CORRAL_CLUSTERS, CORRAL_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CORRAL_DB") {
            self.source.db_path = val;
        }
        if let Ok(val) = std::env::var("CORRAL_CLUSTERS") {
            if let Ok(n) = val.parse::<usize>() {
                self.clustering.clusters = n;
            }
        }
        if let Ok(val) = std::env::var("CORRAL_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Resolve the source database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.source.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CorralConfig::default();
        assert_eq!(config.source.limit, 300);
        assert_eq!(config.embedding.model, "all-MiniLM-L6-v2");
        assert_eq!(config.clustering.clusters, 6);
        assert_eq!(config.clustering.seed, 43);
        assert_eq!(config.clustering.init_trials, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.source.db_path.ends_with("msgvault.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[source]
db_path = "/tmp/vault.db"
limit = 50

[clustering]
clusters = 8
seed = 7

[logging]
level = "debug"
"#;
        let config: CorralConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.db_path, "/tmp/vault.db");
        assert_eq!(config.source.limit, 50);
        assert_eq!(config.clustering.clusters, 8);
        assert_eq!(config.clustering.seed, 7);
        assert_eq!(config.logging.level, "debug");
        // defaults still apply for unset fields
        assert_eq!(config.clustering.init_trials, 10);
        assert_eq!(config.embedding.provider, "local");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = CorralConfig::default();
        std::env::set_var("CORRAL_DB", "/tmp/override.db");
        std::env::set_var("CORRAL_CLUSTERS", "12");
        std::env::set_var("CORRAL_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.source.db_path, "/tmp/override.db");
        assert_eq!(config.clustering.clusters, 12);
        assert_eq!(config.logging.level, "trace");

        // Clean up
        std::env::remove_var("CORRAL_DB");
        std::env::remove_var("CORRAL_CLUSTERS");
        std::env::remove_var("CORRAL_LOG_LEVEL");
    }

    #[test]
    fn malformed_env_cluster_count_ignored() {
        let mut config = CorralConfig::default();
        std::env::set_var("CORRAL_CLUSTERS", "not-a-number");

        config.apply_env_overrides();
        assert_eq!(config.clustering.clusters, 6);

        std::env::remove_var("CORRAL_CLUSTERS");
    }
}
