//! Configuration for the `sift` command.
//!
//! [`SiftConfig`] loads from a TOML file, environment variables, and
//! defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `SIFT_CONFIG` environment variable
//! 3. XDG default: `~/.config/sift/config.toml`
//! 4. Built-in defaults
//!
//! `SIFT_<SECTION>_<KEY>` variables override file values.

use std::path::PathBuf;

use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use sift_core::{Error, Result, SearchConfig};
use sift_text::PreprocessorConfig;
use sift_vector::BackfillOptions;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SIFT_CONFIG";

const ENV_PREFIX: &str = "SIFT";

// ============================================================================
// Configuration structs
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Where documents and vectors live.
    pub corpus: CorpusConfig,

    /// Retrieval engine tunables.
    pub search: SearchConfig,

    /// Tokenization settings.
    pub text: PreprocessorConfig,

    /// Vector backfill settings.
    pub index: BackfillOptions,
}

/// Corpus location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Path to the corpus JSON file.
    pub path: Option<String>,
}

// ============================================================================
// Config loading
// ============================================================================

impl SiftConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                log::debug!("Reading config from {}", path.display());
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("corpus");
        env_opts.add_section("search");
        env_opts.add_section("text");
        env_opts.add_section("index");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sift").join("config.toml"))
    }

    /// The corpus file, preferring `explicit` over the configured path.
    pub fn corpus_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        explicit
            .or(self.corpus.path.as_deref())
            .map(PathBuf::from)
            .ok_or_else(|| {
                Error::config("no corpus configured; pass --corpus or set corpus.path")
            })
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that read or write process environment variables.
    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// RAII guard for env var manipulation in tests.
    struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }

        fn remove(key: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe { std::env::remove_var(key) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(val) => unsafe { std::env::set_var(&self.key, val) },
                None => unsafe { std::env::remove_var(&self.key) },
            }
        }
    }

    // ------------------------------------------------------------------------
    // Defaults and serialization
    // ------------------------------------------------------------------------

    #[test]
    fn test_sift_config_default() {
        let config = SiftConfig::default();
        assert!(config.corpus.path.is_none());
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.text.min_token_len, 2);
        assert_eq!(config.index.batch_size, 100);
    }

    #[test]
    fn test_sift_config_partial_toml() {
        let toml_str = r#"
            [corpus]
            path = "/data/experiences.json"

            [search]
            similarity_threshold = 0.05

            [text]
            char_ngrams = 3
        "#;

        let config: SiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.corpus.path.as_deref(), Some("/data/experiences.json"));
        assert_eq!(config.search.similarity_threshold, 0.05);
        assert_eq!(config.search.default_limit, 100);
        assert_eq!(config.text.char_ngrams, 3);
        assert!(config.text.fold_diacritics);
    }

    #[test]
    fn test_sift_config_to_toml() {
        let config = SiftConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("max_vocabulary_terms = 1000"));

        let parsed: SiftConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_corpus_path_resolution() {
        let mut config = SiftConfig::default();
        assert!(matches!(config.corpus_path(None), Err(Error::Config(_))));

        config.corpus.path = Some("/configured.json".into());
        assert_eq!(config.corpus_path(None).unwrap(), PathBuf::from("/configured.json"));
        assert_eq!(
            config.corpus_path(Some("/flag.json")).unwrap(),
            PathBuf::from("/flag.json")
        );
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    #[test]
    fn test_sift_config_load_from_file() {
        let _lock = env_lock();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [corpus]
                path = "/srv/corpus.json"
                [search]
                related_limit = 3
            "#,
        )
        .unwrap();

        let config = SiftConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.corpus.path.as_deref(), Some("/srv/corpus.json"));
        assert_eq!(config.search.related_limit, 3);
    }

    #[test]
    fn test_sift_config_load_missing_file_uses_defaults() {
        let _lock = env_lock();
        let config = SiftConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_sift_config_load_env_overlay() {
        let _lock = env_lock();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [corpus]
                path = "/from/file.json"
            "#,
        )
        .unwrap();

        let _guard = EnvGuard::new("SIFT_CORPUS_PATH", "/from/env.json");
        let config = SiftConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.corpus.path.as_deref(), Some("/from/env.json"));
    }

    // ------------------------------------------------------------------------
    // resolve_config_path
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = SiftConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_resolve_config_path_env() {
        let _lock = env_lock();
        let _guard = EnvGuard::new(CONFIG_ENV_VAR, "/env/config.toml");
        let path = SiftConfig::resolve_config_path(None);
        assert_eq!(path, Some(PathBuf::from("/env/config.toml")));
    }

    #[test]
    fn test_resolve_config_path_default() {
        let _lock = env_lock();
        let _guard = EnvGuard::remove(CONFIG_ENV_VAR);
        if let Some(path) = SiftConfig::resolve_config_path(None) {
            let p = path.to_string_lossy();
            assert!(p.contains("sift"));
            assert!(p.ends_with("config.toml"));
        }
    }
}
