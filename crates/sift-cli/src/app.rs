//! The `sift` application.
//!
//! [`SiftCli`] owns the loaded configuration and dispatches parsed
//! [`CliArgs`] to command handlers. Handlers render their output to a
//! string so `run` is the only place that writes to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use sift_core::{
    Corpus, Document, DocumentStore, Error, MemoryCache, MemoryDocumentStore, Result, Scope,
};
use sift_search::{SearchOrchestrator, SearchResult};
use sift_text::TextPreprocessor;
use sift_vector::{BackfillOptions, VectorBackfill, Vocabulary, VocabularyBuilder};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command, ConfigAction};
use crate::config::SiftConfig;

// ============================================================================
// SiftCli
// ============================================================================

/// Command-line application over a JSON corpus.
pub struct SiftCli {
    name: String,
    config: SiftConfig,
    version: String,
}

impl SiftCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = SiftConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create an application with an explicit configuration.
    pub fn new(name: impl Into<String>, config: SiftConfig) -> Self {
        Self {
            name: name.into(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the command and print its output.
    pub fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);
        let output = self.execute(args)?;
        if !output.is_empty() {
            println!("{output}");
        }
        Ok(())
    }

    /// Run the command and return what it would print.
    pub fn execute(&self, args: CliArgs) -> Result<String> {
        let corpus = args.corpus.as_deref();
        match args.command {
            Some(Command::Search {
                query,
                limit,
                no_vectors,
                json,
            }) => self.cmd_search(corpus, &query, limit, !no_vectors, json),
            Some(Command::Suggest { prefix, limit }) => self.cmd_suggest(corpus, &prefix, limit),
            Some(Command::Related { id, limit, json }) => self.cmd_related(corpus, &id, limit, json),
            Some(Command::Vocabulary { refresh, show }) => {
                self.cmd_vocabulary(corpus, refresh, show)
            }
            Some(Command::Index { force }) => self.cmd_index(corpus, force),
            Some(Command::Config(cmd)) => match cmd.command {
                ConfigAction::Path => cmd_config_path(args.config.as_deref()),
                ConfigAction::Show => self.config.to_toml_string(),
            },
            Some(Command::Version) => Ok(format!("{} {}", self.name, self.version)),
            None => Ok(format!("{} {} - use --help for usage", self.name, self.version)),
        }
    }

    // ------------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------------

    fn open_corpus(&self, explicit: Option<&str>) -> Result<(PathBuf, Arc<MemoryDocumentStore>)> {
        let path = self.config.corpus_path(explicit)?;
        let corpus = Corpus::load(&path)?;
        Ok((path, Arc::new(MemoryDocumentStore::from_corpus(corpus))))
    }

    fn preprocessor(&self) -> TextPreprocessor {
        TextPreprocessor::new(self.config.text.clone())
    }

    fn orchestrator(&self, store: Arc<MemoryDocumentStore>) -> SearchOrchestrator {
        SearchOrchestrator::new(store, Arc::new(MemoryCache::<Arc<Vocabulary>>::new()))
            .with_config(self.config.search.clone())
            .with_preprocessor(self.preprocessor())
    }

    // ------------------------------------------------------------------------
    // Command handlers
    // ------------------------------------------------------------------------

    fn cmd_search(
        &self,
        corpus: Option<&str>,
        query: &str,
        limit: Option<usize>,
        use_vectors: bool,
        json: bool,
    ) -> Result<String> {
        let (_, store) = self.open_corpus(corpus)?;
        let search = self.orchestrator(store);
        let limit = limit.unwrap_or(self.config.search.default_limit);
        let results = search.search(query, &Scope::approved(), limit, use_vectors)?;
        info!("Search for {query:?} returned {} results", results.len());

        if json {
            return Ok(serde_json::to_string_pretty(&results)?);
        }
        Ok(format_results(&results))
    }

    fn cmd_suggest(&self, corpus: Option<&str>, prefix: &str, limit: Option<usize>) -> Result<String> {
        let (_, store) = self.open_corpus(corpus)?;
        let search = self.orchestrator(store);
        let limit = limit.unwrap_or(self.config.search.suggest_limit);
        Ok(search.suggest(prefix, limit)?.join("\n"))
    }

    fn cmd_related(
        &self,
        corpus: Option<&str>,
        id: &str,
        limit: Option<usize>,
        json: bool,
    ) -> Result<String> {
        let (_, store) = self.open_corpus(corpus)?;
        let source = store
            .document(id)?
            .ok_or_else(|| Error::not_found(format!("document {id}")))?;
        let search = self.orchestrator(store);
        let limit = limit.unwrap_or(self.config.search.related_limit);
        let related = search.find_related(&source, limit)?;

        if json {
            return Ok(serde_json::to_string_pretty(&related)?);
        }
        Ok(format_documents(&related))
    }

    fn cmd_vocabulary(&self, corpus: Option<&str>, refresh: bool, show: usize) -> Result<String> {
        let (_, store) = self.open_corpus(corpus)?;
        let search = self.orchestrator(store);
        let vocabulary = if refresh {
            search.refresh_vocabulary()?
        } else {
            search.current_vocabulary()?
        };
        Ok(format_vocabulary(&vocabulary, show))
    }

    fn cmd_index(&self, corpus: Option<&str>, force: bool) -> Result<String> {
        let (path, store) = self.open_corpus(corpus)?;
        let builder = VocabularyBuilder::new(
            store.clone(),
            Arc::new(MemoryCache::<Arc<Vocabulary>>::new()),
        )
        .with_preprocessor(self.preprocessor())
        .with_config(self.config.search.clone());

        let options = BackfillOptions {
            force,
            ..self.config.index.clone()
        };
        let stats = VectorBackfill::new(store.clone(), store.clone(), Arc::new(builder)).run(&options)?;

        store.to_corpus().save(&path)?;
        info!("Saved {} vectors to {}", store.vector_count(), path.display());
        Ok(format!(
            "Indexed {}: {} processed, {} skipped, {} errors",
            path.display(),
            stats.processed,
            stats.skipped,
            stats.errors
        ))
    }
}

/// Show the resolved config file path.
fn cmd_config_path(config_path: Option<&str>) -> Result<String> {
    let path = SiftConfig::resolve_config_path(config_path).ok_or_else(|| {
        Error::config("Could not determine config directory for this platform")
    })?;
    if path.exists() {
        Ok(path.display().to_string())
    } else {
        Ok(format!("{} (file does not exist)", path.display()))
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(n, r)| {
            format!(
                "{:>3}. [{}] {:.3}  {} ({})",
                n + 1,
                r.search_type,
                r.rank_score,
                r.document.title,
                r.document.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_documents(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No related documents.".to_string();
    }
    documents
        .iter()
        .map(|d| format!("{}\t{}", d.id, d.title))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_vocabulary(vocabulary: &Vocabulary, show: usize) -> String {
    let mut out = format!(
        "{} terms from {} documents",
        vocabulary.len(),
        vocabulary.document_count()
    );

    let mut terms: Vec<(&str, usize)> = vocabulary
        .terms()
        .iter()
        .map(|t| (t.as_str(), vocabulary.document_frequency(t)))
        .collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (term, df) in terms.into_iter().take(show) {
        out.push_str(&format!(
            "\n  {term:<32} df={df:<5} idf={:.3}",
            vocabulary.idf(term)
        ));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
