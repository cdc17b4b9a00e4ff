//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Search a corpus of free-text experiences.
#[derive(Parser, Debug)]
#[command(name = "sift", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "SIFT_CONFIG", global = true)]
    pub config: Option<String>,

    /// Corpus JSON file (overrides `corpus.path`).
    #[arg(long, global = true)]
    pub corpus: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search approved documents.
    Search {
        /// Query text.
        query: String,

        /// Maximum number of results (defaults to `search.default_limit`).
        #[arg(short, long)]
        limit: Option<usize>,

        /// Skip vector search and use substring matching only.
        #[arg(long)]
        no_vectors: bool,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest titles for a typed prefix.
    Suggest {
        /// Title prefix.
        prefix: String,

        /// Maximum number of suggestions.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List documents related to a document.
    Related {
        /// Source document id.
        id: String,

        /// Maximum number of related documents.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print documents as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Inspect the search vocabulary.
    Vocabulary {
        /// Rebuild instead of using a cached copy.
        #[arg(long)]
        refresh: bool,

        /// Also list this many of the most frequent terms.
        #[arg(long, default_value = "0")]
        show: usize,
    },

    /// Generate missing or stale document vectors and save the corpus.
    Index {
        /// Rebuild the vocabulary and regenerate every vector.
        #[arg(short, long)]
        force: bool,
    },

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let args = CliArgs::parse_from(["sift", "search", "machine learning", "-l", "5", "--json"]);
        match args.command {
            Some(Command::Search {
                query,
                limit,
                no_vectors,
                json,
            }) => {
                assert_eq!(query, "machine learning");
                assert_eq!(limit, Some(5));
                assert!(!no_vectors);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["sift", "index", "--force", "--corpus", "c.json", "-v"]);
        assert_eq!(args.corpus.as_deref(), Some("c.json"));
        assert!(args.verbose);
        assert!(matches!(args.command, Some(Command::Index { force: true })));
    }

    #[test]
    fn test_parse_vocabulary_defaults() {
        let args = CliArgs::parse_from(["sift", "vocabulary"]);
        assert!(matches!(
            args.command,
            Some(Command::Vocabulary {
                refresh: false,
                show: 0
            })
        ));
    }

    #[test]
    fn test_parse_config_show() {
        let args = CliArgs::parse_from(["sift", "config", "show"]);
        match args.command {
            Some(Command::Config(cmd)) => assert!(matches!(cmd.command, ConfigAction::Show)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_command() {
        let args = CliArgs::parse_from(["sift"]);
        assert!(args.command.is_none());
    }
}
