//! Application wiring and command dispatch.

use crate::cli::{CliArgs, Command};
use crate::config::WortschatzConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wortschatz_api::AppState;
use wortschatz_core::Result;
use wortschatz_gen::{ListeningGenerator, OpenRouterProvider};
use wortschatz_retrieval::{seed_directory, LancedbCatalog, VocabRetriever};

/// The Wortschatz CLI application.
pub struct WortschatzApp {
    config: WortschatzConfig,
    version: String,
}

impl WortschatzApp {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = WortschatzConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create with an explicit config.
    pub fn new(config: WortschatzConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &WortschatzConfig {
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

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Version) => {
                println!("wortschatz {}", self.version);
                Ok(())
            }
            Some(Command::Health) => {
                println!("wortschatz: healthy");
                println!("  index path: {}", self.config.retrieval.db_path);
                Ok(())
            }
            Some(Command::Serve { port }) => self.serve(port).await,
            Some(Command::Seed { dataset, db }) => self.seed(&dataset, db.as_deref()).await,
            None => {
                println!("wortschatz {} — use --help for usage", self.version);
                Ok(())
            }
        }
    }

    /// Start the HTTP API server.
    async fn serve(&self, port_override: Option<u16>) -> Result<()> {
        let retrieval = &self.config.retrieval;
        let catalog = Arc::new(LancedbCatalog::connect(&retrieval.db_path).await?);
        let retriever = Arc::new(VocabRetriever::with_fastembed(catalog, retrieval));

        let api_key = self.config.llm_api_key()?;
        let mut provider = OpenRouterProvider::new(api_key, self.config.llm.model.clone());
        if let Some(base_url) = &self.config.llm.base_url {
            provider = provider.with_base_url(base_url.clone());
        }
        let generator = ListeningGenerator::new(Arc::clone(&retriever), Arc::new(provider));

        let state = Arc::new(AppState {
            retriever,
            generator,
        });

        let port = port_override.unwrap_or(self.config.server.port);
        wortschatz_api::serve(&self.config.server.host, port, state).await
    }

    /// Seed per-level tables from a dataset directory.
    async fn seed(&self, dataset: &str, db_override: Option<&str>) -> Result<()> {
        let db_path = db_override.unwrap_or(&self.config.retrieval.db_path);
        let seeded = seed_directory(
            db_path,
            std::path::Path::new(dataset),
            self.config.retrieval.dimension,
        )
        .await?;

        if seeded.is_empty() {
            println!("no records_*.json files found in {dataset}");
        }
        for (table, count) in seeded {
            println!("seeded {count} record(s) into '{table}'");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_app_new() {
        let app = WortschatzApp::new(WortschatzConfig::default());
        assert_eq!(app.config().server.port, 3000);
    }

    #[test]
    fn test_app_from_args_with_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [server]
                port = 9090
            "#,
        )
        .unwrap();

        let args = CliArgs::parse_from(["wortschatz", "--config", path.to_str().unwrap()]);
        let app = WortschatzApp::from_args(&args).unwrap();
        assert_eq!(app.config().server.port, 9090);
    }

    #[tokio::test]
    async fn test_run_version_command() {
        let app = WortschatzApp::new(WortschatzConfig::default());
        let args = CliArgs::parse_from(["wortschatz", "version"]);
        assert!(app.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_health_command() {
        let app = WortschatzApp::new(WortschatzConfig::default());
        let args = CliArgs::parse_from(["wortschatz", "health"]);
        assert!(app.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_no_command() {
        let app = WortschatzApp::new(WortschatzConfig::default());
        let args = CliArgs::parse_from(["wortschatz"]);
        assert!(app.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_seed_empty_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset = dir.path().join("dataset");
        std::fs::create_dir(&dataset).unwrap();

        let mut config = WortschatzConfig::default();
        config.retrieval.db_path = dir.path().join("db").to_str().unwrap().to_string();
        let app = WortschatzApp::new(config);

        let args = CliArgs::parse_from([
            "wortschatz",
            "seed",
            "--dataset",
            dataset.to_str().unwrap(),
        ]);
        assert!(app.run(args).await.is_ok());
    }

    #[test]
    fn test_init_logging_does_not_panic() {
        let app = WortschatzApp::new(WortschatzConfig::default());
        app.init_logging(false, false);
        app.init_logging(true, false);
        app.init_logging(false, true);
    }
}
