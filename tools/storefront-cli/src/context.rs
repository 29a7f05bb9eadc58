//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_auth::ClientSession;
use storefront_cache::FileStore;
use storefront_commerce::cart::PersistentCart;
use storefront_commerce::search::{FilterSpec, RecentSearches};
use storefront_data::{AuthClient, CatalogLoad, CatalogLoader, FetchClient, HttpProductSource};

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// The file the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// The local data directory, created on first use.
    pub fn data_dir(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.storage.data_dir)
    }

    /// The file-backed store holding cart, session and history.
    pub fn store(&self) -> Result<FileStore> {
        let dir = self.data_dir();
        FileStore::open(&dir).with_context(|| format!("Failed to open data directory {}", dir.display()))
    }

    pub fn session(&self) -> Result<ClientSession<FileStore>> {
        Ok(ClientSession::load(self.store()?)?)
    }

    pub fn cart(&self) -> Result<PersistentCart<FileStore>> {
        Ok(PersistentCart::load(self.store()?)?)
    }

    pub fn history(&self) -> Result<RecentSearches<FileStore>> {
        Ok(RecentSearches::load(self.store()?)?)
    }

    pub fn fetch_client(&self) -> Result<FetchClient> {
        FetchClient::new(&self.config.api.base_url, self.config.fetch_policy())
            .context("Failed to build HTTP client")
    }

    pub fn auth_client(&self) -> Result<AuthClient> {
        Ok(AuthClient::new(self.fetch_client()?))
    }

    /// Load the catalog behind a spinner, warning when demo data stands in.
    pub async fn load_catalog(&self, spec: &FilterSpec) -> Result<CatalogLoad> {
        let loader = CatalogLoader::new(HttpProductSource::new(self.fetch_client()?));

        let spinner = self.output.spinner("Loading catalog...");
        let load = loader.load(spec).await;
        spinner.finish_and_clear();

        if let Some(notice) = load.notice() {
            self.output.warn(notice);
        }
        Ok(load)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
