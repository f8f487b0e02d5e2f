//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cue_cache::{Cache, FileBackend};
use cue_commerce::cart::{CartStore, KvCartRepository};

use crate::config::{CliConfig, StorageBackend};
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["cue.toml", ".cue.toml", "cue.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Get the storage directory.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the configured cart, restoring whatever was persisted.
    pub fn open_store(&self) -> Result<CartStore<KvCartRepository>> {
        let cache = match self.config.storage.backend {
            StorageBackend::File => {
                let dir = self.storage_dir();
                self.output
                    .debug(&format!("Using file storage at {}", dir.display()));
                let backend = FileBackend::open(&dir)
                    .with_context(|| format!("Failed to open storage: {}", dir.display()))?;
                Cache::new(backend)
            }
            StorageBackend::Memory => {
                self.output.debug("Using in-memory storage");
                Cache::in_memory()
            }
        };

        let store_config = self.config.store.clone();
        let repository = KvCartRepository::new(cache, store_config.store_name.clone());
        Ok(CartStore::open(repository, store_config))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_commerce::cart::NewCartItem;
    use cue_commerce::{Currency, Money};

    fn context_in(dir: &Path) -> Context {
        Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".cue.toml"),
            "[store]\nstore_name = \"found\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Context::find_config(&nested).unwrap();
        assert_eq!(config.store.store_name, "found");
    }

    #[test]
    fn test_resolve_path() {
        let ctx = context_in(Path::new("/work"));
        assert_eq!(ctx.resolve_path("/abs/dir"), PathBuf::from("/abs/dir"));
        assert_eq!(ctx.storage_dir(), PathBuf::from("/work/.cue/storage"));
    }

    #[test]
    fn test_open_store_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        let store = ctx.open_store().unwrap();
        store
            .add_item(NewCartItem::new(1u64, "Taco X", Money::new(50000, Currency::COP), 2))
            .unwrap();

        let reopened = ctx.open_store().unwrap();
        assert_eq!(reopened.item_count(), 2);
        assert!(dir.path().join(".cue/storage/cart-storage.json").is_file());
    }

    #[test]
    fn test_memory_backend_is_session_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.config.storage.backend = StorageBackend::Memory;

        let store = ctx.open_store().unwrap();
        store
            .add_item(NewCartItem::new(1u64, "Taco X", Money::new(50000, Currency::COP), 1))
            .unwrap();

        assert!(ctx.open_store().unwrap().is_empty());
    }
}
