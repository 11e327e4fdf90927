//! Shared setup for command handlers.

use std::sync::Arc;

use circuit_core::storage::Preferences;
use circuit_core::{Catalog, CatalogError, Config, Database};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Config, catalog and store, loaded once per invocation.
pub struct Context {
    pub config: Config,
    pub catalog: Catalog,
    pub db: Arc<Database>,
}

impl Context {
    pub fn load() -> CliResult<Self> {
        let config = Config::load()?;
        let catalog = load_catalog(&config)?;
        let db = Arc::new(Database::open()?);
        Ok(Self {
            config,
            catalog,
            db,
        })
    }

    pub fn preferences(&self) -> Preferences<Arc<Database>> {
        Preferences::new(self.db.clone())
    }

    /// The active program id.
    pub fn program_id(&self) -> CliResult<String> {
        let fallback = self.config.catalog.default_program.as_deref();
        self.preferences()
            .selected_program(&self.catalog, fallback)
            .ok_or_else(|| "catalog has no programs".into())
    }
}

/// The configured catalog directory, or the built-in catalog.
pub fn load_catalog(config: &Config) -> Result<Catalog, CatalogError> {
    match &config.catalog.data_dir {
        Some(dir) => Catalog::load_dir(dir),
        None => Catalog::builtin(),
    }
}
