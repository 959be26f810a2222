use crate::config::ServerConfig;
use crate::error::ServerResult;
use catalog::Catalog;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Catalog loaded at startup, read-only for the process lifetime
    pub catalog: Arc<Catalog>,
}

impl ServerState {
    /// Create server state, loading the catalog from `config.catalog_path`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let catalog = Catalog::load(&config.catalog_path)?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create server state around an already loaded catalog.
    pub fn with_catalog(config: ServerConfig, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }
}
