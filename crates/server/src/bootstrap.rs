use std::sync::Arc;

use catalogo_core::catalog::Catalog;
use catalogo_core::config::{AppConfig, ConfigError, LoadOptions};
use catalogo_core::SharedCatalog;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: SharedCatalog,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config))
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog =
        if config.catalog.seed_demo_data { Catalog::with_demo_data() } else { Catalog::new() };
    info!(
        event_name = "system.bootstrap.catalog_seeded",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        "catalog initialized"
    );

    Application { config, catalog: Arc::new(RwLock::new(catalog)) }
}
