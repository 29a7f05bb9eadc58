//! Shared application state and its bootstrap.

use crate::config::ServerConfig;
use std::sync::Arc;
use storefront_auth::AuthService;
use storefront_cache::{CacheError, Collection, FileStore, KvStore, MemoryStore};
use storefront_commerce::catalog::{demo_products, Product};
use tracing::info;

/// The document store behind every collection.
pub type Store = Arc<dyn KvStore>;

pub const PRODUCTS: &str = "products";

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<Store>>,
    pub products: Arc<Collection<Store, Product>>,
}

impl AppState {
    pub fn new(store: Store, auth: AuthService<Store>) -> Self {
        Self {
            products: Arc::new(Collection::new(Arc::clone(&store), PRODUCTS)),
            auth: Arc::new(auth),
        }
    }

    /// Empty in-memory state with default auth settings.
    pub fn in_memory() -> Self {
        let store: Store = Arc::new(MemoryStore::new());
        Self::new(Arc::clone(&store), AuthService::new(store))
    }

    /// Open the configured store, then seed and bootstrap as configured.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Store = match &config.data_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "using file store");
                Arc::new(FileStore::open(dir)?)
            }
            None => {
                info!("using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let auth = AuthService::new(Arc::clone(&store)).with_token_ttl(config.token_ttl_secs());
        let state = Self::new(store, auth);

        if config.seed_demo {
            let seeded = state.seed_demo_products()?;
            if seeded > 0 {
                info!(count = seeded, "seeded demo catalog");
            }
        }
        if let Some(admin) = &config.admin {
            let user = state.auth.ensure_admin(&admin.email, &admin.password)?;
            info!(user_id = %user.id, "administrator account ready");
        }
        let purged = state.auth.purge_expired_tokens()?;
        if purged > 0 {
            info!(count = purged, "purged expired tokens");
        }

        Ok(state)
    }

    /// Insert the demo dataset when the product collection is empty.
    /// Returns the number of products written.
    pub fn seed_demo_products(&self) -> Result<usize, CacheError> {
        if self.products.count()? > 0 {
            return Ok(0);
        }
        let products = demo_products();
        for product in &products {
            self.products.put(product.id.as_str(), product)?;
        }
        Ok(products.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminBootstrap, Environment};

    fn file_config(dir: &std::path::Path) -> ServerConfig {
        ServerConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            data_dir: Some(dir.to_path_buf()),
            token_ttl_hours: 1,
            seed_demo: true,
            admin: Some(AdminBootstrap {
                email: "admin@example.com".to_string(),
                password: "Passw0rdX".to_string(),
            }),
        }
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(dir.path());

        let first = AppState::from_config(&config).unwrap();
        let seeded = first.products.count().unwrap();
        assert_eq!(seeded, demo_products().len());
        let removed = demo_products()[0].id.clone();
        assert!(first.products.delete(removed.as_str()).unwrap());
        drop(first);

        let second = AppState::from_config(&config).unwrap();
        assert_eq!(second.products.count().unwrap(), seeded - 1);
        assert!(second.products.get(removed.as_str()).unwrap().is_none());
        assert_eq!(second.auth.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_seed_only_into_empty_collection() {
        let state = AppState::in_memory();
        let seeded = state.seed_demo_products().unwrap();
        assert_eq!(seeded, demo_products().len());
        assert_eq!(state.seed_demo_products().unwrap(), 0);
        assert_eq!(state.products.count().unwrap(), seeded);
    }
}
