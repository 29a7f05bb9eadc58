//! Product sources and the catalog loader that falls back to demo data.

use crate::client::FetchClient;
use crate::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use storefront_commerce::catalog::{demo_products, normalize_payload, Product, DEMO_NOTICE};
use storefront_commerce::search::FilterSpec;
use tracing::{debug, warn};

/// Page size asked of remote sources. The whole filtered catalog is fetched
/// and paginated locally.
pub const FETCH_ALL_LIMIT: usize = 1000;

/// Upper bound on pages followed for one fetch.
pub const MAX_FETCH_PAGES: usize = 100;

/// Anything that can hand out the products matching a filter.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Products narrowed by `spec`'s filters. Pagination is left to the caller.
    async fn fetch_products(&self, spec: &FilterSpec) -> Result<Vec<Product>, FetchError>;
}

#[async_trait]
impl<P: ProductSource + ?Sized> ProductSource for std::sync::Arc<P> {
    async fn fetch_products(&self, spec: &FilterSpec) -> Result<Vec<Product>, FetchError> {
        (**self).fetch_products(spec).await
    }
}

/// `GET {base}/products` on a REST product API.
///
/// Accepts a bare array or an object holding the array under `data` or
/// `products`. Records are normalized; unreadable ones are skipped. When the
/// response carries `pagination.totalPages`, the remaining pages are fetched
/// too, so the result is the whole filtered catalog.
pub struct HttpProductSource {
    client: FetchClient,
}

impl HttpProductSource {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn fetch_products(&self, spec: &FilterSpec) -> Result<Vec<Product>, FetchError> {
        let mut products = Vec::new();
        let mut page = 1;
        loop {
            let query = spec.clone().with_pagination(page, FETCH_ALL_LIMIT).to_query_pairs();
            let payload: Value = self.client.get_json("/products", &query, None).await?;
            let batch = normalize_payload(&payload).map_err(|e| FetchError::Parse(e.to_string()))?;
            let fetched = batch.len();
            products.extend(batch);

            let last_page = total_pages(&payload).unwrap_or(page);
            if page >= last_page || fetched == 0 {
                break;
            }
            if page >= MAX_FETCH_PAGES {
                warn!(total_pages = last_page, "catalog larger than the page cap, truncating");
                break;
            }
            page += 1;
        }
        debug!(count = products.len(), pages = page, "products fetched");
        Ok(products)
    }
}

/// `totalPages` from a paginated response, top level or under `pagination`.
fn total_pages(payload: &Value) -> Option<usize> {
    ["/pagination/totalPages", "/meta/pagination/totalPages", "/totalPages"]
        .iter()
        .find_map(|ptr| payload.pointer(ptr).and_then(Value::as_u64))
        .map(|n| n as usize)
}

/// Where a loaded catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    Live,
    /// The source failed; `reason` is its error.
    Demo { reason: String },
}

#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub products: Vec<Product>,
    pub origin: CatalogOrigin,
}

impl CatalogLoad {
    pub fn is_demo(&self) -> bool {
        matches!(self.origin, CatalogOrigin::Demo { .. })
    }

    /// Banner text for shoppers while demo data is shown.
    pub fn notice(&self) -> Option<&'static str> {
        self.is_demo().then_some(DEMO_NOTICE)
    }
}

/// Loads the catalog from a [`ProductSource`], substituting the demo dataset
/// when the source fails. Loading never fails.
pub struct CatalogLoader<P> {
    source: P,
}

impl<P: ProductSource> CatalogLoader<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    pub async fn load(&self, spec: &FilterSpec) -> CatalogLoad {
        match self.source.fetch_products(spec).await {
            Ok(products) => CatalogLoad {
                products,
                origin: CatalogOrigin::Live,
            },
            Err(e) => {
                warn!(error = %e, "product source unavailable, serving demo catalog");
                CatalogLoad {
                    products: demo_products(),
                    origin: CatalogOrigin::Demo {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::Money;

    struct Fixed(Result<Vec<Product>, ()>);

    #[async_trait]
    impl ProductSource for Fixed {
        async fn fetch_products(&self, _spec: &FilterSpec) -> Result<Vec<Product>, FetchError> {
            self.0
                .clone()
                .map_err(|_| FetchError::Connection("connection refused".into()))
        }
    }

    #[test]
    fn test_total_pages_locations() {
        assert_eq!(total_pages(&serde_json::json!({"pagination": {"totalPages": 3}})), Some(3));
        assert_eq!(total_pages(&serde_json::json!({"meta": {"pagination": {"totalPages": 2}}})), Some(2));
        assert_eq!(total_pages(&serde_json::json!([1, 2])), None);
    }

    #[tokio::test]
    async fn test_live_catalog() {
        let products = vec![Product::new("1", "Lamp", Money::new(1500))];
        let load = CatalogLoader::new(Fixed(Ok(products.clone())))
            .load(&FilterSpec::new())
            .await;
        assert_eq!(load.origin, CatalogOrigin::Live);
        assert_eq!(load.products, products);
        assert!(load.notice().is_none());
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_demo() {
        let load = CatalogLoader::new(Fixed(Err(()))).load(&FilterSpec::new()).await;
        assert!(load.is_demo());
        assert_eq!(load.products, demo_products());
        assert_eq!(load.notice(), Some(DEMO_NOTICE));
        match load.origin {
            CatalogOrigin::Demo { reason } => assert!(reason.contains("connection refused")),
            CatalogOrigin::Live => panic!("expected demo origin"),
        }
    }
}
