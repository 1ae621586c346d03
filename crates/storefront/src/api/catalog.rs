//! Product catalog client.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};
use vitrine_core::{Product, ProductId};

use super::ApiError;
use super::cache::{CacheKey, CacheValue, CatalogExpiry};
use super::client::{ApiClient, parse_json};

/// Client for products and categories.
///
/// Product listings and single products are cached for 5 minutes,
/// categories for 30 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    api: ApiClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a catalog client over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .expire_after(CatalogExpiry)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner { api, cache }),
        }
    }

    /// All products, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<Vec<Product>> = Arc::new(self.inner.api.get_json("/products").await?);
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist,
    /// [`ApiError::MalformedProduct`] if it has a negative price or an
    /// out-of-range rating, or another error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let body = match self.inner.api.get_text(&format!("/products/{id}"), None).await {
            Ok(body) => body,
            Err(ApiError::Status(status)) if status == StatusCode::NOT_FOUND => {
                return Err(not_found(id));
            }
            Err(e) => return Err(e),
        };

        // Unknown ids come back as 200 with an empty body
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(not_found(id));
        }

        let product: Product = parse_json(trimmed)?;
        if !product.is_well_formed() {
            warn!(
                price = %product.price,
                rate = product.rating.rate,
                "Upstream product is malformed"
            );
            return Err(ApiError::MalformedProduct(id));
        }

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Products in `category`, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products_by_category(
        &self,
        category: &str,
    ) -> Result<Arc<Vec<Product>>, ApiError> {
        let key = CacheKey::Category(category.to_string());
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let path = format!("/products/category/{}", urlencoding::encode(category));
        let products: Arc<Vec<Product>> = Arc::new(self.inner.api.get_json(&path).await?);
        self.inner
            .cache
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// All category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Arc<Vec<String>>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Arc<Vec<String>> =
            Arc::new(self.inner.api.get_json("/products/categories").await?);
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;

        Ok(categories)
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

fn not_found(id: ProductId) -> ApiError {
    ApiError::NotFound(format!("Product not found: {id}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use axum::extract::Path;
    use axum::{Json, Router, routing::get};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    use super::*;
    use crate::api::RetryPolicy;

    fn product_json(id: i32, category: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": 10.5,
            "description": "desc",
            "category": category,
            "image": format!("https://fakestoreapi.com/img/{id}.jpg"),
            "rating": { "rate": 4.1, "count": 259 }
        })
    }

    async fn catalog() -> (CatalogClient, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new()
            .route(
                "/products",
                get(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async { Json(json!([product_json(1, "jewelery"), product_json(2, "electronics")])) }
                }),
            )
            .route(
                "/products/categories",
                get(|| async { Json(json!(["electronics", "jewelery", "men's clothing"])) }),
            )
            .route(
                "/products/category/{category}",
                get(|Path(category): Path<String>| async move {
                    Json(json!([product_json(3, &category)]))
                }),
            )
            .route(
                "/products/{id}",
                get(|Path(id): Path<i32>| async move {
                    if id > 20 {
                        String::new()
                    } else if id == 13 {
                        let mut product = product_json(id, "electronics");
                        product["price"] = json!(-1.0);
                        product.to_string()
                    } else {
                        product_json(id, "electronics").to_string()
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let api = ApiClient::new(
            &format!("http://{addr}"),
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap();
        (CatalogClient::new(api), hits)
    }

    #[tokio::test]
    async fn test_get_products_is_cached() {
        let (catalog, hits) = catalog().await;
        let first = catalog.get_products().await.unwrap();
        let second = catalog.get_products().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        catalog.invalidate_cache();
        catalog.get_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_product() {
        let (catalog, _) = catalog().await;
        let product = catalog.get_product(ProductId::new(7)).await.unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.price, Decimal::new(105, 1));
    }

    #[tokio::test]
    async fn test_empty_body_is_not_found() {
        let (catalog, _) = catalog().await;
        let err = catalog.get_product(ProductId::new(999)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected_and_not_cached() {
        let (catalog, _) = catalog().await;
        let err = catalog.get_product(ProductId::new(13)).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedProduct(id) if id == ProductId::new(13)));

        let again = catalog.get_product(ProductId::new(13)).await.unwrap_err();
        assert!(matches!(again, ApiError::MalformedProduct(_)));
    }

    #[tokio::test]
    async fn test_category_is_path_encoded() {
        let (catalog, _) = catalog().await;
        let products = catalog
            .get_products_by_category("men's clothing")
            .await
            .unwrap();
        assert_eq!(products[0].category, "men's clothing");
    }

    #[tokio::test]
    async fn test_get_categories() {
        let (catalog, _) = catalog().await;
        let categories = catalog.get_categories().await.unwrap();
        assert_eq!(categories.len(), 3);
    }
}
