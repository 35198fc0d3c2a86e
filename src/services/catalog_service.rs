use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::Product,
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
};

pub const RELATED_LIMIT: usize = 4;

/// Read-only access to `catalogo.json`.
///
/// The file is read on every call, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct CatalogService {
    path: PathBuf,
}

impl CatalogService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> AppResult<Vec<Product>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            tracing::error!(path = %self.path.display(), error = %err, "catalog read failed");
            AppError::CatalogUnavailable
        })?;
        serde_json::from_slice::<Vec<Product>>(&bytes).map_err(|err| {
            tracing::error!(path = %self.path.display(), error = %err, "catalog is not a product array");
            AppError::CatalogUnavailable
        })
    }

    /// Filtered, sorted page of products plus the total before paging.
    pub async fn list(&self, query: &ProductQuery) -> AppResult<(Vec<Product>, usize)> {
        let products = filter_products(self.load().await?, query);
        let total = products.len();
        let (_, limit, offset) = query.pagination().normalize();
        let page = products
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((page, total))
    }

    pub async fn get(&self, id: &str) -> AppResult<Product> {
        self.load()
            .await?
            .into_iter()
            .find(|product| product.id == id)
            .ok_or(AppError::NotFound)
    }

    /// Every other product, first `limit` in catalog order.
    pub async fn related(&self, id: &str, limit: usize) -> AppResult<Vec<Product>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|product| product.id != id)
            .take(limit)
            .collect())
    }
}

pub fn filter_products(products: Vec<Product>, query: &ProductQuery) -> Vec<Product> {
    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let categoria = query
        .categoria
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);
    let only_available = query.available.unwrap_or(false);

    let mut products: Vec<Product> = products
        .into_iter()
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|n| p.nombre.to_lowercase().contains(n))
        })
        .filter(|p| {
            categoria.as_deref().is_none_or(|c| {
                p.categoria
                    .as_deref()
                    .is_some_and(|pc| pc.to_lowercase() == c)
            })
        })
        .filter(|p| !only_available || p.stock.is_none_or(|s| s > 0))
        .collect();

    if let Some(sort_by) = query.sort_by {
        let order = query.sort_order.unwrap_or(SortOrder::Asc);
        products.sort_by(|a, b| {
            let ord = match sort_by {
                ProductSortBy::Price => a.precio.cmp(&b.precio),
                ProductSortBy::Name => a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()),
            };
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, nombre: &str, precio: i64, categoria: &str, stock: Option<i64>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "nombre": nombre,
            "precio": precio,
            "categoria": categoria,
            "stock": stock,
        }))
        .expect("product")
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Mesa Roble", 250_000, "Mesas", Some(4)),
            product("2", "Silla Nogal", 90_000, "Sillas", Some(0)),
            product("3", "Mesa Lenga", 310_000, "mesas", None),
        ]
    }

    #[test]
    fn search_is_case_insensitive() {
        let query = ProductQuery {
            q: Some("  MESA ".into()),
            ..Default::default()
        };
        let ids: Vec<_> = filter_products(catalog(), &query)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn category_availability_and_sorting() {
        let query = ProductQuery {
            categoria: Some("Mesas".into()),
            sort_by: Some(ProductSortBy::Price),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let ids: Vec<_> = filter_products(catalog(), &query)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["3", "1"]);

        let query = ProductQuery {
            available: Some(true),
            ..Default::default()
        };
        assert_eq!(filter_products(catalog(), &query).len(), 2);
    }

    #[tokio::test]
    async fn missing_catalog_is_unavailable() {
        let catalog = CatalogService::new("does/not/exist.json");
        assert!(matches!(
            catalog.load().await,
            Err(AppError::CatalogUnavailable)
        ));
    }

    #[tokio::test]
    async fn loads_related_products() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalogo.json");
        std::fs::write(&path, serde_json::to_vec(&catalog()).expect("json")).expect("write");

        let service = CatalogService::new(&path);
        assert_eq!(service.get("2").await.expect("get").nombre, "Silla Nogal");
        assert!(matches!(service.get("9").await, Err(AppError::NotFound)));

        let related = service.related("1", RELATED_LIMIT).await.expect("related");
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|p| p.id != "1"));

        let (page, total) = service
            .list(&ProductQuery {
                per_page: Some(1),
                page: Some(2),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(total, 3);
        assert_eq!(page[0].id, "2");
    }

    #[tokio::test]
    async fn huge_page_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalogo.json");
        std::fs::write(&path, serde_json::to_vec(&catalog()).expect("json")).expect("write");

        let (page, total) = CatalogService::new(&path)
            .list(&ProductQuery {
                page: Some(i64::MAX),
                per_page: Some(100),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(total, 3);
        assert!(page.is_empty());
    }
}
