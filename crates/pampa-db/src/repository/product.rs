//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Derived Price
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Price Is Never Hand-Set                              │
//! │                                                                         │
//! │  Operator edits:    cost = $2500.00    margin = 30%                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository derives:                                                    │
//! │       price = cost × (1 + margin)  →  $3250.00                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Stored in price_cents, rewritten on every insert/update.              │
//! │                                                                         │
//! │  A price that drifts from its cost+margin would mean someone wrote     │
//! │  the column directly. The repository never provides that path.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Search
//! Catalog search is a LIKE scan over title and category under the NOCASE
//! indexes. The catalog is a few hundred rows of dietética stock; a
//! full-text index would be more machinery than data.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pampa_core::{Money, Product};

/// Fields the operator controls when creating a product.
///
/// `price_cents` is intentionally absent: the repository derives it.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: Option<String>,
    pub cost_cents: i64,
    /// Margin over cost in basis points (3000 = 30%).
    pub margin_bps: i64,
    pub stock: i64,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub image_url: Option<String>,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Search products
/// let results = repo.search("almendra", 20).await?;
///
/// // Get by ID (the id doubles as the barcode)
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product, deriving its sale price from cost and margin.
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let price = Money::price_from_cost(Money::from_cents(new.cost_cents), new.margin_bps);

        debug!(id = %id, title = %new.title, price = %price, "Inserting product");

        let product = Product {
            id: id.clone(),
            title: new.title,
            description: new.description,
            cost_cents: new.cost_cents,
            margin_bps: new.margin_bps,
            price_cents: price.cents(),
            stock: new.stock,
            category: new.category,
            supplier: new.supplier,
            image_url: new.image_url,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, description, cost_cents, margin_bps, price_cents,
                stock, category, supplier, image_url,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.cost_cents)
        .bind(product.margin_bps)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.supplier)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates an existing product.
    ///
    /// The sale price is always rewritten from cost and margin; whatever the
    /// caller left in `price_cents` is ignored.
    ///
    /// ## Errors
    /// `NotFound` if the product doesn't exist.
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        let now = Utc::now();
        let price = Money::price_from_cost(product.cost(), product.margin_bps);

        debug!(id = %product.id, price = %price, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                title = ?2,
                description = ?3,
                cost_cents = ?4,
                margin_bps = ?5,
                price_cents = ?6,
                stock = ?7,
                category = ?8,
                supplier = ?9,
                image_url = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.cost_cents)
        .bind(product.margin_bps)
        .bind(price.cents())
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.supplier)
        .bind(&product.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        self.get_by_id(&product.id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &product.id))
    }

    /// Gets a product by its ID.
    ///
    /// The id doubles as the barcode, so a scanner lookup lands here too.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, cost_cents, margin_bps, price_cents,
                stock, category, supplier, image_url,
                created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products sorted by title.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, cost_cents, margin_bps, price_cents,
                stock, category, supplier, image_url,
                created_at, updated_at
            FROM products
            ORDER BY title COLLATE NOCASE
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Searches products by title or category, case-insensitively.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list(limit).await;
        }

        let pattern = format!("%{}%", query);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, cost_cents, margin_bps, price_cents,
                stock, category, supplier, image_url,
                created_at, updated_at
            FROM products
            WHERE title LIKE ?1 OR category LIKE ?1
            ORDER BY title COLLATE NOCASE
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Adjusts a product's stock by a relative delta.
    ///
    /// ## Why Relative
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ❌ WRONG: read stock, write stock − 3 (loses concurrent sales)    │
    /// │  ✅ RIGHT: UPDATE products SET stock = stock - 3                   │
    /// │                                                                     │
    /// │  Terminal A sells 3 and terminal B sells 2 at the same moment:     │
    /// │  both deltas land, stock drops by 5. No floor: drift below zero    │
    /// │  is a stocktaking problem, not a write conflict.                   │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales, positive for restocking)
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = stock + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Movement lines snapshot the title and price at sale time, so ledger
    /// history survives the delete.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample() -> NewProduct {
        NewProduct {
            title: "Harina de Almendras 500g".to_string(),
            description: Some("Sin TACC".to_string()),
            cost_cents: 250_000,
            margin_bps: 3_000,
            stock: 12,
            category: Some("Harinas".to_string()),
            supplier: Some("Dicomere".to_string()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_derives_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(sample()).await.unwrap();
        // 2500.00 + 30% margin = 3250.00
        assert_eq!(product.price_cents, 325_000);

        let stored = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 325_000);
    }

    #[tokio::test]
    async fn test_update_rederives_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut product = repo.insert(sample()).await.unwrap();
        product.cost_cents = 300_000;
        product.price_cents = 1; // Ignored: price always follows cost and margin.

        let updated = repo.update(&product).await.unwrap();
        assert_eq!(updated.price_cents, 390_000);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(sample()).await.unwrap();
        repo.insert(NewProduct {
            title: "Aceite de coco 360ml".to_string(),
            category: Some("Aceites".to_string()),
            ..sample()
        })
        .await
        .unwrap();

        let by_title = repo.search("almendra", 20).await.unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Harina de Almendras 500g");

        let by_category = repo.search("aceites", 20).await.unwrap();
        assert_eq!(by_category.len(), 1);

        let all = repo.search("", 20).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_allows_negative() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(sample()).await.unwrap();
        repo.adjust_stock(&product.id, -15).await.unwrap();

        let stored = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, -3);
    }

    #[tokio::test]
    async fn test_delete_removes_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(sample()).await.unwrap();
        repo.delete(&product.id).await.unwrap();
        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());

        let err = repo.delete(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
