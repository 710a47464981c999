//! # Catalog Repository
//!
//! Products and add-ons. The ledger only reads them; writes exist for the
//! seed tool and tests.

use acai_core::{AddOn, NewCatalogEntry, Product};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for products and add-ons.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Active products ordered by name.
    pub async fn list_active_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, is_active
            FROM products
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Active add-ons ordered by name.
    pub async fn list_active_addons(&self) -> DbResult<Vec<AddOn>> {
        let addons = sqlx::query_as::<_, AddOn>(
            r#"
            SELECT id, name, price_cents, is_active
            FROM add_ons
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(addons)
    }

    pub async fn get_product(&self, id: i64) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, is_active FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))
    }

    pub async fn get_addon(&self, id: i64) -> DbResult<AddOn> {
        sqlx::query_as::<_, AddOn>(
            "SELECT id, name, price_cents, is_active FROM add_ons WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("AddOn", id))
    }

    /// Inserts a product and returns its id.
    pub async fn insert_product(&self, entry: &NewCatalogEntry) -> DbResult<i64> {
        entry.validate()?;
        debug!(name = %entry.name, price = %entry.price_cents, "Inserting product");

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO products (name, price_cents) VALUES (?1, ?2) RETURNING id",
        )
        .bind(&entry.name)
        .bind(entry.price_cents)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Inserts an add-on and returns its id.
    pub async fn insert_addon(&self, entry: &NewCatalogEntry) -> DbResult<i64> {
        entry.validate()?;
        debug!(name = %entry.name, price = %entry.price_cents, "Inserting add-on");

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO add_ons (name, price_cents) VALUES (?1, ?2) RETURNING id",
        )
        .bind(&entry.name)
        .bind(entry.price_cents)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Hides a product from the menu. Past sales keep referencing it.
    pub async fn set_product_active(&self, id: i64, active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET is_active = ?1 WHERE id = ?2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }
}
