//! # Reference Repository
//!
//! Delivery channels and payment methods.

use acai_core::validation::validate_required_text;
use acai_core::{Channel, PaymentMethod};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    pool: SqlitePool,
}

impl ReferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReferenceRepository { pool }
    }

    pub async fn channels(&self) -> DbResult<Vec<Channel>> {
        let rows = sqlx::query_as::<_, Channel>("SELECT id, name FROM channels ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn payment_methods(&self) -> DbResult<Vec<PaymentMethod>> {
        let rows =
            sqlx::query_as::<_, PaymentMethod>("SELECT id, name FROM payment_methods ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn insert_channel(&self, name: &str) -> DbResult<i64> {
        validate_required_text("name", name)?;
        debug!(name, "Inserting channel");

        let id = sqlx::query_scalar::<_, i64>("INSERT INTO channels (name) VALUES (?1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn insert_payment_method(&self, name: &str) -> DbResult<i64> {
        validate_required_text("name", name)?;
        debug!(name, "Inserting payment method");

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO payment_methods (name) VALUES (?1) RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}
