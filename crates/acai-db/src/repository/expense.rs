//! # Expense Repository
//!
//! Standalone operating expenses. Not linked to sales or stock.

use acai_core::validation::clamp_limit;
use acai_core::{Expense, NewExpense, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense dated `created_at`, or now when absent.
    pub async fn record(&self, expense: NewExpense) -> DbResult<i64> {
        let expense = expense.validate()?;
        let at = expense.created_at.unwrap_or_else(Utc::now);

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO expenses (created_at, description, amount_cents, category)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(at)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.category)
        .fetch_one(&self.pool)
        .await?;

        info!(expense_id = id, amount = %expense.amount_cents, "Expense recorded");
        Ok(id)
    }

    /// Most recent expenses first.
    pub async fn list(&self, limit: Option<i64>) -> DbResult<Vec<Expense>> {
        let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);

        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, created_at, description, amount_cents, category
            FROM expenses
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
