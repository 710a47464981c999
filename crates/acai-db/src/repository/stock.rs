//! # Stock Repository
//!
//! The stock ledger: an append-only log of inbound and outbound movements.
//!
//! ## Balance Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock_movements (append-only)                                          │
//! │                                                                         │
//! │  #1  Leite   inbound   10   @ 2,50   reason: purchase                   │
//! │  #2  Leite   outbound   4            reason: uso                        │
//! │  #3  Banana  outbound   3                                               │
//! │          │                                                              │
//! │          ▼  GROUP BY product_name (exact string)                        │
//! │                                                                         │
//! │  Banana  in 0   out 3   balance -3   ← negative balances are allowed    │
//! │  Leite   in 10  out 4   balance 6                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Balances are never stored. They are folded from the log on every read and
//! must agree with [`acai_core::fold_balances`].

use acai_core::validation::clamp_limit;
use acai_core::{
    NewStockMovement, StockBalance, StockMovement, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for the stock ledger.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Appends a manual movement and returns its id.
    ///
    /// `total_cost` is `unit_cost × quantity` when a unit cost is given,
    /// otherwise null.
    pub async fn record_movement(&self, movement: NewStockMovement) -> DbResult<i64> {
        let movement = movement.validate()?;

        let mut conn = self.pool.acquire().await?;
        let id = insert_movement(&mut *conn, &movement, None, Utc::now()).await?;

        info!(
            movement_id = id,
            product = %movement.product_name,
            kind = movement.kind.as_str(),
            quantity = %movement.quantity,
            "Stock movement recorded"
        );
        Ok(id)
    }

    /// Per-product balances ordered by name.
    pub async fn balances(&self) -> DbResult<Vec<StockBalance>> {
        let rows = sqlx::query_as::<_, StockBalance>(
            r#"
            SELECT
                product_name,
                COALESCE(SUM(CASE WHEN kind = 'inbound' THEN quantity_milli ELSE 0 END), 0)
                    AS inbound_total,
                COALESCE(SUM(CASE WHEN kind = 'outbound' THEN quantity_milli ELSE 0 END), 0)
                    AS outbound_total,
                COALESCE(SUM(CASE WHEN kind = 'inbound' THEN quantity_milli ELSE -quantity_milli END), 0)
                    AS balance
            FROM stock_movements
            GROUP BY product_name
            ORDER BY product_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recent movements first. `limit` defaults to 500, clamped to
    /// `1..=1000`.
    pub async fn history(&self, limit: Option<i64>) -> DbResult<Vec<StockMovement>> {
        let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);

        let rows = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT
                id,
                product_name,
                kind,
                quantity_milli AS quantity,
                unit_cost_cents,
                total_cost_cents,
                reason,
                purchase_id,
                created_at
            FROM stock_movements
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

/// Inserts one movement on the given connection (pool or transaction).
///
/// The caller must have validated `movement`.
pub(crate) async fn insert_movement(
    conn: &mut SqliteConnection,
    movement: &NewStockMovement,
    purchase_id: Option<i64>,
    at: DateTime<Utc>,
) -> DbResult<i64> {
    debug!(
        product = %movement.product_name,
        kind = movement.kind.as_str(),
        purchase_id,
        "Inserting stock movement"
    );

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO stock_movements (
            product_name, kind, quantity_milli,
            unit_cost_cents, total_cost_cents, reason, purchase_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        RETURNING id
        "#,
    )
    .bind(&movement.product_name)
    .bind(movement.kind)
    .bind(movement.quantity)
    .bind(movement.unit_cost_cents)
    .bind(movement.total_cost())
    .bind(&movement.reason)
    .bind(purchase_id)
    .bind(at)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use acai_core::{fold_balances, Money, MovementKind, Quantity};

    fn units(n: i64) -> Quantity {
        Quantity::from_units(n)
    }

    #[tokio::test]
    async fn test_leite_balance() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = db.stock();

        stock
            .record_movement(
                NewStockMovement::new("Leite", MovementKind::Inbound, units(10))
                    .unit_cost(Money::from_cents(250)),
            )
            .await
            .unwrap();
        stock
            .record_movement(NewStockMovement::new("Leite", MovementKind::Outbound, units(4)))
            .await
            .unwrap();

        let balances = stock.balances().await.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0], StockBalance::new("Leite", units(10), units(4)));
        assert_eq!(balances[0].balance, units(6));

        let history = stock.history(None).await.unwrap();
        let inbound = history.iter().find(|m| m.kind == MovementKind::Inbound).unwrap();
        assert_eq!(inbound.total_cost_cents, Some(Money::from_cents(2500)));
        let outbound = history.iter().find(|m| m.kind == MovementKind::Outbound).unwrap();
        assert_eq!(outbound.unit_cost_cents, None);
        assert_eq!(outbound.total_cost_cents, None);
    }

    #[tokio::test]
    async fn test_negative_balance_allowed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.stock()
            .record_movement(NewStockMovement::new("Granola", MovementKind::Outbound, units(3)))
            .await
            .unwrap();

        let balances = db.stock().balances().await.unwrap();
        assert_eq!(balances[0].balance, units(-3));
    }

    #[tokio::test]
    async fn test_sql_balances_match_fold() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = db.stock();

        let moves = [
            ("Leite", MovementKind::Inbound, Quantity::from_milli(2_500)),
            ("Açaí", MovementKind::Inbound, units(20)),
            ("Leite", MovementKind::Outbound, Quantity::from_milli(750)),
            ("Açaí", MovementKind::Outbound, units(7)),
            ("leite", MovementKind::Inbound, units(1)),
            ("Banana", MovementKind::Outbound, Quantity::from_milli(125)),
            ("Açaí", MovementKind::Outbound, units(15)),
        ];
        for (name, kind, qty) in moves {
            stock
                .record_movement(NewStockMovement::new(name, kind, qty))
                .await
                .unwrap();
        }

        let log = stock.history(Some(1000)).await.unwrap();
        assert_eq!(log.len(), moves.len());

        let folded = fold_balances(&log);
        let from_sql = stock.balances().await.unwrap();
        assert_eq!(folded, from_sql);

        // Exact-name identity: "Leite" and "leite" are separate
        assert_eq!(from_sql.len(), 4);
        let acai = from_sql.iter().find(|b| b.product_name == "Açaí").unwrap();
        assert_eq!(acai.balance, units(-2));
    }

    #[tokio::test]
    async fn test_history_limit_and_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = db.stock();

        for i in 1..=5 {
            stock
                .record_movement(NewStockMovement::new("Copo", MovementKind::Inbound, units(i)))
                .await
                .unwrap();
        }

        let recent = stock.history(Some(2)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].quantity, units(5));
        assert_eq!(recent[1].quantity, units(4));

        // Zero is clamped up to one row
        assert_eq!(stock.history(Some(0)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_movements_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = db.stock();

        let blank = stock
            .record_movement(NewStockMovement::new("", MovementKind::Inbound, units(1)))
            .await;
        assert!(matches!(blank, Err(DbError::Validation(_))));

        let zero = stock
            .record_movement(NewStockMovement::new("Leite", MovementKind::Inbound, Quantity::zero()))
            .await;
        assert!(matches!(zero, Err(DbError::Validation(_))));

        assert!(stock.history(None).await.unwrap().is_empty());
    }
}
