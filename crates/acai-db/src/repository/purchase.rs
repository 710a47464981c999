//! # Purchase Repository
//!
//! Supply purchases. Each purchase is mirrored by exactly one inbound stock
//! movement, written in the same transaction.
//!
//! ```text
//! record_purchase("Leite", 10, 2,50)
//!      │
//!      ▼  BEGIN
//!  INSERT purchases        → purchase_id
//!  INSERT stock_movements  (inbound, 10, 2,50, 25,00, reason "purchase",
//!                           purchase_id)
//!      │
//!      ▼  COMMIT  (both rows or neither)
//! ```

use acai_core::validation::clamp_limit;
use acai_core::{
    MovementKind, NewPurchase, NewStockMovement, Purchase, PurchaseReceipt,
    DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, PURCHASE_MOVEMENT_REASON,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::stock::insert_movement;

#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Records a purchase and its mirrored inbound movement atomically.
    pub async fn record_purchase(&self, purchase: NewPurchase) -> DbResult<PurchaseReceipt> {
        self.record_purchase_at(purchase, Utc::now()).await
    }

    /// Same as [`record_purchase`](Self::record_purchase) with an explicit
    /// timestamp shared by both rows.
    pub async fn record_purchase_at(
        &self,
        purchase: NewPurchase,
        at: DateTime<Utc>,
    ) -> DbResult<PurchaseReceipt> {
        let purchase = purchase.validate()?;
        let total_cost = purchase.total_cost();

        debug!(product = %purchase.product_name, quantity = %purchase.quantity, "Recording purchase");

        let mut tx = self.pool.begin().await?;

        let purchase_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO purchases (
                product_name, quantity_milli, unit_cost_cents, total_cost_cents, note, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(&purchase.product_name)
        .bind(purchase.quantity)
        .bind(purchase.unit_cost_cents)
        .bind(total_cost)
        .bind(&purchase.note)
        .bind(at)
        .fetch_one(&mut *tx)
        .await?;

        let mirror = NewStockMovement {
            product_name: purchase.product_name.clone(),
            kind: MovementKind::Inbound,
            quantity: purchase.quantity,
            unit_cost_cents: purchase.unit_cost_cents,
            reason: Some(PURCHASE_MOVEMENT_REASON.to_string()),
        };
        let movement_id = insert_movement(&mut *tx, &mirror, Some(purchase_id), at).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(purchase_id, movement_id, product = %purchase.product_name, "Purchase recorded");

        Ok(PurchaseReceipt {
            purchase_id,
            movement_id,
        })
    }

    /// Most recent purchases first.
    pub async fn list(&self, limit: Option<i64>) -> DbResult<Vec<Purchase>> {
        let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);

        let rows = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT
                id,
                product_name,
                quantity_milli AS quantity,
                unit_cost_cents,
                total_cost_cents,
                note,
                created_at
            FROM purchases
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use acai_core::{Money, Quantity};

    #[tokio::test]
    async fn test_purchase_mirrors_inbound_movement() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let receipt = db
            .purchases()
            .record_purchase(
                NewPurchase::new("Leite", Quantity::from_units(10))
                    .unit_cost(Money::from_cents(250))
                    .note("Atacadão"),
            )
            .await
            .unwrap();

        let history = db.stock().history(None).await.unwrap();
        assert_eq!(history.len(), 1);
        let movement = &history[0];
        assert_eq!(movement.id, receipt.movement_id);
        assert_eq!(movement.purchase_id, Some(receipt.purchase_id));
        assert_eq!(movement.kind, MovementKind::Inbound);
        assert_eq!(movement.quantity, Quantity::from_units(10));
        assert_eq!(movement.reason.as_deref(), Some("purchase"));
        assert_eq!(movement.total_cost_cents, Some(Money::from_cents(2500)));

        let purchases = db.purchases().list(None).await.unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].total_cost_cents, Some(Money::from_cents(2500)));
        assert_eq!(purchases[0].note.as_deref(), Some("Atacadão"));
        assert_eq!(purchases[0].created_at, movement.created_at);
    }

    #[tokio::test]
    async fn test_purchase_raises_inbound_total() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.stock()
            .record_movement(NewStockMovement::new(
                "Morango",
                MovementKind::Inbound,
                Quantity::from_milli(1_500),
            ))
            .await
            .unwrap();

        db.purchases()
            .record_purchase(NewPurchase::new("Morango", Quantity::from_milli(2_250)))
            .await
            .unwrap();

        let balances = db.stock().balances().await.unwrap();
        assert_eq!(balances[0].inbound_total, Quantity::from_milli(3_750));

        // No unit cost: total cost is null on both rows
        let history = db.stock().history(None).await.unwrap();
        let mirror = history.iter().find(|m| m.purchase_id.is_some()).unwrap();
        assert_eq!(mirror.total_cost_cents, None);
    }

    #[tokio::test]
    async fn test_invalid_purchase_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .purchases()
            .record_purchase(NewPurchase::new("Leite", Quantity::zero()))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        assert!(db.purchases().list(None).await.unwrap().is_empty());
        assert!(db.stock().history(None).await.unwrap().is_empty());

        let err = db
            .purchases()
            .record_purchase(
                NewPurchase::new("Leite", Quantity::from_units(3)).unit_cost(Money::from_cents(i64::MAX / 2)),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(db.purchases().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mirror_rolls_back_purchase() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // The purchase row is inserted before the mirrored movement fails.
        sqlx::query(
            "CREATE TRIGGER block_movements BEFORE INSERT ON stock_movements \
             BEGIN SELECT RAISE(ABORT, 'movimento bloqueado'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db
            .purchases()
            .record_purchase(NewPurchase::new("Leite", Quantity::from_units(10)).unit_cost(Money::from_cents(250)))
            .await
            .unwrap_err();
        assert!(!err.is_validation());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(db.purchases().list(None).await.unwrap().is_empty());
        assert!(db.stock().history(None).await.unwrap().is_empty());
    }
}
