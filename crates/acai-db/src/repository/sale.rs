//! # Sale Repository
//!
//! The sale ledger: atomic recording and read-back of sales.
//!
//! ## Sale Recording
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record_sale(draft, operator)                      │
//! │                                                                         │
//! │  1. PRICE (pure, acai-core)                                            │
//! │     └── draft.price() → PricedSale { subtotals, frozen total }         │
//! │         (validation errors stop here; nothing is written)              │
//! │                                                                         │
//! │  2. BEGIN                                                              │
//! │     ├── INSERT sales             (total_cents = frozen total)          │
//! │     ├── INSERT sale_items        (one per line)                        │
//! │     └── INSERT sale_item_addons  (one per add-on)                      │
//! │                                                                         │
//! │  3. COMMIT                                                             │
//! │     └── any failure before this point drops the transaction,           │
//! │         which rolls back header, items and add-ons together            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never updated or deleted. `total_cents` is never recomputed on
//! read; it is returned exactly as frozen.

use std::collections::HashMap;

use acai_core::{
    SaleDetail, SaleDraft, SaleFilter, SaleItem, SaleItemAddOn, SaleLine, SaleReceipt,
    SaleSummary, SALES_PAGE_SIZE,
};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::push_date_range;

/// Header columns shared by listing and detail reads.
const SUMMARY_SELECT: &str = r#"
    SELECT
        s.id,
        s.created_at,
        s.total_cents,
        s.delivery_fee_cents,
        s.channel_id,
        c.name AS channel_name,
        s.payment_method_id,
        pm.name AS payment_method_name,
        s.operator_id,
        o.name AS operator_name,
        s.note
    FROM sales s
    LEFT JOIN channels c ON c.id = s.channel_id
    LEFT JOIN payment_methods pm ON pm.id = s.payment_method_id
    JOIN operators o ON o.id = s.operator_id
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale timestamped now.
    pub async fn record_sale(&self, draft: SaleDraft, operator_id: i64) -> DbResult<SaleReceipt> {
        self.record_sale_at(draft, operator_id, Utc::now()).await
    }

    /// Records a sale with an explicit timestamp (back-dated entry).
    ///
    /// ## Errors
    /// - `DbError::Validation` - the draft failed pricing; nothing written
    /// - `DbError::ForeignKeyViolation` - unknown product, add-on, channel,
    ///   payment method or operator; the whole sale was rolled back
    /// - other variants - store failure; the whole sale was rolled back
    pub async fn record_sale_at(
        &self,
        draft: SaleDraft,
        operator_id: i64,
        at: DateTime<Utc>,
    ) -> DbResult<SaleReceipt> {
        let priced = draft.price()?;

        debug!(
            operator_id,
            lines = priced.lines.len(),
            total = %priced.total,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        let sale_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sales (
                created_at, total_cents, delivery_fee_cents,
                channel_id, payment_method_id, operator_id, note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
        )
        .bind(at)
        .bind(priced.total)
        .bind(priced.delivery_fee)
        .bind(priced.channel_id)
        .bind(priced.payment_method_id)
        .bind(operator_id)
        .bind(&priced.note)
        .fetch_one(&mut *tx)
        .await?;

        for line in &priced.lines {
            let item_id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_id, quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING id
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.subtotal)
            .fetch_one(&mut *tx)
            .await?;

            for addon in &line.addons {
                sqlx::query(
                    r#"
                    INSERT INTO sale_item_addons (
                        sale_item_id, addon_id, quantity, unit_price_cents, subtotal_cents
                    ) VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(item_id)
                .bind(addon.addon_id)
                .bind(addon.quantity)
                .bind(addon.unit_price)
                .bind(addon.subtotal)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id, total = %priced.total, "Sale recorded");

        Ok(SaleReceipt {
            sale_id,
            total_cents: priced.total,
        })
    }

    /// Returns the full sale tree with product and add-on names.
    pub async fn get_sale(&self, sale_id: i64) -> DbResult<SaleDetail> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SUMMARY_SELECT);
        qb.push(" WHERE s.id = ").push_bind(sale_id);

        let sale = qb
            .build_query_as::<SaleSummary>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT
                si.id,
                si.sale_id,
                si.product_id,
                p.name AS product_name,
                si.quantity,
                si.unit_price_cents,
                si.subtotal_cents
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = ?1
            ORDER BY si.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        let addons = sqlx::query_as::<_, SaleItemAddOn>(
            r#"
            SELECT
                a.id,
                a.sale_item_id,
                a.addon_id,
                ao.name AS addon_name,
                a.quantity,
                a.unit_price_cents,
                a.subtotal_cents
            FROM sale_item_addons a
            JOIN sale_items si ON si.id = a.sale_item_id
            JOIN add_ons ao ON ao.id = a.addon_id
            WHERE si.sale_id = ?1
            ORDER BY a.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_item: HashMap<i64, Vec<SaleItemAddOn>> = HashMap::new();
        for addon in addons {
            by_item.entry(addon.sale_item_id).or_default().push(addon);
        }

        let items = items
            .into_iter()
            .map(|item| SaleLine {
                addons: by_item.remove(&item.id).unwrap_or_default(),
                item,
            })
            .collect();

        Ok(SaleDetail { sale, items })
    }

    /// Lists sales newest first, capped at [`SALES_PAGE_SIZE`] rows.
    ///
    /// Date bounds are inclusive and compare the UTC calendar date of
    /// `created_at`, so a sale at 23:59:59 on `to` is included.
    pub async fn list_sales(&self, filter: &SaleFilter) -> DbResult<Vec<SaleSummary>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SUMMARY_SELECT);
        qb.push(" WHERE 1 = 1");

        push_date_range(&mut qb, "s.created_at", &filter.range);

        if let Some(channel_id) = filter.channel_id {
            qb.push(" AND s.channel_id = ").push_bind(channel_id);
        }
        if let Some(payment_method_id) = filter.payment_method_id {
            qb.push(" AND s.payment_method_id = ").push_bind(payment_method_id);
        }

        qb.push(" ORDER BY s.created_at DESC, s.id DESC LIMIT ")
            .push_bind(SALES_PAGE_SIZE);

        let sales = qb
            .build_query_as::<SaleSummary>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::operator::NewOperator;
    use crate::{Database, DbConfig};
    use acai_core::{DateRange, DraftAddOn, DraftLine, Money, OperatorRole};
    use chrono::{NaiveDate, TimeZone};

    // Seeded ids: product 1 = Copo 500ml, add-on 1 = Banana,
    // channel 1 = iFood, payment method 1 = Pix.

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let operator_id = db
            .operators()
            .insert(&NewOperator {
                name: "Caixa".to_string(),
                email: "caixa@megaacai".to_string(),
                password_hash: "x".to_string(),
                role: OperatorRole::Operator,
            })
            .await
            .unwrap();
        (db, operator_id)
    }

    fn cup_with_banana() -> SaleDraft {
        SaleDraft::new()
            .line(
                DraftLine::new(1, Money::from_cents(1800))
                    .addon(DraftAddOn::new(1, Money::from_cents(300)).quantity(2)),
            )
            .delivery_fee(Money::from_cents(500))
            .channel(1)
            .payment_method(1)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let (db, operator_id) = setup().await;

        let receipt = db.sales().record_sale(cup_with_banana(), operator_id).await.unwrap();
        assert_eq!(receipt.total_cents, Money::from_cents(2900));

        let detail = db.sales().get_sale(receipt.sale_id).await.unwrap();
        assert_eq!(detail.sale.total_cents, Money::from_cents(2900));
        assert_eq!(detail.sale.delivery_fee_cents, Money::from_cents(500));
        assert_eq!(detail.sale.channel_name.as_deref(), Some("iFood"));
        assert_eq!(detail.sale.payment_method_name.as_deref(), Some("Pix"));
        assert_eq!(detail.sale.operator_name, "Caixa");

        assert_eq!(detail.items.len(), 1);
        let line = &detail.items[0];
        assert_eq!(line.item.product_name, "Copo 500ml");
        assert_eq!(line.item.quantity, 1);
        assert_eq!(line.item.subtotal_cents, Money::from_cents(1800));
        assert_eq!(line.addons.len(), 1);
        assert_eq!(line.addons[0].addon_name, "Banana");
        assert_eq!(line.addons[0].quantity, 2);
        assert_eq!(line.addons[0].subtotal_cents, Money::from_cents(600));
    }

    #[tokio::test]
    async fn test_persisted_total_matches_children() {
        let (db, operator_id) = setup().await;

        let draft = SaleDraft::new()
            .line(
                DraftLine::new(1, Money::from_cents(1800))
                    .quantity(3)
                    .addon(DraftAddOn::new(2, Money::from_cents(600)))
                    .addon(DraftAddOn::new(3, Money::from_cents(600)).quantity(2)),
            )
            .line(DraftLine::new(1, Money::from_cents(1500)).quantity(0))
            .delivery_fee(Money::from_cents(700));

        let receipt = db.sales().record_sale(draft, operator_id).await.unwrap();
        let detail = db.sales().get_sale(receipt.sale_id).await.unwrap();

        let mut children = Money::zero();
        for line in &detail.items {
            assert_eq!(
                line.item.subtotal_cents,
                line.item.unit_price_cents * line.item.quantity
            );
            children += line.item.subtotal_cents;
            for addon in &line.addons {
                assert_eq!(addon.subtotal_cents, addon.unit_price_cents * addon.quantity);
                children += addon.subtotal_cents;
            }
        }

        assert_eq!(detail.sale.total_cents, children + detail.sale.delivery_fee_cents);
        assert_eq!(detail.sale.total_cents.cents(), 5400 + 600 + 1200 + 1500 + 700);
    }

    #[tokio::test]
    async fn test_empty_sale_writes_nothing() {
        let (db, operator_id) = setup().await;

        let err = db
            .sales()
            .record_sale(SaleDraft::new().delivery_fee(Money::from_cents(500)), operator_id)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let sales = db.sales().list_sales(&SaleFilter::default()).await.unwrap();
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_whole_sale() {
        let (db, operator_id) = setup().await;

        // Second line references a product that does not exist: the header
        // and first line are inserted before the failure.
        let draft = SaleDraft::new()
            .line(DraftLine::new(1, Money::from_cents(1800)))
            .line(DraftLine::new(9_999, Money::from_cents(1000)));

        let err = db.sales().record_sale(draft, operator_id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let sales = db.sales().list_sales(&SaleFilter::default()).await.unwrap();
        assert!(sales.is_empty());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_unknown_addon_rolls_back() {
        let (db, operator_id) = setup().await;

        let draft = SaleDraft::new().line(
            DraftLine::new(1, Money::from_cents(1800))
                .addon(DraftAddOn::new(424_242, Money::from_cents(100))),
        );
        assert!(db.sales().record_sale(draft, operator_id).await.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let (db, _) = setup().await;
        let err = db.sales().get_sale(12345).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_date_bounds_inclusive() {
        let (db, operator_id) = setup().await;
        let sales = db.sales();

        let before = Utc.with_ymd_and_hms(2024, 4, 30, 23, 59, 59).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let last_second = Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        for at in [before, start, last_second, next_day] {
            sales.record_sale_at(cup_with_banana(), operator_id, at).await.unwrap();
        }

        let filter = SaleFilter {
            range: DateRange::new(Some(day(2024, 5, 1)), Some(day(2024, 5, 31))),
            ..Default::default()
        };
        let listed = sales.list_sales(&filter).await.unwrap();

        let stamps: Vec<_> = listed.iter().map(|s| s.created_at).collect();
        // Newest first
        assert_eq!(stamps, vec![last_second, start]);
    }

    #[tokio::test]
    async fn test_list_filters_by_channel_and_payment() {
        let (db, operator_id) = setup().await;
        let sales = db.sales();

        sales.record_sale(cup_with_banana(), operator_id).await.unwrap();
        sales
            .record_sale(cup_with_banana().channel(4).payment_method(2), operator_id)
            .await
            .unwrap();
        sales
            .record_sale(
                SaleDraft::new().line(DraftLine::new(1, Money::from_cents(1800))),
                operator_id,
            )
            .await
            .unwrap();

        let by_channel = sales
            .list_sales(&SaleFilter {
                channel_id: Some(4),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_channel.len(), 1);
        assert_eq!(by_channel[0].channel_name.as_deref(), Some("WhatsApp"));
        assert_eq!(by_channel[0].payment_method_name.as_deref(), Some("Dinheiro"));

        let by_payment = sales
            .list_sales(&SaleFilter {
                payment_method_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_payment.len(), 1);

        let all = sales.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        // Sale without a channel still lists, with no channel name
        assert!(all.iter().any(|s| s.channel_id.is_none() && s.channel_name.is_none()));
    }
}
