//! # Report Repository
//!
//! Read-only aggregates over persisted sales. Every call recomputes from the
//! sale tables; nothing is cached.
//!
//! ```text
//! top_products   Σ sale_items.quantity        GROUP BY product   DESC
//! top_addons     Σ sale_item_addons.quantity  GROUP BY add-on    DESC
//! revenue_by_day Σ sales.total_cents          GROUP BY UTC day   ASC
//! ```

use acai_core::validation::clamp_limit;
use acai_core::{
    DailyRevenue, DateRange, Money, RankingEntry, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DbError, DbResult};
use crate::repository::push_date_range;

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Best-selling products by quantity. `limit` defaults to 10.
    pub async fn top_products(&self, range: &DateRange, limit: Option<i64>) -> DbResult<Vec<RankingEntry>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT p.name AS name, SUM(si.quantity) AS quantity
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            JOIN products p ON p.id = si.product_id
            WHERE 1 = 1
            "#,
        );
        push_date_range(&mut qb, "s.created_at", range);
        qb.push(" GROUP BY p.name ORDER BY quantity DESC, p.name ASC LIMIT ")
            .push_bind(clamp_limit(limit, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT));

        let rows = qb
            .build_query_as::<RankingEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Most requested add-ons by quantity. `limit` defaults to 10.
    pub async fn top_addons(&self, range: &DateRange, limit: Option<i64>) -> DbResult<Vec<RankingEntry>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT ao.name AS name, SUM(a.quantity) AS quantity
            FROM sale_item_addons a
            JOIN sale_items si ON si.id = a.sale_item_id
            JOIN sales s ON s.id = si.sale_id
            JOIN add_ons ao ON ao.id = a.addon_id
            WHERE 1 = 1
            "#,
        );
        push_date_range(&mut qb, "s.created_at", range);
        qb.push(" GROUP BY ao.name ORDER BY quantity DESC, ao.name ASC LIMIT ")
            .push_bind(clamp_limit(limit, DEFAULT_REPORT_LIMIT, MAX_REPORT_LIMIT));

        let rows = qb
            .build_query_as::<RankingEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue per UTC calendar day, ascending. Days without sales are
    /// omitted.
    pub async fn revenue_by_day(&self, range: &DateRange) -> DbResult<Vec<DailyRevenue>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT date(s.created_at) AS day, SUM(s.total_cents) AS total_cents
            FROM sales s
            WHERE 1 = 1
            "#,
        );
        push_date_range(&mut qb, "s.created_at", range);
        qb.push(" GROUP BY date(s.created_at) ORDER BY day ASC");

        let rows: Vec<(String, Money)> = qb.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|(day, total)| {
                DailyRevenue::from_sql_day(&day, total).map_err(|e| DbError::Internal(e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::operator::NewOperator;
    use crate::{Database, DbConfig};
    use acai_core::{DraftAddOn, DraftLine, NewCatalogEntry, OperatorRole, SaleDraft};
    use chrono::{NaiveDate, TimeZone, Utc};

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

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_rankings() {
        let (db, operator_id) = setup().await;
        let small = db
            .catalog()
            .insert_product(&NewCatalogEntry {
                name: "Copo 300ml".to_string(),
                price_cents: Money::from_cents(1200),
            })
            .await
            .unwrap();

        let drafts = [
            SaleDraft::new().line(
                DraftLine::new(1, Money::from_cents(1800))
                    .quantity(2)
                    .addon(DraftAddOn::new(1, Money::from_cents(300)).quantity(3)),
            ),
            SaleDraft::new()
                .line(DraftLine::new(small, Money::from_cents(1200)).quantity(5))
                .line(
                    DraftLine::new(1, Money::from_cents(1800))
                        .addon(DraftAddOn::new(2, Money::from_cents(600))),
                ),
        ];
        for draft in drafts {
            db.sales().record_sale(draft, operator_id).await.unwrap();
        }

        let reports = db.reports();
        let all = DateRange::default();

        let products = reports.top_products(&all, None).await.unwrap();
        assert_eq!(
            products,
            vec![
                RankingEntry { name: "Copo 300ml".to_string(), quantity: 5 },
                RankingEntry { name: "Copo 500ml".to_string(), quantity: 3 },
            ]
        );

        let top_one = reports.top_products(&all, Some(1)).await.unwrap();
        assert_eq!(top_one.len(), 1);

        let addons = reports.top_addons(&all, None).await.unwrap();
        assert_eq!(addons[0], RankingEntry { name: "Banana".to_string(), quantity: 3 });
        assert_eq!(addons[1], RankingEntry { name: "Morango".to_string(), quantity: 1 });
    }

    #[tokio::test]
    async fn test_revenue_by_day() {
        let (db, operator_id) = setup().await;
        let sales = db.sales();
        let cup = || SaleDraft::new().line(DraftLine::new(1, Money::from_cents(1800)));

        let stamps = [
            Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap(),
        ];
        for at in stamps {
            sales.record_sale_at(cup(), operator_id, at).await.unwrap();
        }

        let range = DateRange::new(Some(day(2024, 5, 1)), Some(day(2024, 5, 2)));
        let revenue = db.reports().revenue_by_day(&range).await.unwrap();

        assert_eq!(
            revenue,
            vec![
                DailyRevenue { day: day(2024, 5, 1), total_cents: Money::from_cents(3600) },
                DailyRevenue { day: day(2024, 5, 2), total_cents: Money::from_cents(1800) },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_reports() {
        let (db, _) = setup().await;
        let all = DateRange::default();
        assert!(db.reports().top_products(&all, None).await.unwrap().is_empty());
        assert!(db.reports().top_addons(&all, None).await.unwrap().is_empty());
        assert!(db.reports().revenue_by_day(&all).await.unwrap().is_empty());
    }
}
