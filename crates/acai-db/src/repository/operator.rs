//! # Operator Repository
//!
//! Operator accounts. Only the PHC string from [`crate::password`] is
//! stored.

use acai_core::validation::validate_required_text;
use acai_core::{Operator, OperatorRole};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Input for creating an operator.
#[derive(Debug, Clone)]
pub struct NewOperator {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: OperatorRole,
}

#[derive(Debug, Clone)]
pub struct OperatorRepository {
    pool: SqlitePool,
}

impl OperatorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OperatorRepository { pool }
    }

    /// Inserts an operator; emails are unique.
    pub async fn insert(&self, op: &NewOperator) -> DbResult<i64> {
        validate_required_text("name", &op.name)?;
        validate_required_text("email", &op.email)?;
        debug!(email = %op.email, role = op.role.as_str(), "Inserting operator");

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO operators (name, email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(&op.name)
        .bind(&op.email)
        .bind(&op.password_hash)
        .bind(op.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, op.email.clone()),
            other => other,
        })?;

        Ok(id)
    }

    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Operator>> {
        let op = sqlx::query_as::<_, Operator>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM operators
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(op)
    }

    pub async fn get(&self, id: i64) -> DbResult<Operator> {
        sqlx::query_as::<_, Operator>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM operators
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Operator", id))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM operators")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn admin() -> NewOperator {
        NewOperator {
            name: "Admin".to_string(),
            email: "admin@megaacai".to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            role: OperatorRole::Admin,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ops = db.operators();

        let id = ops.insert(&admin()).await.unwrap();
        let found = ops.find_by_email("admin@megaacai").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.role, OperatorRole::Admin);
        assert_eq!(ops.get(id).await.unwrap().email, "admin@megaacai");

        assert!(ops.find_by_email("nobody@megaacai").await.unwrap().is_none());
        assert_eq!(ops.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.operators().insert(&admin()).await.unwrap();

        let err = db.operators().insert(&admin()).await.unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "admin@megaacai"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
