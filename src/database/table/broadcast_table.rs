use sqlx::SqlitePool;

use super::TableBase;
use crate::database::error::DatabaseError;
use crate::database::model::BroadcastModel;

pub struct BroadcastTable {
    base: TableBase,
}

impl BroadcastTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: TableBase::new(pool),
        }
    }

    /// Appends one ledger row. The ledger is append-only: there is no update
    /// or delete path.
    pub async fn insert(
        &self,
        message: &str,
        sent_by: &str,
        recipients_count: i64,
    ) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            r#"
            INSERT INTO broadcast_history (message, sent_by, recipients_count)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(message)
        .bind(sent_by)
        .bind(recipients_count)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn select_recent(&self, limit: i64) -> Result<Vec<BroadcastModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, BroadcastModel>(
            r#"
            SELECT id, message, sent_by, recipients_count, sent_at
            FROM broadcast_history
            ORDER BY sent_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }
}
