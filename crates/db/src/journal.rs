use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::DbError;

/// Opens a journal row for a task invocation, returning its id.
pub async fn open_journal(pool: &PgPool, task_id: i64, now: OffsetDateTime) -> Result<i64, DbError> {
    let rec = sqlx::query!(
        "INSERT INTO mon.journal (task_id, startdt) VALUES ($1, $2) RETURNING id",
        task_id,
        now
    )
    .fetch_one(pool)
    .await?;
    Ok(rec.id)
}

/// Closes a journal row. Always called, even on task-scoped failure
/// (spec §7 "Task-scoped" category) so the journal never dangles open.
pub async fn close_journal(pool: &PgPool, journal_id: i64, now: OffsetDateTime) -> Result<(), DbError> {
    sqlx::query!(
        "UPDATE mon.journal SET enddt = $1 WHERE id = $2",
        now,
        journal_id
    )
    .execute(pool)
    .await?;
    Ok(())
}
