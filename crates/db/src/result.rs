use sqlx::PgPool;

use crate::error::DbError;
use crate::models::ResultRow;

/// Inserts the placeholder row written before the SNMP call, so a crash
/// mid-poll leaves a `val IS NULL AND err IS NULL` row rather than no row
/// at all (spec §4.4 step 3, §8 orphaned-placeholder boundary case).
pub async fn insert_result_placeholder(pool: &PgPool, row: &ResultRow) -> Result<(), DbError> {
    sqlx::query!(
        r#"
        INSERT INTO mon.result (node_id, request_id, journal_id, val, key, duration, err, dt)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
        row.node_id,
        row.request_id,
        row.journal_id,
        row.val,
        row.key,
        row.duration,
        row.err,
        row.dt
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Updates a previously-placeholder row, guarded so a concurrent writer
/// can never clobber a row that already carries a value or an error
/// (spec §4.4 step 5's `val IS NULL AND err IS NULL` guard).
pub async fn update_result_guarded(pool: &PgPool, row: &ResultRow) -> Result<u64, DbError> {
    let res = sqlx::query!(
        r#"
        UPDATE mon.result
        SET val = $1, key = $2, duration = $3, err = $4, dt = $5
        WHERE node_id = $6 AND request_id = $7 AND journal_id = $8
          AND val IS NULL AND err IS NULL
        "#,
        row.val,
        row.key,
        row.duration,
        row.err,
        row.dt,
        row.node_id,
        row.request_id,
        row.journal_id
    )
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Batched insert used by handlers that fan a single raw capture out into
/// several processed rows (spec §4.3).
pub async fn batch_insert_results(pool: &PgPool, rows: &[ResultRow]) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for row in rows {
        sqlx::query!(
            r#"
            INSERT INTO mon.result (node_id, request_id, journal_id, val, key, duration, err, dt)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            row.node_id,
            row.request_id,
            row.journal_id,
            row.val,
            row.key,
            row.duration,
            row.err,
            row.dt
        )
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
