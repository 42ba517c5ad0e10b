use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::DbError;
use crate::models::DueCronEntry;

/// Crontab entries joined to task/node-group/request-group/handler,
/// filtered to entries this agent is allowed to run (spec §4.5 step 1).
///
/// `agent_name` selects rows whose `agent` column is NULL, equal to this
/// agent, or the literal `'ANY'`.
pub async fn get_active_crontab(
    pool: &PgPool,
    agent_name: &str,
) -> Result<Vec<DueCronEntry>, DbError> {
    let rows = sqlx::query_as!(
        DueCronEntry,
        r#"
        SELECT
            ct.id            AS "cron_id!",
            ct.task_id       AS "task_id!",
            t.name           AS "task_name!",
            t.node_group_id  AS "node_group_id!",
            t.request_group_id AS "request_group_id!",
            rg.handler_id    AS "handler_id!",
            COALESCE(ct.minutes, 0) AS "minutes!",
            COALESCE(ct.hours, 0)   AS "hours!",
            COALESCE(ct.days, 0)    AS "days!",
            ct.startdt,
            ct.lastdt,
            ct.status        AS "status!",
            ct.agent
        FROM mon.crontab ct
        JOIN mon.task t ON ct.task_id = t.id
        JOIN mon.request_group rg ON t.request_group_id = rg.id
        WHERE ct.status = 'ACTIVE'
          AND (ct.agent IS NULL OR ct.agent = $1 OR ct.agent = 'ANY')
          AND rg.manage = true
        ORDER BY ct.id
        "#,
        agent_name
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Transition a cron row's status. Per spec §4.5/§9, this is the only
/// place `RUNNING`/`ACTIVE` is written; a single-process agent treats it as
/// a mutex, but it is not a safe cross-process lock (§9 design note).
pub async fn update_cron_status(
    pool: &PgPool,
    cron_id: i64,
    status: &str,
    journal_id: Option<i64>,
    now: OffsetDateTime,
) -> Result<(), DbError> {
    sqlx::query!(
        "UPDATE mon.crontab SET lastdt = $1, status = $2, j_id = $3 WHERE id = $4",
        now,
        status,
        journal_id,
        cron_id
    )
    .execute(pool)
    .await?;
    Ok(())
}
