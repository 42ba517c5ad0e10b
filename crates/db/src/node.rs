use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::DbError;
use crate::models::Node;

/// Managed nodes belonging to a node group, as referenced by a task.
pub async fn get_nodes_for_group(pool: &PgPool, node_group_id: i64) -> Result<Vec<Node>, DbError> {
    let rows = sqlx::query_as!(
        Node,
        r#"
        SELECT n.id, n.name, n.ipaddress, n.community, n.timeout,
               n.sysname, n.sysobjectid, n.manage, n.snmp_last_dt
        FROM mon.node n
        JOIN mon.node_group_ref ref ON ref.node_id = n.id
        WHERE ref.group_id = $1 AND n.manage = true
        ORDER BY n.id
        "#,
        node_group_id
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stamps `snmp_last_dt` after a task touches a node, independent of
/// whether the poll succeeded (spec §4.4 step 6).
pub async fn update_node_last_polled(
    pool: &PgPool,
    node_id: i64,
    now: OffsetDateTime,
) -> Result<(), DbError> {
    sqlx::query!(
        "UPDATE mon.node SET snmp_last_dt = $1 WHERE id = $2",
        now,
        node_id
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Health handler's identity update: sysName/sysObjectID discovered via
/// polling, not user-editable fields.
pub async fn update_node_identity(
    pool: &PgPool,
    node_id: i64,
    sysname: Option<&str>,
    sysobjectid: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query!(
        "UPDATE mon.node SET sysname = $1, sysobjectid = $2 WHERE id = $3",
        sysname,
        sysobjectid,
        node_id
    )
    .execute(pool)
    .await?;
    Ok(())
}
