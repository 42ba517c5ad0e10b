use sqlx::PgPool;

use crate::error::DbError;
use crate::models::Request;

/// The OIDs a request group asks for, e.g. the set of GET/WALK operations
/// a given handler needs raw data for.
pub async fn get_requests_for_group(pool: &PgPool, request_group_id: i64) -> Result<Vec<Request>, DbError> {
    let rows = sqlx::query_as!(
        Request,
        r#"
        SELECT r.id, r.name, r.oid, r.request_type, r.manage
        FROM mon.request r
        JOIN mon.request_group_ref ref ON ref.request_id = r.id
        WHERE ref.group_id = $1 AND r.manage = true
        ORDER BY r.id
        "#,
        request_group_id
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
