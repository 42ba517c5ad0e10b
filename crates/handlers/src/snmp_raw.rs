use async_trait::async_trait;
use db::{Node, PgPool, ResultRow};
use time::OffsetDateTime;

use crate::Handler;

/// Identity handler for request group handler id 1 (raw capture, no
/// dedicated processing). The Task Runner skips Phase 2 dispatch for this
/// id entirely (the Phase-1 `raw_`/`error_` row already is the final
/// representation); this type exists so `HandlerFactory` still has a
/// concrete handler if one is ever requested explicitly (e.g. stub-forced).
pub struct SnmpRawHandler;

#[async_trait]
impl Handler for SnmpRawHandler {
    fn name(&self) -> &'static str {
        "snmp_raw"
    }

    async fn process_raw(&self, _pool: &PgPool, node: &Node, journal_id: i64, raw: &[ResultRow]) -> ResultRow {
        let now = OffsetDateTime::now_utc();
        match raw.first() {
            Some(row) if row.err.is_none() => ResultRow {
                node_id: node.id,
                request_id: row.request_id,
                journal_id,
                val: row.val.clone(),
                key: row.key.clone(),
                duration: 0,
                err: None,
                dt: now,
            },
            Some(row) => ResultRow::error(
                node.id,
                row.request_id,
                journal_id,
                crate::error_key("upstream"),
                row.err.clone().unwrap_or_else(|| "raw capture failed".to_string()),
                0,
                now,
            ),
            None => ResultRow::error(
                node.id,
                0,
                journal_id,
                crate::error_key("no_data"),
                "SNMP capture returned no varbinds".to_string(),
                0,
                now,
            ),
        }
    }
}
