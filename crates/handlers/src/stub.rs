use async_trait::async_trait;
use db::{Node, PgPool, ResultRow};
use time::OffsetDateTime;

use crate::Handler;

/// Canned-success handler, no I/O at all. Selected instead of a real
/// handler when `USE_STUB_HANDLERS` is set, for exercising the scheduler
/// and persistence layer without a live SNMP agent to poll.
pub struct StubHandler;

#[async_trait]
impl Handler for StubHandler {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn process_raw(&self, _pool: &PgPool, node: &Node, journal_id: i64, raw: &[ResultRow]) -> ResultRow {
        let request_id = raw.first().map(|r| r.request_id).unwrap_or_default();
        ResultRow {
            node_id: node.id,
            request_id,
            journal_id,
            val: Some("stub-ok".to_string()),
            key: Some("stub".to_string()),
            duration: 0,
            err: None,
            dt: OffsetDateTime::now_utc(),
        }
    }
}
