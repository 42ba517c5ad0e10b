use async_trait::async_trait;
use db::{Node, PgPool, ResultRow};

use crate::mac_table::MacTableHandler;
use crate::Handler;

/// Legacy combined MAC handler (id 2), kept registered alongside the
/// dedicated MAC Table handler (id 5) per the duplicated handler-id
/// mapping in the original crontab data (spec §9(b)). Delegates to the
/// same aggregation logic, but the Task Runner dispatches it differently
/// from every other handler: it is called once per node with every raw row
/// the node produced this task (spec §4.4 step 4), not once per
/// `(node, request)` pair.
pub struct MacLegacyHandler {
    inner: MacTableHandler,
}

impl Default for MacLegacyHandler {
    fn default() -> Self {
        Self { inner: MacTableHandler }
    }
}

#[async_trait]
impl Handler for MacLegacyHandler {
    fn name(&self) -> &'static str {
        "mac_legacy"
    }

    async fn process_raw(&self, pool: &PgPool, node: &Node, journal_id: i64, raw: &[ResultRow]) -> ResultRow {
        self.inner.process_raw(pool, node, journal_id, raw).await
    }
}
