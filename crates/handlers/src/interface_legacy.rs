use async_trait::async_trait;
use db::{Node, PgPool, ResultRow};

use crate::interfaces::InterfaceDiscoveryHandler;
use crate::Handler;

/// Legacy Interface handler (id 3), kept registered alongside the
/// dedicated Interface Discovery handler (id 4) per the duplicated
/// handler-id mapping in the original crontab data. Delegates to the
/// same implementation; only `name()` differs, since `mon.result.key`
/// never records which handler id produced a row.
pub struct InterfaceLegacyHandler {
    inner: InterfaceDiscoveryHandler,
}

impl Default for InterfaceLegacyHandler {
    fn default() -> Self {
        Self { inner: InterfaceDiscoveryHandler }
    }
}

#[async_trait]
impl Handler for InterfaceLegacyHandler {
    fn name(&self) -> &'static str {
        "interface_legacy"
    }

    async fn process_raw(&self, pool: &PgPool, node: &Node, journal_id: i64, raw: &[ResultRow]) -> ResultRow {
        self.inner.process_raw(pool, node, journal_id, raw).await
    }
}
