use async_trait::async_trait;
use db::{Node, PgPool, ResultRow};
use serde::Serialize;
use time::OffsetDateTime;

use crate::Handler;

/// sysName / sysObjectID / sysUpTime OIDs under the standard `system` group
/// (1.3.6.1.2.1.1), used to confirm reachability and refresh a node's
/// identity fields (spec §4.2.1).
const SYSOBJECTID_OID: &str = "1.3.6.1.2.1.1.2.0";
const SYSUPTIME_OID: &str = "1.3.6.1.2.1.1.3.0";
const SYSNAME_OID: &str = "1.3.6.1.2.1.1.5.0";

#[derive(Debug, Serialize)]
struct HealthSummary {
    sysname: Option<String>,
    sysobjectid: Option<String>,
    sysuptime: Option<String>,
}

/// Health handler (id 7): confirms a node answers SNMP and records its
/// sysName/sysObjectID/sysUpTime as a JSON summary keyed `health_info`
/// (spec §4.2.1, §6 stable key taxonomy, §8 scenario 1).
pub struct HealthHandler;

#[async_trait]
impl Handler for HealthHandler {
    fn name(&self) -> &'static str {
        "health"
    }

    async fn process_raw(&self, pool: &PgPool, node: &Node, journal_id: i64, raw: &[db::ResultRow]) -> ResultRow {
        let now = OffsetDateTime::now_utc();
        let request_id = raw.first().map(|r| r.request_id).unwrap_or_default();
        let entries = crate::decode_all_raw(raw);

        let sysname = find_value(&entries, SYSNAME_OID);
        let sysobjectid = find_value(&entries, SYSOBJECTID_OID);
        let sysuptime = find_value(&entries, SYSUPTIME_OID);

        if sysname.is_none() && sysobjectid.is_none() && sysuptime.is_none() {
            return ResultRow::error(
                node.id,
                request_id,
                journal_id,
                crate::error_key("no_data"),
                "health GET returned no system-group values".to_string(),
                0,
                now,
            );
        }

        if let Err(e) =
            db::update_node_identity(pool, node.id, sysname.as_deref(), sysobjectid.as_deref()).await
        {
            tracing::warn!(node_id = node.id, error = %e, "health: failed to update node identity");
        }

        let summary = HealthSummary {
            sysname,
            sysobjectid,
            sysuptime,
        };
        let val = serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string());

        ResultRow {
            node_id: node.id,
            request_id,
            journal_id,
            val: Some(val),
            key: Some("health_info".to_string()),
            duration: 0,
            err: None,
            dt: now,
        }
    }
}

fn find_value(entries: &[(String, String)], dotted_oid: &str) -> Option<String> {
    entries
        .iter()
        .find(|(oid, _)| oid == dotted_oid)
        .map(|(_, v)| v.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_value_matches_exact_oid() {
        let entries = vec![(SYSNAME_OID.to_string(), "switch-a".to_string())];
        assert_eq!(find_value(&entries, SYSNAME_OID).as_deref(), Some("switch-a"));
    }
}
