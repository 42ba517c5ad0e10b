use std::collections::HashMap;

use agent_core::netaddr;
use async_trait::async_trait;
use db::{MacEntryRow, Node, PgPool, ResultRow};
use time::OffsetDateTime;

use crate::Handler;

/// `dot1dTpFdbAddress`: OID suffix carries the MAC, value repeats it.
const FDB_ADDRESS: &str = "1.3.6.1.2.1.17.4.3.1.1";
/// `dot1dTpFdbPort`: OID suffix carries the MAC, value is the bridge port.
const FDB_PORT: &str = "1.3.6.1.2.1.17.4.3.1.2";
/// `dot1dTpFdbStatus`: OID suffix carries the MAC, value is the status int.
const FDB_STATUS: &str = "1.3.6.1.2.1.17.4.3.1.3";

#[derive(Debug, Default)]
struct Aggregate {
    port_number: Option<i32>,
    status: Option<i64>,
}

/// MAC Table handler (id 5): walks the three `dot1dTpFdb` columns
/// (Address, Port, Status), aggregates them per MAC address merging only
/// non-null contributions, then resolves each entry's bridge port to a
/// managed element (spec §4.2.3(a)).
pub struct MacTableHandler;

#[async_trait]
impl Handler for MacTableHandler {
    fn name(&self) -> &'static str {
        "mac_table"
    }

    async fn process_raw(&self, pool: &PgPool, node: &Node, journal_id: i64, raw: &[ResultRow]) -> ResultRow {
        let now = OffsetDateTime::now_utc();
        let request_id = raw.first().map(|r| r.request_id).unwrap_or_default();
        let entries = crate::decode_all_raw(raw);

        if entries.is_empty() {
            return ResultRow::error(
                node.id,
                request_id,
                journal_id,
                crate::error_key("no_data"),
                "MAC table walk returned no data".to_string(),
                0,
                now,
            );
        }

        let mut by_mac: HashMap<String, Aggregate> = HashMap::new();

        for (dotted, value) in &entries {
            let column = if dotted.starts_with(FDB_PORT) {
                FDB_PORT
            } else if dotted.starts_with(FDB_STATUS) {
                FDB_STATUS
            } else if dotted.starts_with(FDB_ADDRESS) {
                FDB_ADDRESS
            } else {
                continue;
            };
            let Some(mac) = netaddr::mac_from_oid_suffix(dotted) else { continue };
            let agg = by_mac.entry(mac).or_default();
            match column {
                FDB_PORT => {
                    if let Some(port) = netaddr::first_integer(value) {
                        agg.port_number = Some(port as i32);
                    }
                }
                FDB_STATUS => {
                    if let Some(status) = netaddr::first_integer(value) {
                        agg.status = Some(status);
                    }
                }
                _ => {}
            }
        }

        let mut written = 0usize;
        for (mac, agg) in by_mac {
            let interface_id = match agg.port_number {
                Some(port) => match db::lookup_element_by_snmp_id(pool, node.id, port).await {
                    Ok(element) => element.map(|e| e.id),
                    Err(e) => {
                        tracing::warn!(node_id = node.id, error = %e, "mac table: element lookup failed");
                        None
                    }
                },
                None => None,
            };

            let row = MacEntryRow {
                node_id: node.id,
                mac_address: mac,
                interface_id,
                vlan_id: None,
                port_number: agg.port_number,
                source: "bridge_fdb".to_string(),
                status: agg.status.map(|s| s.to_string()).unwrap_or_else(|| "ACTIVE".to_string()),
                first_seen: None,
                last_seen: None,
            };

            if let Err(e) = db::upsert_mac_entry(pool, &row).await {
                tracing::warn!(node_id = node.id, error = %e, "mac table: upsert failed");
                continue;
            }
            written += 1;
        }

        ResultRow {
            node_id: node.id,
            request_id,
            journal_id,
            val: Some(format!("{{\"mac_entries\":{written}}}")),
            key: Some("mac_table_processing".to_string()),
            duration: 0,
            err: None,
            dt: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_merges_non_null_fields_only() {
        let mut by_mac: HashMap<String, Aggregate> = HashMap::new();
        by_mac.entry("aa:bb:cc:dd:ee:ff".to_string()).or_default().port_number = Some(7);
        by_mac.entry("aa:bb:cc:dd:ee:ff".to_string()).or_default().status = Some(3);
        let agg = &by_mac["aa:bb:cc:dd:ee:ff"];
        assert_eq!(agg.port_number, Some(7));
        assert_eq!(agg.status, Some(3));
    }
}
