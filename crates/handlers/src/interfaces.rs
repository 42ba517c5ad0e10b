use std::collections::HashMap;

use agent_core::netaddr;
use async_trait::async_trait;
use db::{InterfaceInventoryRow, InterfaceIpRow, Node, PgPool, ResultRow};
use time::OffsetDateTime;

use crate::Handler;

const IF_DESCR: &str = "1.3.6.1.2.1.2.2.1.2";
const IF_TYPE: &str = "1.3.6.1.2.1.2.2.1.3";
const IF_MTU: &str = "1.3.6.1.2.1.2.2.1.4";
const IF_SPEED: &str = "1.3.6.1.2.1.2.2.1.5";
const IF_PHYS_ADDRESS: &str = "1.3.6.1.2.1.2.2.1.6";
const IF_ADMIN_STATUS: &str = "1.3.6.1.2.1.2.2.1.7";
const IF_OPER_STATUS: &str = "1.3.6.1.2.1.2.2.1.8";
const IF_NAME: &str = "1.3.6.1.2.1.31.1.1.1.1";
const IF_ALIAS: &str = "1.3.6.1.2.1.31.1.1.1.18";
const IP_AD_ENT_IF_INDEX: &str = "1.3.6.1.2.1.4.20.1.2";

/// Interface Discovery handler (id 4): merges `ifTable`/`ifXTable` walks
/// keyed by ifIndex into one inventory row per interface, then separately
/// merges `ipAddrTable` to assign IPv4 addresses to ifIndexes.
///
/// The raw capture is expected to be the concatenation of every column
/// walk above; each entry's OID prefix identifies which column it belongs
/// to and its trailing component is the ifIndex (spec §4.2.2).
pub struct InterfaceDiscoveryHandler;

#[async_trait]
impl Handler for InterfaceDiscoveryHandler {
    fn name(&self) -> &'static str {
        "interface_discovery"
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
                "interface discovery walk returned no data".to_string(),
                0,
                now,
            );
        }

        let mut by_index: HashMap<i32, InterfaceInventoryRow> = HashMap::new();
        let mut ips: Vec<InterfaceIpRow> = Vec::new();

        for (dotted, value) in &entries {
            if let Some(prefix) = column_prefix(dotted, &[
                IF_DESCR, IF_TYPE, IF_MTU, IF_SPEED, IF_PHYS_ADDRESS,
                IF_ADMIN_STATUS, IF_OPER_STATUS, IF_NAME, IF_ALIAS,
            ]) {
                let Some(if_index) = netaddr::trailing_index(dotted) else { continue };
                let row = by_index.entry(if_index).or_insert_with(|| InterfaceInventoryRow {
                    node_id: node.id,
                    if_index,
                    ..Default::default()
                });
                apply_column(row, prefix, value);
            } else if dotted.starts_with(IP_AD_ENT_IF_INDEX) {
                if let Some(if_index) = netaddr::first_integer(value).map(|n| n as i32) {
                    if let Some(ip) = dotted.strip_prefix(&format!("{IP_AD_ENT_IF_INDEX}.")) {
                        ips.push(InterfaceIpRow {
                            node_id: node.id,
                            if_index,
                            ip_address: ip.to_string(),
                        });
                    }
                }
            }
        }

        let rows: Vec<InterfaceInventoryRow> = by_index.into_values().collect();
        let count = rows.len();

        if let Err(e) = db::upsert_interface_inventory(pool, &rows).await {
            return ResultRow::error(
                node.id,
                request_id,
                journal_id,
                crate::error_key("db_write"),
                e.to_string(),
                0,
                now,
            );
        }

        for ip in &ips {
            if let Err(e) = db::upsert_interface_ip(pool, ip).await {
                tracing::warn!(node_id = node.id, error = %e, "interface discovery: failed to upsert interface ip");
            }
        }

        ResultRow {
            node_id: node.id,
            request_id,
            journal_id,
            val: Some(format!("{{\"interfaces\":{count}}}")),
            key: Some("interface_processing".to_string()),
            duration: 0,
            err: None,
            dt: now,
        }
    }
}

fn column_prefix<'a>(dotted: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|c| dotted.starts_with(**c))
        .copied()
}

fn apply_column(row: &mut InterfaceInventoryRow, prefix: &str, value: &str) {
    match prefix {
        IF_DESCR => row.if_descr = Some(value.to_string()),
        IF_TYPE => row.if_type = netaddr::first_integer(value).map(|n| n as i32),
        IF_MTU => row.if_mtu = netaddr::first_integer(value).map(|n| n as i32),
        IF_SPEED => row.if_speed = netaddr::first_integer(value),
        IF_PHYS_ADDRESS => row.if_phys_address = netaddr::parse_mac_text(value),
        IF_ADMIN_STATUS => row.if_admin_status = netaddr::first_integer(value).map(|n| n as i32),
        IF_OPER_STATUS => row.if_oper_status = netaddr::first_integer(value).map(|n| n as i32),
        IF_NAME => row.if_name = Some(value.to_string()),
        IF_ALIAS => row.if_alias = Some(value.to_string()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_prefix_matches_longest_table_column() {
        let dotted = format!("{IF_NAME}.7");
        assert_eq!(
            column_prefix(&dotted, &[IF_DESCR, IF_NAME]),
            Some(IF_NAME)
        );
    }
}
