use agent_core::netaddr;
use async_trait::async_trait;
use db::{ArpEntryRow, Node, PgPool, ResultRow};
use time::OffsetDateTime;

use crate::Handler;

/// `ipNetToMediaPhysAddress`: OID suffix carries `<ifIndex>.<a>.<b>.<c>.<d>`
/// (the IPv4 address), value carries the MAC address (spec §4.2.3(c)).
const IP_NET_TO_MEDIA_PHYS_ADDRESS: &str = "1.3.6.1.2.1.4.22.1.2";

/// ARP handler (id 6): walks `ipNetToMediaTable` and records IP-to-MAC
/// mappings, tagging each with the ifIndex recovered from the OID when
/// present.
pub struct ArpHandler;

#[async_trait]
impl Handler for ArpHandler {
    fn name(&self) -> &'static str {
        "arp"
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
                "ARP walk returned no data".to_string(),
                0,
                now,
            );
        }

        let mut written = 0usize;
        for (dotted, value) in &entries {
            if !dotted.starts_with(IP_NET_TO_MEDIA_PHYS_ADDRESS) {
                continue;
            }
            let (_if_index, ip) = netaddr::extract_ifindex_and_ipv4(dotted);
            let Some(ip_address) = ip else { continue };
            let Some(mac_address) = netaddr::parse_mac_text(value) else { continue };

            let row = ArpEntryRow {
                node_id: node.id,
                ip_address,
                mac_address,
                source: "arp".to_string(),
                first_seen: None,
                last_seen: None,
            };

            if let Err(e) = db::upsert_arp_entry(pool, &row).await {
                tracing::warn!(node_id = node.id, error = %e, "arp: upsert failed");
                continue;
            }
            written += 1;
        }

        ResultRow {
            node_id: node.id,
            request_id,
            journal_id,
            val: Some(format!("{{\"arp_entries\":{written}}}")),
            key: Some("arp_processing".to_string()),
            duration: 0,
            err: None,
            dt: now,
        }
    }
}
