use sqlx::PgPool;

use crate::error::DbError;
use crate::models::{ElementRow, MacEntryRow};

/// Upserts one MAC table entry, unique on `(node_id, mac_address)`. Entries
/// are marked `source` so the legacy and dedicated MAC Table handlers can
/// share storage without clobbering each other's provenance.
pub async fn upsert_mac_entry(pool: &PgPool, row: &MacEntryRow) -> Result<(), DbError> {
    sqlx::query!(
        r#"
        INSERT INTO mon.mac_addresses
            (node_id, mac_address, interface_id, vlan_id, port_number, source, status,
             first_seen, last_seen)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        ON CONFLICT (node_id, mac_address) DO UPDATE SET
            interface_id = EXCLUDED.interface_id,
            vlan_id = EXCLUDED.vlan_id,
            port_number = EXCLUDED.port_number,
            source = EXCLUDED.source,
            status = EXCLUDED.status,
            last_seen = NOW()
        "#,
        row.node_id,
        row.mac_address,
        row.interface_id,
        row.vlan_id,
        row.port_number,
        row.source,
        row.status
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Resolves a bridge-port (dot1dBasePort) index to the matching managed,
/// non-deleted element for a node, used by the MAC Table handler to turn
/// a bridge port number into an `interface_id` (spec §4.2.3).
pub async fn lookup_element_by_snmp_id(
    pool: &PgPool,
    node_id: i64,
    snmp_id: i32,
) -> Result<Option<ElementRow>, DbError> {
    let row = sqlx::query_as!(
        ElementRow,
        r#"
        SELECT id, node_id, snmp_id, manage, deleted
        FROM mon.element
        WHERE node_id = $1 AND snmp_id = $2 AND manage = true AND deleted = false
        "#,
        node_id,
        snmp_id
    )
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
