use sqlx::PgPool;

use crate::error::DbError;
use crate::models::ArpEntryRow;

/// Upserts an ARP table entry, keyed `(node_id, ip_address, mac_address)`
/// so a stale mapping doesn't linger once a host's MAC changes.
pub async fn upsert_arp_entry(pool: &PgPool, row: &ArpEntryRow) -> Result<(), DbError> {
    sqlx::query!(
        r#"
        INSERT INTO mon.arp_table (node_id, ip_address, mac_address, source, first_seen, last_seen)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        ON CONFLICT (node_id, ip_address, mac_address) DO UPDATE SET
            source = EXCLUDED.source,
            last_seen = NOW()
        "#,
        row.node_id,
        row.ip_address,
        row.mac_address,
        row.source
    )
    .execute(pool)
    .await?;
    Ok(())
}
