use sqlx::PgPool;

use crate::error::DbError;
use crate::models::{InterfaceInventoryRow, InterfaceIpRow};

/// Upserts interface inventory rows in batches of roughly 100 per
/// transaction, matching the original implementation's chunking to keep
/// a single large discovery sweep from holding one huge transaction open.
pub async fn upsert_interface_inventory(
    pool: &PgPool,
    rows: &[InterfaceInventoryRow],
) -> Result<(), DbError> {
    for chunk in rows.chunks(100) {
        let mut tx = pool.begin().await?;
        for row in chunk {
            sqlx::query!(
                r#"
                INSERT INTO mon.interface_inventory
                    (node_id, if_index, if_name, if_descr, if_type, if_mtu,
                     if_speed, if_phys_address, if_admin_status, if_oper_status, if_alias,
                     status, first_seen, last_seen)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'ACTIVE', NOW(), NOW())
                ON CONFLICT (node_id, if_index) DO UPDATE SET
                    if_name = EXCLUDED.if_name,
                    if_descr = EXCLUDED.if_descr,
                    if_type = EXCLUDED.if_type,
                    if_mtu = EXCLUDED.if_mtu,
                    if_speed = EXCLUDED.if_speed,
                    if_phys_address = EXCLUDED.if_phys_address,
                    if_admin_status = EXCLUDED.if_admin_status,
                    if_oper_status = EXCLUDED.if_oper_status,
                    if_alias = EXCLUDED.if_alias,
                    status = 'ACTIVE',
                    last_seen = NOW()
                "#,
                row.node_id,
                row.if_index,
                row.if_name,
                row.if_descr,
                row.if_type,
                row.if_mtu,
                row.if_speed,
                row.if_phys_address,
                row.if_admin_status,
                row.if_oper_status,
                row.if_alias
            )
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
    }
    Ok(())
}

/// Upserts an interface's IPv4 address, unique on `(node_id, if_index, ip_address)`.
pub async fn upsert_interface_ip(pool: &PgPool, row: &InterfaceIpRow) -> Result<(), DbError> {
    sqlx::query!(
        r#"
        INSERT INTO mon.interface_ip (node_id, if_index, ip_address)
        VALUES ($1, $2, $3)
        ON CONFLICT (node_id, if_index, ip_address) DO NOTHING
        "#,
        row.node_id,
        row.if_index,
        row.ip_address
    )
    .execute(pool)
    .await?;
    Ok(())
}
