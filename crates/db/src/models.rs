use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// `mon.node` — a polled device. Mutated only by the Task Runner (last-poll
/// metadata) and the Health handler (sysName/sysObjectID).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub ipaddress: String,
    pub community: String,
    pub timeout: i32,
    pub sysname: Option<String>,
    pub sysobjectid: Option<String>,
    pub manage: bool,
    pub snmp_last_dt: Option<OffsetDateTime>,
}

/// `mon.request` — an OID plus request type, seeded externally and
/// immutable at runtime.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub name: String,
    pub oid: String,
    pub request_type: String,
    pub manage: bool,
}

/// Row produced by joining `crontab` to `task`/`node_group`/`request_group`/
/// `handler` — everything the Task Runner needs for one due invocation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DueCronEntry {
    pub cron_id: i64,
    pub task_id: i64,
    pub task_name: String,
    pub node_group_id: i64,
    pub request_group_id: i64,
    pub handler_id: i32,
    pub minutes: i32,
    pub hours: i32,
    pub days: i32,
    pub startdt: Option<OffsetDateTime>,
    pub lastdt: Option<OffsetDateTime>,
    pub status: String,
    pub agent: Option<String>,
}

/// `mon.journal` — one row per task invocation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Journal {
    pub id: i64,
    pub task_id: i64,
    pub startdt: OffsetDateTime,
    pub enddt: Option<OffsetDateTime>,
}

/// `mon.result` — append-mostly row for both raw and processed data.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct ResultRow {
    pub node_id: i64,
    pub request_id: i64,
    pub journal_id: i64,
    pub val: Option<String>,
    pub key: Option<String>,
    pub duration: i32,
    pub err: Option<String>,
    pub dt: OffsetDateTime,
}

impl ResultRow {
    pub fn placeholder(node_id: i64, request_id: i64, journal_id: i64, now: OffsetDateTime) -> Self {
        Self {
            node_id,
            request_id,
            journal_id,
            val: None,
            key: None,
            duration: 0,
            err: None,
            dt: now,
        }
    }

    pub fn error(
        node_id: i64,
        request_id: i64,
        journal_id: i64,
        key: String,
        err: String,
        duration: i32,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            node_id,
            request_id,
            journal_id,
            val: None,
            key: Some(key),
            duration,
            err: Some(err),
            dt: now,
        }
    }
}

/// `mon.interface_inventory`, unique on `(node_id, if_index)`. `first_seen`
/// and `last_seen` are stamped by the database (`NOW()` on insert, updated
/// on conflict) rather than by the handler, so they are `None` until read
/// back from a `SELECT` (spec §3, §8 `first_seen <= last_seen` invariant).
#[derive(Debug, Clone, PartialEq, Default, sqlx::FromRow, Serialize, Deserialize)]
pub struct InterfaceInventoryRow {
    pub node_id: i64,
    pub if_index: i32,
    pub if_name: Option<String>,
    pub if_descr: Option<String>,
    pub if_type: Option<i32>,
    pub if_mtu: Option<i32>,
    pub if_speed: Option<i64>,
    pub if_phys_address: Option<String>,
    pub if_admin_status: Option<i32>,
    pub if_oper_status: Option<i32>,
    pub if_alias: Option<String>,
    pub status: Option<String>,
    pub first_seen: Option<OffsetDateTime>,
    pub last_seen: Option<OffsetDateTime>,
}

/// `mon.mac_addresses`, unique on `(node_id, mac_address)`. `first_seen`/
/// `last_seen` are database-stamped the same way as `InterfaceInventoryRow`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct MacEntryRow {
    pub node_id: i64,
    pub mac_address: String,
    pub interface_id: Option<i64>,
    pub vlan_id: Option<i32>,
    pub port_number: Option<i32>,
    pub source: String,
    pub status: String,
    pub first_seen: Option<OffsetDateTime>,
    pub last_seen: Option<OffsetDateTime>,
}

/// `mon.arp_table`, keyed `(node_id, ip_address, mac_address)`. `first_seen`/
/// `last_seen` are database-stamped the same way as `InterfaceInventoryRow`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct ArpEntryRow {
    pub node_id: i64,
    pub ip_address: String,
    pub mac_address: String,
    pub source: String,
    pub first_seen: Option<OffsetDateTime>,
    pub last_seen: Option<OffsetDateTime>,
}

/// `mon.interface_ip`, unique on `(node_id, if_index, ip_address)`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct InterfaceIpRow {
    pub node_id: i64,
    pub if_index: i32,
    pub ip_address: String,
}

/// `mon.element` — a logical interface row matched to a bridge port index
/// via `snmp_id` (MAC Table handler port → interface resolution).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ElementRow {
    pub id: i64,
    pub node_id: i64,
    pub snmp_id: i32,
    pub manage: bool,
    pub deleted: bool,
}
