//! Handler Layer: turns a journal's raw SNMP capture into processed rows.
//!
//! Every handler implements [`Handler`], which deliberately does not return
//! a `Result` — a handler that fails still produces a [`db::ResultRow`]
//! carrying the error text, so the Task Runner never needs a second error
//! path on top of its own (spec's "no `Result` in the handler contract"
//! design note).

use async_trait::async_trait;
use db::{Node, PgPool, ResultRow};

pub mod arp;
pub mod factory;
pub mod health;
pub mod interface_legacy;
pub mod interfaces;
pub mod mac_legacy;
pub mod mac_table;
pub mod raw_codec;
pub mod snmp_raw;
pub mod stub;

pub use factory::HandlerFactory;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("unknown handler id {0}")]
    UnknownHandlerId(i32),
}

/// A domain handler: Phase 2 of the Task Runner. `process_raw` is given the
/// Phase-1 raw `mon.result` rows already persisted for this dispatch group —
/// one row for an ordinary `(node, request)` pair, or every raw row the node
/// produced this task for the legacy combined-MAC handler (id 2) — plus the
/// journal they belong to, and returns the single processed row that gets
/// appended to `mon.result`. Handlers that also populate dedicated tables
/// (interface inventory, MAC table, ARP table) do so as a side effect before
/// returning.
#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process_raw(&self, pool: &PgPool, node: &Node, journal_id: i64, raw: &[ResultRow]) -> ResultRow;
}

/// Key prefix convention used when a handler cannot produce a value: the
/// `key` column on an errored row always starts with `"error_"`, letting
/// downstream consumers distinguish a real value from a failure without
/// parsing `err` (spec §6 stable key taxonomy, §8 key-prefix invariant).
pub fn error_key(detail: &str) -> String {
    format!("error_{detail}")
}

/// Decodes the `(oid, value)` pairs a successful Phase-1 raw row carries in
/// its JSON-encoded `val`. Rows that failed capture (`err` set) decode to
/// nothing (spec §4.2.2: "JSON-decode the val into a sequence of (oid,
/// value) pairs").
pub fn decode_raw(row: &ResultRow) -> Vec<(String, String)> {
    match &row.val {
        Some(val) if row.err.is_none() => raw_codec::decode(val),
        _ => Vec::new(),
    }
}

/// Flattens every successfully-captured `(oid, value)` pair across a set of
/// raw rows, in row order. Used by handlers dispatched over more than one
/// raw row — the legacy combined-MAC handler's whole-node batch, or any
/// ordinary handler whose single request walked more than one subtree.
pub fn decode_all_raw(raw: &[ResultRow]) -> Vec<(String, String)> {
    raw.iter().flat_map(decode_raw).collect()
}
