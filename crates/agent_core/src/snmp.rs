//! SNMP transport: a thin GET/WALK client with no knowledge of the DB or
//! the scheduler. Each call runs the blocking `snmp` crate session on
//! `spawn_blocking`, the same shape the teacher used for its v2c helpers.

use snmp::{ObjectIdentifier, SnmpPdu, SyncSession, Value};
use std::net::ToSocketAddrs;
use std::time::Duration;
use tokio::task;

/// Per-node SNMP context: address, community, and retry/timeout policy.
#[derive(Debug, Clone)]
pub struct NodeTarget {
    pub ipv4: String,
    pub community: String,
    pub timeout_ms: u64,
    pub retries: u32,
}

impl NodeTarget {
    pub fn new(ipv4: impl Into<String>, community: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            ipv4: ipv4.into(),
            community: community.into(),
            timeout_ms,
            retries: 1,
        }
    }

    /// Timeout floored to 1s before being handed to the transport (spec §4.1).
    fn transport_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1000))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnmpError {
    #[error("SNMP request to {0} timed out")]
    Timeout(String),
    #[error("failed to resolve SNMP target: {0}")]
    Resolution(String),
    #[error("SNMP protocol error: {0}")]
    Protocol(String),
    #[error("SNMP community or authentication mismatch")]
    AuthMismatch,
    #[error("background task join error: {0}")]
    Join(String),
    #[error("OID processing error: {0}")]
    OidProcessing(String),
    #[error("response contained no variable bindings")]
    NoVarBindValue,
}

/// Outcome of a single GET, already normalized to a printable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOutcome {
    pub oid: Vec<u32>,
    pub value: String,
}

/// Render an OID as the familiar dotted form.
pub fn format_oid(oid: &[u32]) -> String {
    oid.iter().map(u32::to_string).collect::<Vec<_>>().join(".")
}

/// Strip SNMP pretty-print artifacts (`Hex-STRING:`, `INTEGER:`, surrounding
/// quotes, trailing whitespace) from a raw textual value. Byte strings are
/// expected to already be UTF-8-lossy decoded by the caller.
pub fn normalize_snmp_text(raw: &str) -> String {
    let mut s = raw.trim();
    for prefix in ["Hex-STRING:", "INTEGER:", "STRING:", "OID:", "Timeticks:"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim();
            break;
        }
    }
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn format_value(value: Value) -> Result<String, SnmpError> {
    let text = match value {
        Value::Null => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::OctetString(bytes) => String::from_utf8_lossy(bytes).trim().to_string(),
        Value::ObjectIdentifier(oid_ref) => {
            let mut buf = [0u32; 128];
            let parts = oid_ref
                .read_name(&mut buf)
                .map_err(|e| SnmpError::OidProcessing(format!("{:?}", e)))?;
            format_oid(parts)
        }
        Value::IpAddress(ip) => format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
        Value::Counter32(c) => c.to_string(),
        Value::Unsigned32(g) => g.to_string(),
        Value::Timeticks(t) => t.to_string(),
        Value::Opaque(o) => String::from_utf8_lossy(o).to_string(),
        Value::Counter64(c) => c.to_string(),
        other => {
            tracing::warn!(value = ?other, "unhandled SNMP value type");
            return Err(SnmpError::Protocol(format!("unhandled value type {:?}", other)));
        }
    };
    Ok(normalize_snmp_text(&text))
}

fn session_for(target: &NodeTarget) -> Result<SyncSession, SnmpError> {
    let socket_addr = (target.ipv4.as_str(), 161u16)
        .to_socket_addrs()
        .map_err(|e| SnmpError::Resolution(e.to_string()))?
        .next()
        .ok_or_else(|| SnmpError::Resolution(format!("no address for {}", target.ipv4)))?;

    SyncSession::new(
        socket_addr,
        target.community.as_bytes(),
        Some(target.transport_timeout()),
        0,
    )
    .map_err(|e| SnmpError::Protocol(format!("session creation failed: {:?}", e)))
}

/// Perform a single SNMP GET and return the normalized textual value.
pub async fn get(target: NodeTarget, oid: Vec<u32>) -> Result<GetOutcome, SnmpError> {
    task::spawn_blocking(move || -> Result<GetOutcome, SnmpError> {
        let mut sess = session_for(&target)?;

        let oid_obj =
            ObjectIdentifier::new(&oid).map_err(|e| SnmpError::OidProcessing(format!("{:?}", e)))?;
        let mut oid_buf = [0u32; 128];
        let oid_slice = oid_obj
            .read_name(&mut oid_buf)
            .map_err(|e| SnmpError::OidProcessing(format!("{:?}", e)))?;

        let response: SnmpPdu = sess.get(oid_slice).map_err(|e| classify_get(&target, e))?;

        let mut varbinds = response.varbinds.into_iter();
        let (_resp_oid, value) = varbinds.next().ok_or(SnmpError::NoVarBindValue)?;

        Ok(GetOutcome {
            oid,
            value: format_value(value)?,
        })
    })
    .await
    .map_err(|e| SnmpError::Join(e.to_string()))?
}

/// Lexicographic-ordered subtree walk. Stops at the first OID that is no
/// longer prefixed by `base_oid`.
pub async fn walk(
    target: NodeTarget,
    base_oid: Vec<u32>,
) -> Result<Vec<(Vec<u32>, String)>, SnmpError> {
    task::spawn_blocking(move || -> Result<Vec<(Vec<u32>, String)>, SnmpError> {
        let mut sess = session_for(&target)?;
        let mut results = Vec::new();
        let mut current = base_oid.clone();

        loop {
            let pdu: SnmpPdu = sess
                .getnext(current.as_slice())
                .map_err(|e| classify_get(&target, e))?;

            let mut varbinds = pdu.varbinds.into_iter();
            let (next_oid_raw, value) = match varbinds.next() {
                Some(vb) => vb,
                None => break,
            };

            let mut buf = [0u32; 128];
            let next_oid = next_oid_raw
                .read_name(&mut buf)
                .map_err(|e| SnmpError::OidProcessing(format!("{:?}", e)))?
                .to_vec();

            if !next_oid.starts_with(base_oid.as_slice()) {
                break;
            }

            results.push((next_oid.clone(), format_value(value)?));
            current = next_oid;
        }

        Ok(results)
    })
    .await
    .map_err(|e| SnmpError::Join(e.to_string()))?
}

fn classify_get(target: &NodeTarget, err: snmp::SnmpError) -> SnmpError {
    let debug = format!("{:?}", err);
    if debug.contains("Timeout") || debug.contains("TimedOut") {
        SnmpError::Timeout(target.ipv4.clone())
    } else if debug.contains("Community") || debug.contains("Auth") {
        SnmpError::AuthMismatch
    } else {
        SnmpError::Protocol(debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_oid_renders_dotted() {
        assert_eq!(format_oid(&[1, 3, 6, 1, 2, 1]), "1.3.6.1.2.1");
    }

    #[test]
    fn normalize_strips_hex_string_prefix() {
        assert_eq!(
            normalize_snmp_text("Hex-STRING: 00 08 7c 86 03 98 "),
            "00 08 7c 86 03 98"
        );
    }

    #[test]
    fn normalize_strips_integer_prefix() {
        assert_eq!(normalize_snmp_text("INTEGER: 5"), "5");
    }

    #[test]
    fn normalize_strips_surrounding_quotes() {
        assert_eq!(normalize_snmp_text("\"switch-a\""), "switch-a");
    }

    #[test]
    fn normalize_trims_whitespace_with_no_prefix() {
        assert_eq!(normalize_snmp_text("  12345  "), "12345");
    }

    #[tokio::test]
    #[ignore = "requires network access to an unreachable test address"]
    async fn get_against_unreachable_host_errors() {
        let target = NodeTarget::new("192.0.2.0", "public", 200);
        let result = get(target, vec![1, 3, 6, 1, 2, 1, 1, 1, 0]).await;
        assert!(result.is_err());
    }
}
