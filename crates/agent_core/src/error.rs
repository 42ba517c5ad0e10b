use crate::snmp::SnmpError;

/// Top-level error used by the binary's startup and reconnect path.
///
/// Individual crates (`db`, `handlers`, `poller`) define their own error
/// enums; this type exists for the handful of places that must unify them
/// (mainly `main.rs`'s DB-reconnect loop, spec §7 "Fatal").
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("SNMP error: {0}")]
    Snmp(#[from] SnmpError),

    #[error("{0}")]
    Other(String),
}
