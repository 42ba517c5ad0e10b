//! OID and MAC-address parsing helpers shared by several handlers
//! (interface discovery, MAC table, ARP). Kept here rather than duplicated
//! per-handler since the same extraction rules apply across domains.

/// Terminal numeric component of a dotted OID string, e.g. the ifIndex at
/// the end of `1.3.6.1.2.1.2.2.1.2.<index>`.
pub fn trailing_index(oid: &str) -> Option<i32> {
    oid.rsplit('.').next()?.parse().ok()
}

/// Recover a MAC address from the last six dotted components of an OID,
/// interpreting each as a byte (spec §4.2.3(a)).
pub fn mac_from_oid_suffix(oid: &str) -> Option<String> {
    let parts: Vec<&str> = oid.split('.').collect();
    if parts.len() < 6 {
        return None;
    }
    let tail = &parts[parts.len() - 6..];
    let mut bytes = Vec::with_capacity(6);
    for p in tail {
        bytes.push(p.parse::<u8>().ok()?);
    }
    Some(format_mac_bytes(&bytes))
}

/// Format six raw bytes as `aa:bb:cc:dd:ee:ff` lowercase.
pub fn format_mac_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse a MAC address out of arbitrary SNMP value text, tolerating
/// `Hex-STRING:`, `0x`, spaces, and colon separators, as long as exactly
/// 12 hex characters remain (spec §4.2.3(b), §8 round-trip law).
pub fn parse_mac_text(value: &str) -> Option<String> {
    let mut v = value.trim();
    if let Some(rest) = v.strip_prefix("Hex-STRING:") {
        v = rest.trim();
    }
    let lower = v.to_ascii_lowercase();
    let v = if let Some(rest) = lower.strip_prefix("0x") {
        rest
    } else {
        lower.as_str()
    };
    let hex: String = v.chars().filter(|c| *c != ' ' && *c != ':').collect();
    if hex.len() == 12 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut out = String::with_capacity(17);
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                out.push(':');
            }
            out.push_str(std::str::from_utf8(chunk).unwrap());
        }
        Some(out)
    } else {
        None
    }
}

/// First integer literal found in arbitrary value text, tolerating type
/// prefixes such as `INTEGER: 5` (spec §4.2.3).
pub fn first_integer(value: &str) -> Option<i64> {
    let mut digits = String::new();
    let mut negative = false;
    let mut seen_digit = false;
    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            seen_digit = true;
        } else if c == '-' && !seen_digit {
            negative = true;
        } else if seen_digit {
            break;
        }
    }
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|n| if negative { -n } else { n })
}

/// Extract `(if_index, ipv4_dotted)` from an OID of the shape
/// `<base>.<ifIndex>.<a>.<b>.<c>.<d>`. Requires at least five trailing
/// numeric components; falls back to `(None, ip_if_possible)` otherwise
/// (spec §8 OID→(ifIndex, IPv4) extraction law).
pub fn extract_ifindex_and_ipv4(oid: &str) -> (Option<i32>, Option<String>) {
    let parts: Vec<&str> = oid.split('.').collect();
    if parts.len() >= 5 {
        let tail = &parts[parts.len() - 5..];
        if tail.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty()) {
            let if_index = tail[0].parse::<i32>().ok();
            let ip = tail[1..].join(".");
            return (if_index, Some(ip));
        }
    }
    (None, extract_ipv4_only(oid))
}

fn extract_ipv4_only(oid: &str) -> Option<String> {
    let parts: Vec<&str> = oid.split('.').collect();
    if parts.len() >= 4 {
        let tail = &parts[parts.len() - 4..];
        if tail.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty()) {
            return Some(tail.join("."));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_index_reads_last_component() {
        assert_eq!(trailing_index("1.3.6.1.2.1.2.2.1.2.7"), Some(7));
    }

    #[test]
    fn trailing_index_rejects_non_numeric() {
        assert_eq!(trailing_index("not.an.oid"), None);
    }

    #[test]
    fn mac_from_oid_suffix_reads_last_six_octets() {
        let oid = "1.3.6.1.2.1.17.4.3.1.1.0.8.124.134.3.152";
        assert_eq!(mac_from_oid_suffix(oid).as_deref(), Some("00:08:7c:86:03:98"));
    }

    #[test]
    fn parse_mac_text_accepts_hex_string_prefix() {
        assert_eq!(
            parse_mac_text("Hex-STRING: 00 08 7c 86 03 98").as_deref(),
            Some("00:08:7c:86:03:98")
        );
    }

    #[test]
    fn parse_mac_text_accepts_0x_prefix() {
        assert_eq!(parse_mac_text("0x00087c860398").as_deref(), Some("00:08:7c:86:03:98"));
    }

    #[test]
    fn parse_mac_text_accepts_bare_hex() {
        assert_eq!(parse_mac_text("00087c860398").as_deref(), Some("00:08:7c:86:03:98"));
    }

    #[test]
    fn parse_mac_text_accepts_colon_separated() {
        assert_eq!(parse_mac_text("00:08:7c:86:03:98").as_deref(), Some("00:08:7c:86:03:98"));
    }

    #[test]
    fn parse_mac_text_rejects_wrong_length() {
        assert_eq!(parse_mac_text("00:08:7c"), None);
    }

    #[test]
    fn format_mac_bytes_round_trips_through_parse() {
        let bytes = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
        let formatted = format_mac_bytes(&bytes);
        assert_eq!(formatted, "aa:bb:cc:dd:ee:ff");
        assert_eq!(parse_mac_text(&formatted).as_deref(), Some(formatted.as_str()));
    }

    #[test]
    fn first_integer_tolerates_type_prefix() {
        assert_eq!(first_integer("INTEGER: 5"), Some(5));
    }

    #[test]
    fn first_integer_handles_bare_number() {
        assert_eq!(first_integer("42"), Some(42));
    }

    #[test]
    fn extract_ifindex_and_ipv4_reads_five_trailing_components() {
        let oid = "1.3.6.1.2.1.4.22.1.2.3.10.0.0.1";
        assert_eq!(
            extract_ifindex_and_ipv4(oid),
            (Some(3), Some("10.0.0.1".to_string()))
        );
    }

    #[test]
    fn extract_ifindex_and_ipv4_falls_back_to_ip_only() {
        // Fewer than five trailing numeric components (no ifIndex segment).
        let oid = "10.0.0.1";
        let (if_index, ip) = extract_ifindex_and_ipv4(oid);
        assert_eq!(if_index, None);
        assert_eq!(ip.as_deref(), Some("10.0.0.1"));
    }
}
