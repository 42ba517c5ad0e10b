//! JSON encoding for the `(oid, value)` pairs a Phase-1 raw result row
//! carries in `val` (spec §4.2.2). Encoded as a list of pairs; decode also
//! accepts a map form, since the spec requires both be accepted.

/// Encodes a dotted-OID capture as the list-of-pairs JSON form.
pub fn encode(entries: &[(String, String)]) -> String {
    serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes either the list-of-pairs form (`[["oid","value"], ...]`) or a
/// map form (`{"oid": "value", ...}`), tolerating whichever the JSON
/// actually contains.
pub fn decode(json: &str) -> Vec<(String, String)> {
    if let Ok(pairs) = serde_json::from_str::<Vec<(String, String)>>(json) {
        return pairs;
    }
    if let Ok(map) = serde_json::from_str::<std::collections::HashMap<String, String>>(json) {
        return map.into_iter().collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_list_of_pairs() {
        let entries = vec![
            ("1.3.6.1.2.1.1.5.0".to_string(), "switch-a".to_string()),
            ("1.3.6.1.2.1.1.2.0".to_string(), "1.3.6.1.4.1.9.1.1".to_string()),
        ];
        let encoded = encode(&entries);
        assert_eq!(decode(&encoded), entries);
    }

    #[test]
    fn decodes_map_form() {
        let json = r#"{"1.3.6.1.2.1.1.5.0":"switch-a"}"#;
        let decoded = decode(json);
        assert_eq!(decoded, vec![("1.3.6.1.2.1.1.5.0".to_string(), "switch-a".to_string())]);
    }

    #[test]
    fn decodes_garbage_as_empty() {
        assert!(decode("not json").is_empty());
    }
}
