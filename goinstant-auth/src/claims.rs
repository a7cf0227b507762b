//! Claim mapping from caller-facing field names to JWT claim names.
//!
//! Mapping functions take the record by value: callers hand in their own copy
//! and never see it mutated. Renaming removes the source key and appends the
//! value under its claim name, so the resulting key order is deterministic
//! for a given input order.

use serde_json::{Map, Value};

use crate::error::{signer_error, Error, SignerErrorKind};

/// A JSON object with insertion-ordered keys.
pub type Record = Map<String, Value>;

/// Pairs of (input field, claim name), applied in order.
pub type RenameTable = [(&'static str, &'static str)];

/// Message used when a required field is absent; `%s` is the field name.
pub const MISSING_REQUIRED_KEY: &str = "missing required key: %s";

/// Required user fields and their claim names.
pub const REQUIRED_CLAIMS: &RenameTable =
    &[("domain", "iss"), ("id", "sub"), ("display_name", "dn")];

/// Optional user fields and their claim names.
pub const OPTIONAL_CLAIMS: &RenameTable = &[("groups", "g")];

/// Required group fields and their claim names.
pub const REQUIRED_GROUP_CLAIMS: &RenameTable = &[("id", "id"), ("display_name", "dn")];

/// Renames required fields, failing on the first one that is absent.
///
/// # Arguments
///
/// * `record` - Owned copy of the caller's record
/// * `table` - Rename table, evaluated in order
/// * `missing_message` - Message template; `%s` is replaced by the missing field name
pub fn map_required(
    mut record: Record,
    table: &RenameTable,
    missing_message: &str,
) -> Result<Record, Error> {
    for (name, claim_name) in table {
        let value = record.shift_remove(*name).ok_or_else(|| {
            signer_error(
                SignerErrorKind::MissingRequiredKey,
                &missing_message.replacen("%s", name, 1),
            )
        })?;
        record.insert(claim_name.to_string(), value);
    }
    Ok(record)
}

/// Renames optional fields, skipping those that are absent.
pub fn map_optional(mut record: Record, table: &RenameTable) -> Record {
    for (name, claim_name) in table {
        if let Some(value) = record.shift_remove(*name) {
            record.insert(claim_name.to_string(), value);
        }
    }
    record
}

/// Drops every field that is not an input field of one of the given tables.
///
/// Applied before renaming, so a caller field that happens to share a claim
/// name (`g`, `iss`) is dropped instead of being taken for a mapped value.
pub fn retain_fields(record: &mut Record, tables: &[&RenameTable]) {
    record.retain(|key, _| {
        tables
            .iter()
            .flat_map(|table| table.iter())
            .any(|(name, _)| *name == key.as_str())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn test_map_required_renames_in_table_order() {
        let user =
            record(json!({ "id": "bar", "domain": "example.com", "display_name": "bob" }));
        let mapped = map_required(user, REQUIRED_CLAIMS, MISSING_REQUIRED_KEY).unwrap();

        let keys: Vec<&str> = mapped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["iss", "sub", "dn"]);
        assert_eq!(mapped["iss"], "example.com");
        assert_eq!(mapped["sub"], "bar");
        assert_eq!(mapped["dn"], "bob");
    }

    #[test]
    fn test_map_required_same_name_moves_key_to_end() {
        let group = record(json!({ "id": 7, "display_name": "Seven" }));
        let mapped = map_required(group, REQUIRED_GROUP_CLAIMS, MISSING_REQUIRED_KEY).unwrap();

        let keys: Vec<&str> = mapped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "dn"]);
        assert_eq!(mapped["id"], 7);
    }

    #[test]
    fn test_map_required_reports_first_missing_field() {
        let user = record(json!({ "display_name": "bob" }));
        let err = map_required(user, REQUIRED_CLAIMS, MISSING_REQUIRED_KEY).unwrap_err();
        assert_eq!(err.to_string(), "missing required key: domain");
        assert_eq!(
            err.error_kind,
            crate::error::ErrorKind::Signer(SignerErrorKind::MissingRequiredKey)
        );
    }

    #[test]
    fn test_map_required_uses_message_template() {
        let group = record(json!({ "id": 1 }));
        let err = map_required(
            group,
            REQUIRED_GROUP_CLAIMS,
            "group 3 missing required key: %s",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "group 3 missing required key: display_name");
    }

    #[test]
    fn test_map_required_accepts_null_values() {
        let user = record(json!({ "domain": null, "id": null, "display_name": null }));
        let mapped = map_required(user, REQUIRED_CLAIMS, MISSING_REQUIRED_KEY).unwrap();
        assert_eq!(mapped["sub"], Value::Null);
    }

    #[test]
    fn test_map_optional_skips_absent_fields() {
        let user = record(json!({ "iss": "example.com" }));
        let mapped = map_optional(user.clone(), OPTIONAL_CLAIMS);
        assert_eq!(mapped, user);
    }

    #[test]
    fn test_map_optional_renames_present_fields() {
        let user = record(json!({ "groups": [], "iss": "example.com" }));
        let mapped = map_optional(user, OPTIONAL_CLAIMS);

        let keys: Vec<&str> = mapped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["iss", "g"]);
    }

    #[test]
    fn test_retain_fields_drops_unrecognized_fields() {
        let mut user = record(json!({
            "id": "bar",
            "email": "x@y.z",
            "domain": "example.com",
            "groups": [],
            "display_name": "bob"
        }));
        retain_fields(&mut user, &[REQUIRED_CLAIMS, OPTIONAL_CLAIMS]);

        let keys: Vec<&str> = user.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "domain", "groups", "display_name"]);
    }

    #[test]
    fn test_retain_fields_drops_fields_named_like_claims() {
        let mut user = record(json!({ "iss": "a", "sub": "b", "dn": "c", "g": [], "id": 1 }));
        retain_fields(&mut user, &[REQUIRED_CLAIMS, OPTIONAL_CLAIMS]);

        let keys: Vec<&str> = user.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id"]);
    }
}
