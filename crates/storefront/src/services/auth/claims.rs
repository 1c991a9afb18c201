//! Field extraction from heterogeneous auth payloads.
//!
//! The backend's auth responses and token claims have drifted across
//! versions: the same fact (role, email, name) shows up under different
//! keys, sometimes nested. Each canonical field therefore maps to an
//! ordered candidate key list, tried directly first and then via a
//! breadth-first search of the whole payload.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::session::keys;

/// One canonical session field and the wire keys it may hide under.
pub struct FieldSource {
    /// Session key the extracted value is persisted under.
    pub session_key: &'static str,
    /// Candidate wire keys, in priority order.
    pub candidates: &'static [&'static str],
}

/// Fields recovered from login and profile responses.
pub const PROFILE_FIELDS: &[FieldSource] = &[
    FieldSource {
        session_key: keys::ROLE,
        candidates: &["role", "userRole", "authority", "authorities"],
    },
    FieldSource {
        session_key: keys::EMAIL,
        candidates: &["email", "userEmail", "emailAddress", "sub"],
    },
    FieldSource {
        session_key: keys::NAME,
        candidates: &["name", "fullName", "username"],
    },
];

/// Fields recovered from a decoded token payload.
pub const TOKEN_CLAIM_FIELDS: &[FieldSource] = &[
    FieldSource {
        session_key: keys::EMAIL,
        candidates: &["email", "userEmail", "sub"],
    },
    FieldSource {
        session_key: keys::ROLE,
        candidates: &["role", "userRole", "authorities"],
    },
    FieldSource {
        session_key: keys::NAME,
        candidates: &["name", "fullName", "username"],
    },
];

/// Extract a field from a payload: direct candidate keys first, then a
/// breadth-first search of nested objects and arrays.
#[must_use]
pub fn extract_field(payload: &Value, candidates: &[&str]) -> Option<String> {
    direct_lookup(payload, candidates).or_else(|| deep_find(payload, candidates))
}

/// Try each candidate key directly on the top-level object.
fn direct_lookup(payload: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|key| payload.get(key).and_then(coerce_to_string))
}

/// Breadth-first search of nested fields for any candidate key.
fn deep_find(root: &Value, candidates: &[&str]) -> Option<String> {
    let mut queue = vec![root];
    let mut cursor = 0;

    while let Some(current) = queue.get(cursor).copied() {
        cursor += 1;

        if let Some(object) = current.as_object() {
            for key in candidates {
                if let Some(found) = object.get(*key).and_then(coerce_to_string) {
                    return Some(found);
                }
            }
            queue.extend(object.values());
        } else if let Some(array) = current.as_array() {
            queue.extend(array.iter());
        }
    }

    None
}

/// Coerce a candidate value to a string.
///
/// Strings pass through; an array yields its first string element (role
/// lists like `authorities` arrive that way). Everything else is ignored.
fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }),
        _ => None,
    }
}

/// Decode the claims segment of a bearer token.
///
/// Expects the usual three-segment layout with a base64url-encoded JSON
/// object in the middle. Returns `None` for anything else; an unreadable
/// token only means its fallback data is unavailable.
#[must_use]
pub fn decode_token_claims(token: &str) -> Option<Value> {
    let mut segments = token.split('.');
    let (_, payload, _) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| {
            tracing::warn!(error = %e, "Token payload is not valid base64url");
        })
        .ok()?;

    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| {
            tracing::warn!(error = %e, "Token payload is not valid JSON");
        })
        .ok()?;

    claims.is_object().then_some(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Build an unsigned token with the given claims object.
    pub(crate) fn fake_token(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn test_direct_lookup_respects_priority_order() {
        let payload = json!({"userRole": "customer", "role": "admin"});
        assert_eq!(
            extract_field(&payload, &["role", "userRole"]).as_deref(),
            Some("admin")
        );
    }

    #[test]
    fn test_extract_falls_back_to_nested_fields() {
        let payload = json!({
            "data": {
                "user": {"emailAddress": "nested@example.com"}
            }
        });
        assert_eq!(
            extract_field(&payload, &["email", "emailAddress"]).as_deref(),
            Some("nested@example.com")
        );
    }

    #[test]
    fn test_extract_takes_first_string_from_arrays() {
        let payload = json!({"authorities": ["admin", "ops"]});
        assert_eq!(
            extract_field(&payload, &["role", "authorities"]).as_deref(),
            Some("admin")
        );
    }

    #[test]
    fn test_extract_searches_inside_arrays() {
        let payload = json!({"results": [{"meta": {}}, {"userEmail": "deep@example.com"}]});
        assert_eq!(
            extract_field(&payload, &["userEmail"]).as_deref(),
            Some("deep@example.com")
        );
    }

    #[test]
    fn test_extract_ignores_non_string_values() {
        let payload = json!({"role": 42});
        assert!(extract_field(&payload, &["role"]).is_none());
    }

    #[test]
    fn test_decode_token_claims_round_trip() {
        let claims = json!({"email": "a@b.com", "role": "admin"});
        let token = fake_token(&claims);

        let decoded = decode_token_claims(&token).expect("decodes");
        assert_eq!(decoded["email"], "a@b.com");
        assert_eq!(decoded["role"], "admin");
    }

    #[test]
    fn test_decode_token_claims_rejects_wrong_segment_count() {
        assert!(decode_token_claims("only-one-segment").is_none());
        assert!(decode_token_claims("a.b").is_none());
        assert!(decode_token_claims("a.b.c.d").is_none());
    }

    #[test]
    fn test_decode_token_claims_rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode(b"definitely not json");
        assert!(decode_token_claims(&format!("h.{payload}.s")).is_none());
    }
}
