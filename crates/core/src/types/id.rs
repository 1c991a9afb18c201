//! Newtype IDs for type-safe entity references.
//!
//! The remote catalog hands out opaque string identifiers. Wrapping them in
//! per-entity newtypes prevents accidentally passing a category id where a
//! product id is expected.

/// Macro to define a type-safe ID wrapper around a server-issued string.
///
/// Creates a newtype with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()`, `as_str()`, `Display`, and `From<String>`/`From<&str>`
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(OrderId);
///
/// let id = OrderId::new("665f1a2b3c4d5e6f70819203");
/// assert_eq!(id.as_str(), "665f1a2b3c4d5e6f70819203");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CategoryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = ProductId::new("abc123");
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(ProductId::from("abc123"), id);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: CategoryId = serde_json::from_str("\"cat-9\"").expect("valid id json");
        assert_eq!(id, CategoryId::new("cat-9"));
        assert_eq!(
            serde_json::to_string(&id).expect("serializes"),
            "\"cat-9\""
        );
    }
}
