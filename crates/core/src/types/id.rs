//! Newtype IDs for Shopify resources.
//!
//! Shopify identifies resources in two ways: the REST API uses bare numeric
//! IDs (`8994490974373`) while the GraphQL API uses global IDs
//! (`gid://shopify/Product/8994490974373`). The admin UI may send either, so
//! every ID type here accepts both forms and renders as a global ID.
//!
//! Use the `define_gid!` macro to create wrappers that prevent mixing IDs
//! from different resource types.

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a Shopify ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The global ID names a different resource type.
    #[error("expected a {expected} id, got {found}")]
    WrongResource {
        /// Resource type the caller asked for.
        expected: &'static str,
        /// Resource type found in the global ID.
        found: String,
    },
    /// The numeric part is missing or not a positive integer.
    #[error("invalid numeric id: {0}")]
    InvalidNumber(String),
}

/// Macro to define a Shopify resource ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `parse()` accepting `"123"` or `"gid://shopify/<Resource>/123"`
/// - `Display` and `Serialize` as the global ID
/// - `Deserialize` through `parse()`
/// - Accessors `numeric()` (REST paths) and `gid()` (GraphQL variables)
///
/// # Example
///
/// ```rust
/// # use shop_panel_core::define_gid;
/// define_gid!(ProductId, "Product");
/// define_gid!(CollectionId, "Collection");
///
/// let product = ProductId::parse("42").unwrap();
/// assert_eq!(product.gid(), "gid://shopify/Product/42");
///
/// // A collection GID is not a product ID:
/// assert!(ProductId::parse("gid://shopify/Collection/42").is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Shopify resource type name used in global IDs.
            pub const RESOURCE: &'static str = $resource;

            /// Create an ID from its numeric value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Parse an ID from a bare number or a global ID.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty, names a different
            /// resource type, or has no valid numeric part.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                $crate::types::id::parse_numeric(s, Self::RESOURCE).map(Self)
            }

            /// Numeric ID, as used in REST paths.
            #[must_use]
            pub const fn numeric(&self) -> u64 {
                self.0
            }

            /// Global ID, as used in GraphQL variables.
            #[must_use]
            pub fn gid(&self) -> String {
                format!("{}{}/{}", $crate::types::id::GID_PREFIX, Self::RESOURCE, self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}{}/{}", $crate::types::id::GID_PREFIX, Self::RESOURCE, self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                let raw = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Extract the numeric part of a bare or global ID for `resource`.
///
/// Query strings on global IDs (`gid://shopify/Product/1?x=y`) are ignored.
///
/// # Errors
///
/// See [`IdError`].
pub fn parse_numeric(s: &str, resource: &'static str) -> Result<u64, IdError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(IdError::Empty);
    }

    let number = match s.strip_prefix(GID_PREFIX) {
        Some(rest) => {
            let (kind, tail) = rest
                .split_once('/')
                .ok_or_else(|| IdError::InvalidNumber(s.to_string()))?;
            if kind != resource {
                return Err(IdError::WrongResource {
                    expected: resource,
                    found: kind.to_string(),
                });
            }
            tail.split('?').next().unwrap_or(tail)
        }
        None => s,
    };

    match number.parse::<u64>() {
        Ok(0) | Err(_) => Err(IdError::InvalidNumber(number.to_string())),
        Ok(n) => Ok(n),
    }
}

define_gid!(ProductId, "Product");
define_gid!(CollectionId, "Collection");
define_gid!(VariantId, "ProductVariant");
