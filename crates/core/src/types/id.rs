//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Identifiers in the
//! shop are human-readable strings, so the wrappers hold a `String`.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeZone};
use uuid::Uuid;

/// Number of hex digits in a generated product identifier.
const PRODUCT_ID_HEX_LEN: usize = 6;

/// Timestamp prefix of an order identifier.
const ORDER_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use corner_shop_core::define_id;
/// define_id!(SkuId);
/// define_id!(WarehouseId);
///
/// let sku = SkuId::new("SKU-1");
/// let warehouse = WarehouseId::new("SKU-1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = warehouse;
/// assert_eq!(sku.as_str(), warehouse.as_str());
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

impl ProductId {
    /// Generate a fresh product identifier of the form `P-XXXXXX`.
    ///
    /// Uniqueness against an existing catalog is the caller's concern.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        let suffix: String = hex.chars().take(PRODUCT_ID_HEX_LEN).collect();
        Self(format!("P-{}", suffix.to_uppercase()))
    }
}

impl OrderId {
    /// Build an order identifier of the form `YYYYMMDD-HHMMSS-XXXX`.
    #[must_use]
    pub fn from_parts<Tz>(now: &DateTime<Tz>, suffix: u16) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: core::fmt::Display,
    {
        Self(format!("{}-{suffix:04X}", now.format(ORDER_STAMP_FORMAT)))
    }
}

/// Hands out order identifiers with random four-digit hex suffixes.
///
/// Suffixes never repeat within the same second for one generator, until all
/// 65536 have been issued.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    issued: Mutex<IssuedSuffixes>,
}

#[derive(Debug, Default)]
struct IssuedSuffixes {
    stamp: String,
    used: HashSet<u16>,
}

impl OrderIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier for an order placed at `now`.
    pub fn next<Tz>(&self, now: &DateTime<Tz>) -> OrderId
    where
        Tz: TimeZone,
        Tz::Offset: core::fmt::Display,
    {
        let stamp = now.format(ORDER_STAMP_FORMAT).to_string();
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);

        if issued.stamp != stamp {
            issued.stamp = stamp;
            issued.used.clear();
        }

        let suffix = if issued.used.len() > usize::from(u16::MAX) {
            rand::random()
        } else {
            loop {
                let candidate: u16 = rand::random();
                if issued.used.insert(candidate) {
                    break candidate;
                }
            }
        };

        OrderId::from_parts(now, suffix)
    }
}
