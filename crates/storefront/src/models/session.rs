//! Session-related types.
//!
//! Types stored in the per-visitor session: cart, admin identity, the most
//! recent order and a one-shot flash notice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
///
/// Present only after a successful admin login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Username the admin logged in with.
    pub username: String,
}

/// Severity of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Ok,
    Error,
}

impl fmt::Display for FlashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the logged-in admin identity.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the id of the most recently placed order.
    pub const LAST_ORDER_ID: &str = "last_order_id";

    /// Key for the pending flash notice.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_kind_display() {
        assert_eq!(FlashKind::Ok.to_string(), "ok");
        assert_eq!(FlashKind::Error.to_string(), "error");
    }

    #[test]
    fn test_flash_serializes_lowercase_kind() {
        let json = serde_json::to_string(&Flash::error("Name is required.")).unwrap();
        assert_eq!(json, r#"{"kind":"error","message":"Name is required."}"#);
    }
}
