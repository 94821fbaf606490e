//! Typed access to per-visitor session state.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;

use corner_shop_core::{Cart, OrderId};

use crate::models::{CurrentAdmin, Flash, session_keys};

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Extractor wrapping the visitor's session with typed accessors.
///
/// Reads never fail: a missing or unreadable value reads as absent.
/// Writes surface session store errors.
#[derive(Clone)]
pub struct ShopSession(Session);

impl<S> FromRequestParts<S> for ShopSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}

impl ShopSession {
    /// The underlying session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.0
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The visitor's cart, empty if none has been stored yet.
    pub async fn cart(&self) -> Cart {
        self.0
            .get::<Cart>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Store the visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_cart(&self, cart: &Cart) -> SessionResult<()> {
        self.0.insert(session_keys::CART, cart).await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// The logged-in admin, if any.
    pub async fn current_admin(&self) -> Option<CurrentAdmin> {
        self.0
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Id of the most recent order placed in this session.
    pub async fn last_order_id(&self) -> Option<OrderId> {
        self.0
            .get::<OrderId>(session_keys::LAST_ORDER_ID)
            .await
            .ok()
            .flatten()
    }

    /// Remember the most recent order.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_last_order_id(&self, id: &OrderId) -> SessionResult<()> {
        self.0.insert(session_keys::LAST_ORDER_ID, id).await
    }

    // =========================================================================
    // Flash notices
    // =========================================================================

    /// Queue a notice for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn flash(&self, flash: Flash) -> SessionResult<()> {
        self.0.insert(session_keys::FLASH, flash).await
    }

    /// Remove and return the pending notice.
    pub async fn take_flash(&self) -> Option<Flash> {
        self.0
            .remove::<Flash>(session_keys::FLASH)
            .await
            .ok()
            .flatten()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use corner_shop_core::ProductId;
    use tower_sessions::MemoryStore;

    use super::*;

    fn shop_session() -> ShopSession {
        ShopSession(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_cart_defaults_to_empty_and_persists() {
        let shop = shop_session();
        assert!(shop.cart().await.is_empty());

        let mut cart = Cart::new();
        cart.add(&ProductId::new("P-1"), 2, 5);
        shop.set_cart(&cart).await.unwrap();

        assert_eq!(shop.cart().await, cart);
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let shop = shop_session();
        shop.flash(Flash::ok("Item added to cart.")).await.unwrap();

        assert_eq!(shop.take_flash().await, Some(Flash::ok("Item added to cart.")));
        assert_eq!(shop.take_flash().await, None);
    }

    #[tokio::test]
    async fn test_last_order_id() {
        let shop = shop_session();
        assert_eq!(shop.last_order_id().await, None);

        let id = OrderId::new("20240101-120000-BEEF");
        shop.set_last_order_id(&id).await.unwrap();
        assert_eq!(shop.last_order_id().await, Some(id));
    }
}
