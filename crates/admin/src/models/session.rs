//! Authenticated shop session.

use serde::Serialize;

/// Identity of the embedded-app request, taken from a verified session token.
///
/// Request scoped: built per request by the session token extractor and used
/// to construct that request's catalog client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopSession {
    /// Shop domain, e.g. `my-store.myshopify.com`.
    pub shop: String,
    /// Staff member the token was issued to (`sub`), if present.
    pub user_id: Option<String>,
    /// Shopify session id (`sid`), if present.
    pub session_id: Option<String>,
}

impl ShopSession {
    /// Session for a shop with no user context.
    #[must_use]
    pub fn for_shop(shop: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            user_id: None,
            session_id: None,
        }
    }

    /// Store handle used in admin URLs (`my-store` for `my-store.myshopify.com`).
    #[must_use]
    pub fn shop_subdomain(&self) -> &str {
        self.shop.split('.').next().unwrap_or(&self.shop)
    }
}
