//! Shopify session token authentication for `/api/*` routes.
//!
//! The embedded admin sends `Authorization: Bearer <token>`, where the token
//! is an HS256 JWT signed with the app's API secret. A verified token yields
//! a [`ShopSession`].

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::bundles::CatalogProvider;
use crate::config::ShopifyAppConfig;
use crate::models::ShopSession;
use crate::state::AppState;

/// Clock skew tolerated on `exp` / `nbf`, in seconds.
const LEEWAY_SECS: u64 = 5;

/// Lifetime of tokens minted by [`SessionClaims::for_shop`], matching Shopify's.
const TOKEN_LIFETIME_SECS: i64 = 60;

/// Header telling App Bridge to fetch a fresh token and retry.
const RETRY_INVALID_SESSION_HEADER: &str = "x-shopify-retry-invalid-session-request";

/// Errors from session token verification.
#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("missing bearer token")]
    Missing,

    #[error("malformed session token")]
    Malformed,

    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("session token expired")]
    Expired,

    #[error("session token not yet valid")]
    NotYetValid,

    #[error("session token issued for another app")]
    WrongAudience,

    #[error("session token issued for another shop")]
    WrongShop,
}

impl IntoResponse for SessionTokenError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Rejected session token");

        let body = Json(serde_json::json!({ "message": "Unauthorized" }));
        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        if !matches!(self, Self::WrongShop | Self::WrongAudience) {
            response
                .headers_mut()
                .insert(RETRY_INVALID_SESSION_HEADER, HeaderValue::from_static("1"));
        }
        response
    }
}

impl From<jsonwebtoken::errors::Error> for SessionTokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm => Self::UnsupportedAlgorithm,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAudience => Self::WrongAudience,
            _ => Self::Malformed,
        }
    }
}

/// Claims carried by a Shopify session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Shop admin URL, e.g. `https://my-store.myshopify.com/admin`.
    pub iss: String,
    /// Shop URL, e.g. `https://my-store.myshopify.com`.
    pub dest: String,
    /// App API key.
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

impl SessionClaims {
    /// Claims for a token issued now for `shop`, valid for one minute.
    #[must_use]
    pub fn for_shop(shop: &str, api_key: &str, now: i64) -> Self {
        Self {
            iss: format!("https://{shop}/admin"),
            dest: format!("https://{shop}"),
            aud: api_key.to_string(),
            sub: None,
            exp: now + TOKEN_LIFETIME_SECS,
            nbf: now,
            iat: now,
            jti: Some(uuid::Uuid::new_v4().to_string()),
            sid: None,
        }
    }
}

/// Verifies (and, for tooling and tests, mints) session tokens.
pub struct SessionTokenVerifier {
    api_key: String,
    api_secret: SecretString,
    store: String,
}

impl std::fmt::Debug for SessionTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenVerifier")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("store", &self.store)
            .finish()
    }
}

impl SessionTokenVerifier {
    #[must_use]
    pub fn new(config: &ShopifyAppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            store: config.store.clone(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_audience(&[&self.api_key]);
        validation.set_required_spec_claims(&["exp", "nbf", "aud", "iss"]);
        validation
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, badly signed, outside its
    /// validity window, or issued for another app or shop.
    pub fn verify(&self, token: &str) -> Result<ShopSession, SessionTokenError> {
        let key = DecodingKey::from_secret(self.api_secret.expose_secret().as_bytes());
        let claims = decode::<SessionClaims>(token, &key, &self.validation())?.claims;

        let shop = url_host(&claims.dest).ok_or(SessionTokenError::Malformed)?;
        if url_host(&claims.iss).as_deref() != Some(shop.as_str())
            || !shop.eq_ignore_ascii_case(&self.store)
        {
            return Err(SessionTokenError::WrongShop);
        }

        Ok(ShopSession {
            shop,
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }

    /// Encode and sign claims as an HS256 token.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, SessionTokenError> {
        let key = EncodingKey::from_secret(self.api_secret.expose_secret().as_bytes());
        Ok(encode(&Header::new(Algorithm::HS256), claims, &key)?)
    }

    /// Mint a token for the configured store, issued at `now` (Unix seconds).
    ///
    /// # Errors
    ///
    /// See [`Self::sign`].
    pub fn issue(&self, now: i64) -> Result<String, SessionTokenError> {
        self.sign(&SessionClaims::for_shop(&self.store, &self.api_key, now))
    }
}

fn url_host(raw: &str) -> Option<String> {
    Url::parse(raw).ok()?.host_str().map(str::to_ascii_lowercase)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

impl<P: CatalogProvider> FromRequestParts<AppState<P>> for ShopSession {
    type Rejection = SessionTokenError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<P>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(SessionTokenError::Missing)?;
        let session = state.session_tokens().verify(token)?;

        tracing::Span::current().record("shop", session.shop.as_str());
        sentry::configure_scope(|scope| {
            scope.set_tag("shop", &session.shop);
        });

        Ok(session)
    }
}
