//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (embedded-app CSP)
//! 5. Session token extractor on `/api/*` handlers

pub mod request_id;
pub mod security_headers;
pub mod session_token;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::{embedded_app_csp, security_headers_middleware};
pub use session_token::{SessionClaims, SessionTokenError, SessionTokenVerifier};
