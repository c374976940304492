//! Security headers for an app embedded in the Shopify admin.
//!
//! The app is rendered inside an iframe on `admin.shopify.com`, so framing
//! must be allowed for exactly the shop and the admin, and nothing else.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, InvalidHeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Build the `Content-Security-Policy` value for `shop`.
///
/// # Errors
///
/// Returns an error if `shop` contains characters not allowed in a header.
pub fn embedded_app_csp(shop: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "frame-ancestors https://{shop} https://admin.shopify.com;"
    ))
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy: frame-ancestors ...` - Only the shop admin may frame the app
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: strict-origin-when-cross-origin`
pub async fn security_headers_middleware(
    State(csp): State<HeaderValue>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(CONTENT_SECURITY_POLICY, csp);
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
