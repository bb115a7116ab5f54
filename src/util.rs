//! Request header helpers.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Client identity used when neither the peer address nor a trusted proxy
/// header is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the credential from the Authorization header.
///
/// The credential is the second whitespace-separated part, whatever the
/// scheme, so `Basic abc` yields `abc` and fails verification later.
/// Returns None only when the header is missing or has no second part.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split_whitespace().nth(1))
}

/// Client identity for rate limiting.
///
/// With `trust_proxy`, the first `x-forwarded-for` entry wins, then
/// `x-real-ip`. Otherwise (or when neither header is usable) the peer IP.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };
        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
