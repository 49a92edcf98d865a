use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use std::env;
use tower_http::set_header::SetResponseHeaderLayer;

/// Security header names
const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
const X_FRAME_OPTIONS: &str = "x-frame-options";
const STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";
const CONTENT_SECURITY_POLICY: &str = "content-security-policy";
const REFERRER_POLICY: &str = "referrer-policy";

/// Security header values
const NOSNIFF: &str = "nosniff";
const DENY: &str = "DENY";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";

/// Headers added to every response unless a handler already set them.
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    include_hsts: bool,
}

impl SecurityHeaders {
    pub fn new(include_hsts: bool) -> Self {
        Self { include_hsts }
    }

    /// HSTS only when `RUST_ENV=production`, i.e. behind HTTPS.
    pub fn from_env() -> Self {
        Self::for_environment(env::var("RUST_ENV").ok().as_deref())
    }

    pub fn for_environment(rust_env: Option<&str>) -> Self {
        let is_production = rust_env
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        if is_production {
            tracing::info!("Security: HSTS header enabled (production mode)");
        } else {
            tracing::info!("Security: HSTS header disabled (development mode)");
        }

        Self::new(is_production)
    }

    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            header(X_CONTENT_TYPE_OPTIONS, NOSNIFF),
            header(X_FRAME_OPTIONS, DENY),
            header(CONTENT_SECURITY_POLICY, CSP_VALUE),
            header(REFERRER_POLICY, REFERRER_POLICY_VALUE),
        ];
        if self.include_hsts {
            headers.push(header(STRICT_TRANSPORT_SECURITY, HSTS_VALUE));
        }
        headers
    }

    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.headers()
            .into_iter()
            .fold(router, |router, (name, value)| {
                router.layer(SetResponseHeaderLayer::if_not_present(name, value))
            })
    }
}

fn header(name: &'static str, value: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsts_only_when_requested() {
        let names = |h: SecurityHeaders| -> Vec<String> {
            h.headers().into_iter().map(|(n, _)| n.to_string()).collect()
        };

        let dev = names(SecurityHeaders::new(false));
        assert_eq!(dev.len(), 4);
        assert!(!dev.contains(&STRICT_TRANSPORT_SECURITY.to_string()));

        let prod = names(SecurityHeaders::new(true));
        assert!(prod.contains(&STRICT_TRANSPORT_SECURITY.to_string()));
    }

    #[test]
    fn test_hsts_follows_rust_env() {
        assert!(!SecurityHeaders::for_environment(None).include_hsts);
        assert!(!SecurityHeaders::for_environment(Some("development")).include_hsts);
        assert!(SecurityHeaders::for_environment(Some("Production")).include_hsts);
    }
}
