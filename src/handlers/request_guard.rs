// Request guard middleware for djgoprod
//
// Enforces the resolved ALLOWED_HOSTS list on every request, and CSRF origin
// and token checks on unsafe methods (POST, PUT, PATCH, DELETE).

use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, ResponseError,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::{debug, warn};

use crate::config::ResolvedConfiguration;
use crate::error::RequestRejected;

/// Cookie carrying the CSRF token
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the client echoes the CSRF token in
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Hosts and origins a request is checked against
#[derive(Debug, Clone)]
pub struct GuardPolicy {
    allowed_hosts: Vec<String>,
    trusted_origins: Vec<String>,
}

impl GuardPolicy {
    pub fn new(allowed_hosts: &[String], trusted_origins: &[String]) -> Self {
        Self {
            allowed_hosts: allowed_hosts.iter().map(|h| h.to_lowercase()).collect(),
            trusted_origins: trusted_origins.iter().map(|o| o.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &ResolvedConfiguration) -> Self {
        Self::new(&config.allowed_hosts, &config.csrf_trusted_origins)
    }

    /// Whether the (port-less) host matches an allowed host pattern
    ///
    /// `*` matches anything, `.example.com` matches the domain and its
    /// subdomains, anything else must match exactly.
    pub fn host_allowed(&self, host: &str) -> bool {
        let host = strip_port(host).trim_end_matches('.').to_lowercase();
        if host.is_empty() {
            return false;
        }
        self.allowed_hosts.iter().any(|pattern| {
            if pattern == "*" {
                return true;
            }
            match pattern.strip_prefix('.') {
                Some(domain) => host == domain || host.ends_with(pattern.as_str()),
                None => host == *pattern,
            }
        })
    }

    /// Whether an `Origin` value matches a trusted origin
    ///
    /// A trusted origin host of `*` accepts any host with that scheme and
    /// `*.example.com` accepts subdomains.
    pub fn origin_trusted(&self, origin: &str) -> bool {
        let origin = origin.to_lowercase();
        let Some((scheme, host)) = origin.split_once("://") else {
            return false;
        };
        self.trusted_origins.iter().any(|trusted| {
            let Some((trusted_scheme, trusted_host)) = trusted.split_once("://") else {
                return false;
            };
            if trusted_scheme != scheme {
                return false;
            }
            if trusted_host == "*" {
                return true;
            }
            match trusted_host.strip_prefix('*') {
                Some(suffix) if suffix.starts_with('.') => host.ends_with(suffix),
                _ => trusted_host == host,
            }
        })
    }

    /// Run every check that applies to the request
    fn check(&self, req: &ServiceRequest) -> Result<(), RequestRejected> {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(String::from)
            .or_else(|| req.uri().authority().map(|a| a.to_string()))
            .unwrap_or_default();
        if !self.host_allowed(&host) {
            return Err(RequestRejected::DisallowedHost(host));
        }

        if !is_unsafe_method(req.method()) {
            return Ok(());
        }

        if let Some(origin) = req.headers().get(header::ORIGIN) {
            let origin = origin.to_str().unwrap_or_default();
            if !self.origin_trusted(origin) {
                return Err(RequestRejected::UntrustedOrigin(origin.to_string()));
            }
        }

        let cookie = req
            .cookie(CSRF_COOKIE)
            .ok_or(RequestRejected::CsrfCookieMissing)?;
        let token = req
            .headers()
            .get(CSRF_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or(RequestRejected::CsrfTokenMismatch)?;
        if token.is_empty() || token != cookie.value() {
            return Err(RequestRejected::CsrfTokenMismatch);
        }
        Ok(())
    }
}

fn is_unsafe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Drop a trailing `:port`, keeping bracketed IPv6 literals intact
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Middleware factory for the request guard
pub struct RequestGuard {
    policy: Arc<GuardPolicy>,
}

impl RequestGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        debug!(
            "Request guard enabled for {} host pattern(s)",
            self.policy.allowed_hosts.len()
        );
        ok(RequestGuardMiddleware {
            service,
            policy: Arc::clone(&self.policy),
        })
    }
}

/// Request guard middleware implementation
pub struct RequestGuardMiddleware<S> {
    service: S,
    policy: Arc<GuardPolicy>,
}

impl<S, B> Service<ServiceRequest> for RequestGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(rejection) = self.policy.check(&req) {
            warn!("Rejected {} {}: {}", req.method(), req.path(), rejection);
            let response = rejection.error_response();
            let (http_req, _) = req.into_parts();
            return Box::pin(async move {
                Ok(ServiceResponse::new(http_req, response).map_into_right_body())
            });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
