//! Cache-Control annotation for static asset paths.
//!
//! [`CacheControl`] is middleware that stamps a `Cache-Control` header onto
//! responses for `GET` requests whose path falls under a configured prefix,
//! so browsers and CDNs cache static assets for a fixed TTL. It sits in a
//! [`Pipeline`](crate::middleware::Pipeline) in front of whatever handler
//! actually serves the assets.
//!
//! The policy is deliberately narrow:
//!
//! - Only `GET` requests are annotated. `HEAD`, `POST`, and everything else
//!   pass through untouched — caching directives only make sense for plain
//!   retrieval.
//! - The prefix match is a raw, case-sensitive `starts_with` on the request
//!   path. No trailing-slash normalization, no percent-decoding.
//! - In development mode the header is never set, so local asset edits show
//!   up on refresh instead of being pinned by the browser cache.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use cdnify::cdn::{CacheControl, set_ttl};
//!
//! // Default policy: /assets/ cached for a week.
//! let assets = CacheControl::new(false);
//!
//! // Explicit prefix, one-hour TTL, stricter proxy behavior.
//! let media = CacheControl::with_prefix(false, "/media/")
//!     .apply(set_ttl(Duration::from_secs(3600)))
//!     .apply(cdnify::cdn::set_revalidate());
//! ```

use std::{future::Future, pin::Pin, time::Duration};

use serde::Deserialize;

use crate::{
    Method, Request, Response,
    middleware::{Middleware, Next},
};

/// Path prefix annotated when no explicit prefix is configured.
pub const DEFAULT_PREFIX: &str = "/assets/";

/// Default asset TTL: one week.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A construction-time configuration option for [`CacheControl`].
///
/// Options are applied in the order supplied; a later option targeting the
/// same field wins. Produced by [`set_prefix`], [`set_ttl`], and
/// [`set_revalidate`].
pub type CacheOption = Box<dyn FnOnce(&mut CacheControl) + Send>;

/// Overrides the annotated path prefix.
pub fn set_prefix(prefix: impl Into<String>) -> CacheOption {
    let prefix = prefix.into();
    Box::new(move |m| m.prefix = prefix)
}

/// Overrides the TTL rendered into `max-age`.
///
/// Sub-second precision is truncated; the header always carries whole
/// seconds.
pub fn set_ttl(ttl: Duration) -> CacheOption {
    Box::new(move |m| m.ttl = ttl)
}

/// Switches to the extended header grammar, appending
/// `must-revalidate, proxy-revalidate` after `max-age`.
pub fn set_revalidate() -> CacheOption {
    Box::new(|m| m.revalidate = true)
}

/// Middleware that sets `Cache-Control: public, max-age=<ttl>` on eligible
/// responses.
///
/// Eligibility per request: method is `GET`, development mode is off, and
/// the raw path starts with the configured prefix. The header is *set*
/// (replacing any value a downstream handler produced), never appended.
/// The next handler in the chain runs exactly once in every branch.
///
/// All fields are fixed at construction, so a single instance is safe to
/// share across concurrent requests.
pub struct CacheControl {
    prefix: String,
    ttl: Duration,
    dev: bool,
    revalidate: bool,
}

impl CacheControl {
    /// Creates a policy for the default prefix ([`DEFAULT_PREFIX`]) with the
    /// default TTL ([`DEFAULT_TTL`]).
    ///
    /// `dev` disables header injection entirely when `true`.
    pub fn new(dev: bool) -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            ttl: DEFAULT_TTL,
            dev,
            revalidate: false,
        }
    }

    /// Creates a policy for an explicit prefix, keeping the default TTL.
    pub fn with_prefix(dev: bool, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new(dev)
        }
    }

    /// Creates a policy and applies `opts` in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use cdnify::cdn::{CacheControl, set_prefix, set_ttl};
    ///
    /// let m = CacheControl::with_options(false, vec![
    ///     set_prefix("/static/"),
    ///     set_ttl(Duration::from_secs(86400)),
    /// ]);
    /// ```
    pub fn with_options(dev: bool, opts: impl IntoIterator<Item = CacheOption>) -> Self {
        opts.into_iter()
            .fold(Self::new(dev), |policy, opt| policy.apply(opt))
    }

    /// Applies a single option, consuming and returning the policy.
    #[must_use]
    pub fn apply(mut self, opt: CacheOption) -> Self {
        opt(&mut self);
        self
    }

    /// Renders the header value for this policy.
    fn header_value(&self) -> String {
        let max_age = self.ttl.as_secs();
        if self.revalidate {
            format!("public, max-age={max_age}, must-revalidate, proxy-revalidate")
        } else {
            format!("public, max-age={max_age}")
        }
    }

    /// Returns `true` if `req` should receive the header.
    fn eligible(&self, req: &Request) -> bool {
        req.method() == &Method::Get && !self.dev && req.path().starts_with(&self.prefix)
    }
}

impl Middleware for CacheControl {
    /// Decide eligibility, delegate to `next`, and stamp the header on the
    /// response when the request qualified.
    ///
    /// The decision is taken from the request before delegation; the header
    /// overwrites any `Cache-Control` value set downstream.
    fn handle(&self, req: Request, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        let value = self.eligible(&req).then(|| self.header_value());
        Box::pin(async move {
            let mut response = next.run(req).await;
            if let Some(value) = value {
                response.set_header("Cache-Control", value);
            }
            response
        })
    }
}

/// Deserializable form of the cache policy, for applications that wire
/// middleware from a config file.
///
/// Every field is optional and defaults to the corresponding
/// [`CacheControl`] default:
///
/// ```
/// use cdnify::cdn::{CacheConfig, DEFAULT_PREFIX};
///
/// let config: CacheConfig = serde_json::from_str(r#"{"ttl_secs": 3600}"#).unwrap();
/// assert_eq!(config.prefix, DEFAULT_PREFIX);
/// assert_eq!(config.ttl_secs, 3600);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Path prefix to annotate.
    pub prefix: String,
    /// TTL in whole seconds.
    pub ttl_secs: u64,
    /// Development mode: disable annotation entirely.
    pub dev: bool,
    /// Use the extended `must-revalidate, proxy-revalidate` grammar.
    pub revalidate: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            ttl_secs: DEFAULT_TTL.as_secs(),
            dev: false,
            revalidate: false,
        }
    }
}

impl From<CacheConfig> for CacheControl {
    fn from(config: CacheConfig) -> Self {
        Self {
            prefix: config.prefix,
            ttl: Duration::from_secs(config.ttl_secs),
            dev: config.dev,
            revalidate: config.revalidate,
        }
    }
}
