//! Middleware chain — ordered, composable request/response decoration.
//!
//! A [`Pipeline`] is an ordered stack of middleware terminated by a leaf
//! handler. Each layer receives the [`Request`] and a [`Next`] cursor; it may
//! pass through, short-circuit with its own [`Response`], or delegate and
//! decorate the response on the way back out (which is what
//! [`CacheControl`](crate::cdn::CacheControl) does).
//!
//! ## Core types
//!
//! - [`Middleware`] — trait implemented by all middleware.
//! - [`Next`] — cursor into the remaining chain; consumed by [`Next::run`].
//! - [`Handler`] — type-erased, cheaply-cloneable chain entry.
//! - [`Pipeline`] — stack plus leaf handler, the unit the server dispatches to.
//! - [`Trace`] — built-in request/response logger.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::time::Instant;

use crate::{Request, Response, StatusCode};

/// A type-erased, reference-counted chain entry.
///
/// Every element of a [`Pipeline`] is stored as a `Handler`; the [`Arc`]
/// makes entries cheap to clone as [`Next`] advances through the chain.
pub type Handler = Arc<
    dyn Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static,
>;

/// The trait implemented by all cdnify middleware.
///
/// Implementations must be `Send + Sync`: a single middleware instance is
/// shared across every concurrent request the server dispatches. `handle`
/// returns a pinned `Send` future so it can be awaited on a multi-threaded
/// runtime.
///
/// # Examples
///
/// ```
/// use std::pin::Pin;
/// use cdnify::{Request, Response, middleware::{Middleware, Next}};
///
/// struct PassThrough;
///
/// impl Middleware for PassThrough {
///     fn handle(
///         &self,
///         req: Request,
///         next: Next,
///     ) -> Pin<Box<dyn std::future::Future<Output = Response> + Send>> {
///         Box::pin(async move { next.run(req).await })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync {
    /// Handle the request, delegating to `next` as appropriate.
    fn handle(&self, req: Request, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

/// Converts a [`Middleware`] into a [`Handler`] chain entry.
pub fn from_middleware<M>(middleware: Arc<M>) -> Handler
where
    M: Middleware + 'static,
{
    Arc::new(move |req: Request, next: Next| middleware.handle(req, next))
}

/// A cursor into the remaining chain for a single request.
///
/// `Next` is consumed by [`run`](Self::run), so a middleware cannot invoke
/// the rest of the chain more than once per request.
pub struct Next {
    stack: Vec<Handler>,
    // Position of the entry `run` will invoke.
    index: usize,
}

impl Next {
    /// Creates a cursor positioned at the start of `stack`.
    pub fn new(stack: Vec<Handler>) -> Self {
        Self { stack, index: 0 }
    }

    /// Invokes the next entry in the chain and returns its response.
    ///
    /// If the chain is exhausted without any entry producing a response
    /// (a pipeline built without a leaf handler), a `500` fallback is
    /// returned rather than panicking.
    pub async fn run(mut self, req: Request) -> Response {
        if self.index < self.stack.len() {
            let handler = self.stack[self.index].clone();
            self.index += 1;
            handler(req, self).await
        } else {
            Response::new(StatusCode::InternalServerError).body("no handler produced a response")
        }
    }
}

/// An ordered middleware stack terminated by a leaf handler.
///
/// Middleware run in registration order on the way in and reverse order on
/// the way back out. The pipeline is immutable once built and cheap to
/// clone (entries are `Arc`s), so one instance serves all connections.
///
/// # Examples
///
/// ```
/// use cdnify::{Response, StatusCode, cdn::CacheControl, middleware::{Pipeline, Trace}};
///
/// let pipeline = Pipeline::new()
///     .with(Trace)
///     .with(CacheControl::new(false))
///     .finish(|req| async move {
///         Response::new(StatusCode::Ok).body(format!("asset at {}", req.path()))
///     });
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    stack: Vec<Handler>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware to the stack.
    #[must_use]
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.stack.push(from_middleware(Arc::new(middleware)));
        self
    }

    /// Appends a pre-erased [`Handler`] to the stack.
    #[must_use]
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.stack.push(handler);
        self
    }

    /// Terminates the pipeline with a leaf handler.
    ///
    /// The leaf receives only the request; any entries registered after it
    /// would be unreachable, so call this last.
    #[must_use]
    pub fn finish<H, F>(mut self, handler: H) -> Self
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
    {
        self.stack
            .push(Arc::new(move |req: Request, _next: Next| {
                Box::pin(handler(req))
            }));
        self
    }

    /// Runs a request through the full chain.
    pub async fn dispatch(&self, req: Request) -> Response {
        Next::new(self.stack.clone()).run(req).await
    }
}

/// Built-in middleware that logs one line per request: method, path,
/// response status, and latency.
///
/// Emits via `tracing::info!` after the downstream handler completes; never
/// short-circuits and never modifies the response.
pub struct Trace;

impl Middleware for Trace {
    fn handle(&self, req: Request, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = req.method().as_str().to_owned();
            let path = req.path().to_owned();

            let response = next.run(req).await;

            tracing::info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed = ?start.elapsed(),
                "request"
            );
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    /// Middleware that tags the response with its label on the way out.
    struct Tag(&'static str);

    impl Middleware for Tag {
        fn handle(
            &self,
            req: Request,
            next: Next,
        ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
            let label = self.0;
            Box::pin(async move {
                let mut resp = next.run(req).await;
                resp.append_header("X-Tag", label);
                resp
            })
        }
    }

    #[tokio::test]
    async fn middleware_runs_in_order() {
        let pipeline = Pipeline::new()
            .with(Tag("outer"))
            .with(Tag("inner"))
            .finish(|_req| async { Response::new(StatusCode::Ok) });

        let resp = pipeline.dispatch(Request::get("/")).await;
        // Decoration happens on the way back out: inner first, then outer.
        let tags: Vec<_> = resp.headers().get_all("x-tag").collect();
        assert_eq!(tags, vec!["inner", "outer"]);
    }

    #[tokio::test]
    async fn leaf_sees_the_request() {
        let pipeline = Pipeline::new()
            .finish(|req| async move { Response::new(StatusCode::Ok).body(req.path().to_owned()) });
        let resp = pipeline.dispatch(Request::get("/hello")).await;
        assert_eq!(resp.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn exhausted_chain_falls_back_to_500() {
        let pipeline = Pipeline::new().with(Tag("only"));
        let resp = pipeline.dispatch(Request::get("/")).await;
        assert_eq!(resp.status(), StatusCode::InternalServerError);
    }

    #[tokio::test]
    async fn short_circuit_skips_downstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let leaf_hits = Arc::clone(&hits);

        let deny: Handler =
            Arc::new(|_req, _next| Box::pin(async { Response::new(StatusCode::NotFound) }));

        let pipeline = Pipeline::new().with_handler(deny).finish(move |_req| {
            let hits = Arc::clone(&leaf_hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Response::new(StatusCode::Ok)
            }
        });

        let resp = pipeline.dispatch(Request::get("/")).await;
        assert_eq!(resp.status(), StatusCode::NotFound);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pipeline_is_reusable_across_dispatches() {
        let count = Arc::new(AtomicUsize::new(0));
        let leaf_count = Arc::clone(&count);
        let pipeline = Pipeline::new().finish(move |_req| {
            let count = Arc::clone(&leaf_count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Response::new(StatusCode::Ok)
            }
        });

        for _ in 0..3 {
            pipeline.dispatch(Request::get("/")).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
