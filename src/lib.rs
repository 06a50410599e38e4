//! # cdnify
//!
//! `Cache-Control` middleware for static asset paths, carried by a minimal
//! async HTTP middleware toolkit.
//!
//! The featured component is [`cdn::CacheControl`]: it marks `GET` responses
//! under a configured path prefix as publicly cacheable for a fixed TTL, and
//! stays out of the way for everything else (non-GET methods, other paths,
//! development mode).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdnify::{Response, StatusCode};
//! use cdnify::cdn::CacheControl;
//! use cdnify::middleware::{Pipeline, Trace};
//! use cdnify::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new()
//!         .with(Trace)
//!         .with(CacheControl::new(false))
//!         .finish(|_req| async {
//!             Response::new(StatusCode::Ok).body("asset bytes")
//!         });
//!
//!     let server = Server::bind("127.0.0.1:8080").await?;
//!     println!("Listening on http://127.0.0.1:8080");
//!     server.run(pipeline).await?;
//!     Ok(())
//! }
//! ```

pub mod cdn;
pub mod http;
pub mod middleware;
pub mod server;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cdn::CacheControl;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use server::{Server, ServerError};
