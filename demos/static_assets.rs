//! Serves a couple of fake assets with a one-hour cache policy.
//!
//! Run with `cargo run --example static_assets`, then:
//!
//! ```text
//! curl -i http://127.0.0.1:8080/assets/app.js     # Cache-Control set
//! curl -i http://127.0.0.1:8080/api/ping          # no Cache-Control
//! ```

use std::time::Duration;

use cdnify::cdn::{CacheControl, set_revalidate, set_ttl};
use cdnify::middleware::{Pipeline, Trace};
use cdnify::server::Server;
use cdnify::{Response, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cache = CacheControl::new(false)
        .apply(set_ttl(Duration::from_secs(3600)))
        .apply(set_revalidate());

    let pipeline = Pipeline::new()
        .with(Trace)
        .with(cache)
        .finish(|req| async move {
            match req.path() {
                "/assets/app.js" => Response::new(StatusCode::Ok)
                    .header("Content-Type", "application/javascript")
                    .body("console.log('hello from cdnify');"),
                "/assets/style.css" => Response::new(StatusCode::Ok)
                    .header("Content-Type", "text/css")
                    .body("body { margin: 0; }"),
                "/api/ping" => Response::new(StatusCode::Ok).body("pong"),
                _ => Response::new(StatusCode::NotFound).body("Not Found"),
            }
        });

    let server = Server::bind("127.0.0.1:8080").await?;
    println!("Listening on http://{}", server.local_addr());
    server.run(pipeline).await?;
    Ok(())
}
