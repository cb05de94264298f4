//! HTTP/1.1 protocol engine for static file serving.
//!
//! # Architecture
//!
//! - **`line`**: reads CRLF-terminated lines from a buffered stream
//! - **`parser`**: builds a [`request::Request`] from those lines
//! - **`request`**: request representation and header canonicalization
//! - **`vhost`**: maps host and target to a file under a document root
//! - **`response`**: response representation and the 200/400/404 constructors
//! - **`writer`**: serializes a response and streams the file body
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← idle deadline armed, read one request
//!        └──────┬───────────┘
//!               │ Request parsed      (EOF / timeout → Closing, no response)
//!               ▼                     (malformed → 400, then Closing)
//!        ┌──────────────────┐
//!        │     Serving      │ ← resolve, build 200/404, write it
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ keep-alive → AwaitingRequest
//!               └─ Connection: close / write error → Closing
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vhttpd::http::connection::{Connection, DEFAULT_IDLE_TIMEOUT};
//! use vhttpd::http::vhost::VirtualHosts;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let hosts = Arc::new(VirtualHosts::new(roots));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let hosts = hosts.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, hosts, DEFAULT_IDLE_TIMEOUT);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod line;
pub mod request;
pub mod response;
pub mod parser;
pub mod vhost;
pub mod connection;
pub mod writer;
