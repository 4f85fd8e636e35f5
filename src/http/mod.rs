//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → load_balancer::Dispatcher (pick backend, forward)
//!         → request.rs (rewrite target onto the backend base URI)
//!         → headers.rs (hop-by-hop removal, X-Forwarded-*)
//!     → response.rs (synthesized 502/503/504 when no backend answered)
//!     → Send to client
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{router, HttpServer};
