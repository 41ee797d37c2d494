//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, shared middleware stack)
//!     → observability::tracing (TraceContext established)
//!     → request.rs (timer started)
//!     → service handler (gateway or backend)
//!     → request.rs (RequestRecord → metrics + log)
//!     → response.rs bodies serialized back to the client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::RequestRecord;
pub use server::HttpServer;
