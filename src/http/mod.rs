//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Client
//!     → gateway.rs  (POST /cep: validate, forward)
//!     → resolver.rs (GET /temperatura/{cep}: directory → weather → convert)
//!     → gateway.rs  (relay status + body verbatim)
//!     → Client
//! ```
//!
//! server.rs builds either router and owns the shared middleware;
//! request.rs assigns and propagates request ids.

pub mod gateway;
pub mod request;
pub mod resolver;
pub mod server;

pub use request::X_REQUEST_ID;
pub use resolver::build_resolver;
pub use server::{HttpServer, ServerError};
