//! Capabilities installed into the application root.
//!
//! # Data Flow
//! ```text
//! bootstrap
//!     → registry.rs (typed slots on the application root)
//!     → transport.rs (WebSocket client, installed when enabled)
//!     → cipher.rs (encrypt/decrypt, supplied by the embedder)
//!     → anything else the embedder installs (state store, ...)
//! ```
//!
//! # Design Decisions
//! - No ambient globals: capabilities hang off the `Application` value
//! - The resolver consumes none of these; they only share its lifetime

pub mod cipher;
pub mod registry;
pub mod transport;

pub use cipher::{Cipher, CipherError};
pub use registry::Capabilities;
pub use transport::{Transport, TransportError, WsTransport};
