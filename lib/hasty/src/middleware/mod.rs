//! Tower middleware for the hyper transport.
//!
//! Layers wrap the transport's boxed service and see every request the
//! client sends, after encoding and before decoding.
//!
//! # Example
//!
//! ```ignore
//! use hasty::HyperTransport;
//! use hasty::middleware::LoggingLayer;
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::new().with_headers())
//!     .build();
//! ```

mod logging;

pub use logging::{Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
