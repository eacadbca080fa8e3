//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use hasty::prelude::*;
//! ```

pub use std::collections::HashMap;

pub use crate::{
    Client, Config, Error, ErrorHandler, FormEncoder, Header, HyperTransport, JsonDecoder,
    JsonEncoder, Method, RequestEncoder, ResponseDecoder, Result, StatusCode,
    StatusErrorHandler, TextDecoder, Transport,
};
pub use serde::{Deserialize, Serialize};
