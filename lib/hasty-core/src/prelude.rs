//! Prelude module for convenient imports.
//!
//! ```ignore
//! use hasty_core::prelude::*;
//! ```

pub use crate::{
    DefaultErrorHandler, Error, ErrorHandler, FormEncoder, Header, JsonDecoder, JsonEncoder,
    Method, Request, RequestEncoder, Response, ResponseDecoder, Result, TextDecoder, Transport,
};
