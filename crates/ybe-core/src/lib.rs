#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for rich-text conversions.
pub const TRACING_TARGET_TEXT: &str = "ybe_core::text";

/// Tracing target for resource resolution and copying.
pub const TRACING_TARGET_RESOURCE: &str = "ybe_core::resource";

/// Tracing target for semantic linting.
pub const TRACING_TARGET_LINT: &str = "ybe_core::lint";

mod error;

pub mod lint;
pub mod model;
pub mod prelude;
pub mod resource;
pub mod schema;
pub mod text;
pub mod tree;

pub use error::{BoxedError, Error, ErrorKind, Result};
