//! Shared types for the Rust OpenAI SDK.

pub mod enums;
pub mod http;

pub use enums::{ApiType, ParseApiTypeError};
