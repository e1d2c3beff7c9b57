//! Core client crate for the Rust OpenAI SDK.
//!
//! Supports the public OpenAI API, Azure OpenAI (API key or Azure AD token)
//! and Azure OpenAI behind Cloudflare AI Gateway.

pub mod auth;
pub mod client;
pub mod deployment;
pub mod endpoint;
pub mod error;

#[cfg(test)]
mod test_support;

pub use rust_openai_types as types;

pub use auth::{AuthHeader, AZURE_API_KEY_HEADER, ORGANIZATION_HEADER};
pub use client::{Client, ClientBuilder, ClientConfig, HttpOptions};
pub use deployment::DeploymentMapper;
pub use endpoint::{AZURE_API_VERSION, OPENAI_API_URL_V1};
pub use error::{Error, Result};
pub use types::ApiType;
