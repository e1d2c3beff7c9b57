use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use rust_openai_types::ApiType;

use crate::client::ClientConfig;
use crate::error::{Error, Result};

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const AZURE_API_KEY_HEADER: &str = "api-key";
pub const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

/// 鉴权头（名称 + 值）。
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: &'static str,
    pub value: String,
}

impl AuthHeader {
    fn bearer(token: &str) -> Self {
        Self {
            name: AUTHORIZATION_HEADER,
            value: format!("Bearer {token}"),
        }
    }

    fn api_key(key: &str) -> Self {
        Self {
            name: AZURE_API_KEY_HEADER,
            value: key.to_string(),
        }
    }

    /// 转换为敏感的 `HeaderValue`。
    ///
    /// # Errors
    /// 当凭据包含非法字符时返回错误。
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value).map_err(|_| Error::InvalidConfig {
            message: "Invalid API key value".into(),
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// 根据后端选择鉴权头。
pub(crate) fn auth_header(config: &ClientConfig) -> AuthHeader {
    match config.api_type {
        ApiType::OpenAi | ApiType::AzureAd => AuthHeader::bearer(&config.auth_token),
        // Cloudflare AI Gateway forwards to Azure OpenAI key auth.
        ApiType::Azure | ApiType::CloudflareAzure => AuthHeader::api_key(&config.auth_token),
    }
}

/// 组织头，仅 OpenAI 后端使用。
pub(crate) fn organization_header(config: &ClientConfig) -> Option<(&'static str, &str)> {
    match config.api_type {
        ApiType::OpenAi => config
            .org_id
            .as_deref()
            .filter(|org| !org.is_empty())
            .map(|org| (ORGANIZATION_HEADER, org)),
        ApiType::Azure | ApiType::AzureAd | ApiType::CloudflareAzure => None,
    }
}

/// 构建请求所需的全部鉴权相关头。
pub(crate) fn auth_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let auth = auth_header(config);
    headers.insert(header_name(auth.name)?, auth.header_value()?);
    if let Some((name, org)) = organization_header(config) {
        let value = HeaderValue::from_str(org).map_err(|_| Error::InvalidConfig {
            message: "Invalid organization id".into(),
        })?;
        headers.insert(header_name(name)?, value);
    }
    Ok(headers)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidConfig {
        message: format!("Invalid header name: {name}"),
    })
}
