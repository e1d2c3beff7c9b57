//! Client configuration and transport layer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Proxy};
use rust_openai_types::ApiType;

use crate::auth::{self, AuthHeader};
use crate::deployment::DeploymentMapper;
use crate::endpoint::{self, AZURE_API_VERSION, OPENAI_API_URL_V1};
use crate::error::{Error, Result};

const JSON_CONTENT_TYPE: &str = "application/json";

/// OpenAI 客户端。
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub http: HttpClient,
    pub config: ClientConfig,
    pub default_headers: HeaderMap,
}

/// 客户端配置。
///
/// 构造客户端后不可变。
#[derive(Clone)]
pub struct ClientConfig {
    /// 后端选择。
    pub api_type: ApiType,
    /// API 根地址（末尾的一个 `/` 会在拼接时去掉）。
    pub base_url: String,
    /// API Key 或 Bearer token。
    pub auth_token: String,
    /// OpenAI 组织 ID。
    pub org_id: Option<String>,
    /// Azure 系后端的 `api-version`。
    pub api_version: String,
    /// Azure 部署名映射。
    pub deployments: DeploymentMapper,
    /// HTTP 配置。
    pub http_options: HttpOptions,
}

/// HTTP 配置。
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// OpenAI 公共端点配置。
    #[must_use]
    pub fn openai(auth_token: impl Into<String>) -> Self {
        Self {
            api_type: ApiType::OpenAi,
            base_url: OPENAI_API_URL_V1.to_string(),
            auth_token: auth_token.into(),
            org_id: None,
            api_version: String::new(),
            deployments: DeploymentMapper::new(),
            http_options: HttpOptions::default(),
        }
    }

    /// Azure OpenAI（`api-key` 鉴权）配置。
    #[must_use]
    pub fn azure(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::azure_variant(ApiType::Azure, api_key.into(), base_url.into())
    }

    /// Azure OpenAI（Azure AD token 鉴权）配置。
    #[must_use]
    pub fn azure_ad(auth_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::azure_variant(ApiType::AzureAd, auth_token.into(), base_url.into())
    }

    /// Cloudflare AI Gateway（代理 Azure OpenAI）配置。
    ///
    /// `base_url` 形如 `https://gateway.ai.cloudflare.com/v1/{account}/{gateway}/azure-openai/{resource}/{deployment}`。
    #[must_use]
    pub fn cloudflare_azure(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::azure_variant(ApiType::CloudflareAzure, api_key.into(), base_url.into())
    }

    fn azure_variant(api_type: ApiType, auth_token: String, base_url: String) -> Self {
        Self {
            api_type,
            base_url,
            auth_token,
            org_id: None,
            api_version: AZURE_API_VERSION.to_string(),
            deployments: DeploymentMapper::new(),
            http_options: HttpOptions::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.auth_token.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "API key or token required".into(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: format!("Base URL required for {}", self.api_type),
            });
        }
        reqwest::Url::parse(self.base_url.trim()).map_err(|err| Error::InvalidConfig {
            message: format!("Invalid base URL {}: {err}", self.base_url),
        })?;
        if self.api_type.is_azure() && !endpoint::is_valid_api_version(&self.api_version) {
            return Err(Error::InvalidConfig {
                message: format!("Invalid API version: {:?}", self.api_version),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_type", &self.api_type)
            .field("base_url", &self.base_url)
            .field("auth_token", &"<redacted>")
            .field("org_id", &self.org_id)
            .field("api_version", &self.api_version)
            .field("deployments", &self.deployments)
            .field("http_options", &self.http_options)
            .finish()
    }
}

impl Client {
    /// 创建新客户端（OpenAI）。
    ///
    /// # Errors
    /// 当配置无效或构建客户端失败时返回错误。
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::openai(api_key))
    }

    /// 创建 Azure OpenAI 客户端。
    ///
    /// # Errors
    /// 当配置无效或构建客户端失败时返回错误。
    pub fn new_azure(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::azure(api_key, base_url))
    }

    /// 使用完整配置创建客户端。
    ///
    /// # Errors
    /// 当配置无效、默认头非法或构建 HTTP 客户端失败时返回错误。
    pub fn with_config(mut config: ClientConfig) -> Result<Self> {
        config.base_url = config.base_url.trim().to_string();
        config.validate()?;
        let default_headers = build_headers(&config)?;
        let http = build_http_client(&config.http_options)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            api_type = %config.api_type,
            base_url = %config.base_url,
            "openai client constructed"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                default_headers,
            }),
        })
    }

    /// 从环境变量创建客户端。
    ///
    /// 读取 `OPENAI_API_KEY`（必需）、`OPENAI_API_TYPE`、`OPENAI_BASE_URL`、
    /// `OPENAI_ORG_ID` 与 `OPENAI_API_VERSION`，空值会被忽略。
    ///
    /// # Errors
    /// 当环境变量缺失、`OPENAI_API_TYPE` 无法识别或构建客户端失败时返回错误。
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| Error::InvalidConfig {
            message: "OPENAI_API_KEY not found".into(),
        })?;
        let mut builder = Self::builder().api_key(api_key);
        if let Some(api_type) = non_blank_env("OPENAI_API_TYPE") {
            builder = builder.api_type(api_type.parse::<ApiType>()?);
        }
        if let Some(base_url) = non_blank_env("OPENAI_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(org_id) = non_blank_env("OPENAI_ORG_ID") {
            builder = builder.org_id(org_id);
        }
        if let Some(api_version) = non_blank_env("OPENAI_API_VERSION") {
            builder = builder.api_version(api_version);
        }
        builder.build()
    }

    /// 创建 Builder。
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// 当前配置。
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// 计算完整请求 URL。
    ///
    /// # Errors
    /// 当路径不以 `/` 开头，或 Azure 部署路径缺少模型名时返回错误。
    pub fn full_url(&self, suffix: &str, model: Option<&str>) -> Result<String> {
        endpoint::full_url(&self.inner.config, suffix, model)
    }

    /// 当前后端使用的鉴权头。
    #[must_use]
    pub fn auth_header(&self) -> AuthHeader {
        auth::auth_header(&self.inner.config)
    }

    /// 构建请求：URL、鉴权头、组织头、`Accept`/`Content-Type` 以及单次请求选项。
    ///
    /// # Errors
    /// 当 URL 无法构建或请求头非法时返回错误。
    pub fn new_request(
        &self,
        method: Method,
        suffix: &str,
        model: Option<&str>,
        http_options: Option<&rust_openai_types::http::HttpOptions>,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.full_url(suffix, model)?;

        let mut headers = self.inner.default_headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        let content_type = http_options.and_then(|opts| opts.content_type.as_deref());
        let has_body = http_options.is_some_and(|opts| opts.body.is_some());
        if let Some(content_type) = content_type {
            let value = HeaderValue::from_str(content_type).map_err(|_| Error::InvalidConfig {
                message: format!("Invalid content type: {content_type}"),
            })?;
            headers.insert(CONTENT_TYPE, value);
        } else if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        if let Some(extra) = http_options.and_then(|opts| opts.headers.as_ref()) {
            insert_headers(&mut headers, extra)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %method,
            url = %url,
            auth_header = self.auth_header().name,
            "building request"
        );

        let mut request = self.inner.http.request(method, url).headers(headers);
        if let Some(options) = http_options {
            if let Some(timeout) = options.timeout {
                request = request.timeout(Duration::from_millis(timeout));
            }
            if let Some(body) = &options.body {
                request = request.json(body);
            }
        }
        Ok(request)
    }

    /// 发送请求，非 2xx 状态映射为 [`Error::ApiError`]。
    ///
    /// # Errors
    /// 当请求构建、网络请求失败或服务端返回错误状态时返回错误。
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        self.inner.send(request).await
    }
}

impl ClientInner {
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = request.build()?;
        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(status = status.as_u16(), "request failed");
            return Err(Error::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response)
    }
}

/// 客户端 Builder。
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    api_type: Option<ApiType>,
    base_url: Option<String>,
    org_id: Option<String>,
    api_version: Option<String>,
    deployments: DeploymentMapper,
    http_options: HttpOptions,
}

impl ClientBuilder {
    /// 设置 API Key 或 token。
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// 设置后端。
    #[must_use]
    pub const fn api_type(mut self, api_type: ApiType) -> Self {
        self.api_type = Some(api_type);
        self
    }

    /// 设置自定义基础 URL。
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 设置 OpenAI 组织 ID。
    #[must_use]
    pub fn org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// 设置 API 版本（Azure 系后端）。
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// 增加模型到 Azure 部署名的映射。
    #[must_use]
    pub fn deployment(mut self, model: impl Into<String>, deployment: impl Into<String>) -> Self {
        self.deployments.insert(model, deployment);
        self
    }

    /// 设置请求超时（秒）。
    #[must_use]
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.http_options.timeout = Some(secs);
        self
    }

    /// 设置代理。
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.http_options.proxy = Some(url.into());
        self
    }

    /// 增加默认 HTTP 头。
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_options.headers.insert(key.into(), value.into());
        self
    }

    /// 构建客户端。
    ///
    /// # Errors
    /// 当配置不完整、参数无效或构建 HTTP 客户端失败时返回错误。
    pub fn build(self) -> Result<Client> {
        let Self {
            api_key,
            api_type,
            base_url,
            org_id,
            api_version,
            deployments,
            http_options,
        } = self;

        let api_type = api_type.unwrap_or_default();
        let auth_token = api_key.ok_or_else(|| Error::InvalidConfig {
            message: format!("API key required for {api_type}"),
        })?;
        let base_url = match (base_url, api_type) {
            (Some(base_url), _) => base_url,
            (None, ApiType::OpenAi) => OPENAI_API_URL_V1.to_string(),
            (None, ApiType::Azure | ApiType::AzureAd | ApiType::CloudflareAzure) => {
                return Err(Error::InvalidConfig {
                    message: format!("Base URL required for {api_type}"),
                });
            }
        };
        let api_version = api_version.unwrap_or_else(|| match api_type {
            ApiType::OpenAi => String::new(),
            ApiType::Azure | ApiType::AzureAd | ApiType::CloudflareAzure => {
                AZURE_API_VERSION.to_string()
            }
        });

        Client::with_config(ClientConfig {
            api_type,
            base_url,
            auth_token,
            org_id,
            api_version,
            deployments,
            http_options,
        })
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn build_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    insert_headers(&mut headers, &config.http_options.headers)?;

    for (name, value) in auth::auth_headers(config)? {
        let Some(name) = name else { continue };
        if !headers.contains_key(&name) {
            headers.insert(name, value);
        }
    }
    Ok(headers)
}

fn insert_headers(headers: &mut HeaderMap, extra: &HashMap<String, String>) -> Result<()> {
    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidConfig {
            message: format!("Invalid header name: {key}"),
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
            message: format!("Invalid header value for {key}"),
        })?;
        headers.insert(name, value);
    }
    Ok(())
}

fn build_http_client(http_options: &HttpOptions) -> Result<HttpClient> {
    let mut http_builder = HttpClient::builder();
    if let Some(timeout) = http_options.timeout {
        http_builder = http_builder.timeout(Duration::from_secs(timeout));
    }

    if let Some(proxy_url) = &http_options.proxy {
        let proxy = Proxy::all(proxy_url).map_err(|e| Error::InvalidConfig {
            message: format!("Invalid proxy: {e}"),
        })?;
        http_builder = http_builder.proxy(proxy);
    }

    Ok(http_builder.build()?)
}
