//! Request URL composition for each backend.

use rust_openai_types::ApiType;

use crate::client::ClientConfig;
use crate::error::{Error, Result};

/// OpenAI 公共 API 根地址。
pub const OPENAI_API_URL_V1: &str = "https://api.openai.com/v1";
/// Azure OpenAI 默认 API 版本。
pub const AZURE_API_VERSION: &str = "2023-05-15";
pub const AZURE_API_PREFIX: &str = "openai";
pub const AZURE_DEPLOYMENTS_PREFIX: &str = "deployments";

const API_VERSION_PARAM: &str = "api-version";

// Azure resources that live on the account, not under a deployment.
const AZURE_ACCOUNT_SCOPED_PATHS: [&str; 4] = ["/models", "/assistants", "/threads", "/files"];

/// 计算完整请求 URL。
///
/// `suffix` 必须以 `/` 开头，可以带 `?query`。Azure 系后端会把 `api-version`
/// 插入为第一个查询参数，原查询串按原样保留在其后。
///
/// # Errors
/// 当 `suffix` 不以 `/` 开头，或 Azure 部署路径缺少模型名时返回错误。
pub(crate) fn full_url(config: &ClientConfig, suffix: &str, model: Option<&str>) -> Result<String> {
    if !suffix.starts_with('/') {
        return Err(Error::MalformedSuffix {
            suffix: suffix.to_string(),
        });
    }
    let base = strip_trailing_slash(&config.base_url);
    let (path, query) = split_query(suffix);

    let url = match config.api_type {
        ApiType::OpenAi => format!("{base}{suffix}"),
        ApiType::Azure | ApiType::AzureAd => {
            let scope = if is_account_scoped(path) {
                AZURE_API_PREFIX.to_string()
            } else {
                let model = model
                    .filter(|model| !model.is_empty())
                    .ok_or_else(|| Error::MissingModel {
                        suffix: suffix.to_string(),
                    })?;
                let deployment = config.deployments.deployment_for(model);
                format!("{AZURE_API_PREFIX}/{AZURE_DEPLOYMENTS_PREFIX}/{deployment}")
            };
            with_api_version(format!("{base}/{scope}{path}"), &config.api_version, query)
        }
        ApiType::CloudflareAzure => {
            with_api_version(format!("{base}{path}"), &config.api_version, query)
        }
    };
    Ok(url)
}

pub(crate) fn strip_trailing_slash(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

fn split_query(suffix: &str) -> (&str, Option<&str>) {
    match suffix.split_once('?') {
        Some((path, query)) if !query.is_empty() => (path, Some(query)),
        Some((path, _)) => (path, None),
        None => (suffix, None),
    }
}

fn is_account_scoped(path: &str) -> bool {
    AZURE_ACCOUNT_SCOPED_PATHS.iter().any(|scope| {
        path.strip_prefix(scope)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn with_api_version(mut url: String, api_version: &str, query: Option<&str>) -> String {
    url.push('?');
    url.push_str(API_VERSION_PARAM);
    url.push('=');
    url.push_str(api_version);
    if let Some(query) = query {
        url.push('&');
        url.push_str(query);
    }
    url
}

/// api-version 只允许 URL 安全字符，拼接时无需转义。
pub(crate) fn is_valid_api_version(api_version: &str) -> bool {
    !api_version.is_empty()
        && api_version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}
