use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend deployment the client talks to.
///
/// Determines the URL shape and the authentication header. The empty tag is an
/// alias for [`ApiType::OpenAi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiType {
    /// Public OpenAI endpoint, bearer token auth.
    #[default]
    #[serde(alias = "")]
    OpenAi,
    /// Azure OpenAI with an `api-key` header.
    Azure,
    /// Azure OpenAI with an Azure AD bearer token.
    AzureAd,
    /// Cloudflare AI Gateway proxying Azure OpenAI.
    CloudflareAzure,
}

impl ApiType {
    /// Wire tag of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "OPEN_AI",
            Self::Azure => "AZURE",
            Self::AzureAd => "AZURE_AD",
            Self::CloudflareAzure => "CLOUDFLARE_AZURE",
        }
    }

    /// Whether requests are routed through Azure OpenAI (directly or proxied).
    #[must_use]
    pub const fn is_azure(self) -> bool {
        matches!(self, Self::Azure | Self::AzureAd | Self::CloudflareAzure)
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiType {
    type Err = ParseApiTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" | "OPEN_AI" => Ok(Self::OpenAi),
            "AZURE" => Ok(Self::Azure),
            "AZURE_AD" => Ok(Self::AzureAd),
            "CLOUDFLARE_AZURE" => Ok(Self::CloudflareAzure),
            other => Err(ParseApiTypeError {
                value: other.to_string(),
            }),
        }
    }
}

/// Returned when an API type tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseApiTypeError {
    pub value: String,
}

impl fmt::Display for ParseApiTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized API type: {:?}", self.value)
    }
}

impl std::error::Error for ParseApiTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("OPEN_AI".parse::<ApiType>().unwrap(), ApiType::OpenAi);
        assert_eq!("AZURE".parse::<ApiType>().unwrap(), ApiType::Azure);
        assert_eq!("AZURE_AD".parse::<ApiType>().unwrap(), ApiType::AzureAd);
        assert_eq!(
            "CLOUDFLARE_AZURE".parse::<ApiType>().unwrap(),
            ApiType::CloudflareAzure
        );
    }

    #[test]
    fn empty_tag_is_openai() {
        assert_eq!("".parse::<ApiType>().unwrap(), ApiType::OpenAi);
        assert_eq!(ApiType::default(), ApiType::OpenAi);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "azure".parse::<ApiType>().unwrap_err();
        assert_eq!(err.value, "azure");
        assert!(err.to_string().contains("unrecognized API type"));
    }

    #[test]
    fn serde_uses_wire_tags() {
        let value = serde_json::to_value(ApiType::CloudflareAzure).unwrap();
        assert_eq!(value, serde_json::json!("CLOUDFLARE_AZURE"));

        let parsed: ApiType = serde_json::from_str("\"AZURE_AD\"").unwrap();
        assert_eq!(parsed, ApiType::AzureAd);

        let empty: ApiType = serde_json::from_str("\"\"").unwrap();
        assert_eq!(empty, ApiType::OpenAi);

        assert!(serde_json::from_str::<ApiType>("\"BEDROCK\"").is_err());
    }

    #[test]
    fn display_matches_wire_tag() {
        for api_type in [
            ApiType::OpenAi,
            ApiType::Azure,
            ApiType::AzureAd,
            ApiType::CloudflareAzure,
        ] {
            assert_eq!(api_type.to_string(), api_type.as_str());
            assert_eq!(api_type.as_str().parse::<ApiType>().unwrap(), api_type);
        }
    }
}
