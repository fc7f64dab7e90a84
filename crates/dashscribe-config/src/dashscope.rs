use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Model used when neither the request nor the configuration names one
pub const FALLBACK_MODEL: &str = "qwen-vl-plus";

/// Region value that selects the international ASR endpoint
pub const INTERNATIONAL_REGION: &str = "International";

const DEFAULT_STORAGE_URL: &str = "https://dashscope.aliyuncs.com";
const DEFAULT_DOMESTIC_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";
const DEFAULT_INTERNATIONAL_ENDPOINT: &str =
    "https://dashscope-intl.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";

/// `DashScope` account, storage and ASR settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashScopeConfig {
    /// API key used for both the upload and ASR calls
    ///
    /// Left optional at load time; requests fail with a 500 until it is set.
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model used when the request omits `model`
    #[serde(default)]
    pub default_model: Option<String>,
    /// Region selector, see [`Region::from_setting`]
    #[serde(default)]
    pub region: Option<String>,
    /// Base URL of the upload-policy API
    #[serde(default = "default_storage_url")]
    pub storage_url: Url,
    /// ASR endpoints per region
    #[serde(default)]
    pub endpoints: AsrEndpoints,
    /// Hours an uploaded object is reported as valid for
    #[serde(default = "default_upload_validity_hours")]
    pub upload_validity_hours: u32,
    /// Timeout applied to every outbound request (e.g. "60s")
    ///
    /// When absent, outbound calls only rely on transport defaults.
    #[serde(default)]
    pub request_timeout: Option<String>,
}

impl Default for DashScopeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: None,
            region: None,
            storage_url: default_storage_url(),
            endpoints: AsrEndpoints::default(),
            upload_validity_hours: default_upload_validity_hours(),
            request_timeout: None,
        }
    }
}

impl DashScopeConfig {
    /// Region resolved from the raw `region` setting
    pub fn region(&self) -> Region {
        Region::from_setting(self.region.as_deref())
    }

    /// Parsed outbound request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `request_timeout` is not a valid duration string
    pub fn request_timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.request_timeout
            .as_deref()
            .map(|raw| {
                duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid dashscope.request_timeout '{raw}': {e}"))
            })
            .transpose()
    }
}

/// ASR endpoint URLs per region
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AsrEndpoints {
    #[serde(default = "default_domestic_endpoint")]
    pub domestic: Url,
    #[serde(default = "default_international_endpoint")]
    pub international: Url,
}

impl Default for AsrEndpoints {
    fn default() -> Self {
        Self {
            domestic: default_domestic_endpoint(),
            international: default_international_endpoint(),
        }
    }
}

impl AsrEndpoints {
    /// Endpoint serving the given region
    pub const fn for_region(&self, region: Region) -> &Url {
        match region {
            Region::Domestic => &self.domestic,
            Region::International => &self.international,
        }
    }
}

/// `DashScope` deployment region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// Mainland deployment, used for every value other than "International"
    #[default]
    Domestic,
    International,
}

impl Region {
    /// Resolve a configured region value
    ///
    /// Only the exact string "International" selects the international
    /// deployment; anything else, including no value, is domestic.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting {
            Some(INTERNATIONAL_REGION) => Self::International,
            _ => Self::Domestic,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "China",
            Self::International => INTERNATIONAL_REGION,
        }
    }
}

fn default_storage_url() -> Url {
    Url::parse(DEFAULT_STORAGE_URL).expect("default storage URL must be valid")
}

fn default_domestic_endpoint() -> Url {
    Url::parse(DEFAULT_DOMESTIC_ENDPOINT).expect("default domestic endpoint must be valid")
}

fn default_international_endpoint() -> Url {
    Url::parse(DEFAULT_INTERNATIONAL_ENDPOINT).expect("default international endpoint must be valid")
}

#[allow(clippy::missing_const_for_fn)]
fn default_upload_validity_hours() -> u32 {
    48
}
