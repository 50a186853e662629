use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Identity of the calling application, sent with every request.
#[skip_serializing_none]
#[derive(PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApptimizeConfig {
    /// API token from the Apptimize dashboard (required).
    pub api_token: String,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
}

impl ApptimizeConfig {
    pub fn new(api_token: String) -> Self {
        Self {
            api_token,
            app_name: None,
            app_version: None,
        }
    }
}

impl fmt::Debug for ApptimizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApptimizeConfig")
            .field("api_token", &"<redacted>")
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .finish()
    }
}

/// Options to use when creating the client, they will override default values, if they exist.
///
/// The default value for api_url is https://api.apptimize.com
/// Without a timeout the transport default applies.
#[derive(Debug, Clone)]
pub struct ApptimizeOptions {
    pub api_url: Option<String>,
    pub timeout: Option<Duration>,
    /// Log request failures through `tracing` before returning them.
    pub debug: bool,
}

impl ApptimizeOptions {
    pub fn default() -> Self {
        Self {
            api_url: None,
            timeout: None,
            debug: false,
        }
    }

    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CodeBlockResponse {
    #[serde(default)]
    pub code_block_variant: Option<String>,
}
