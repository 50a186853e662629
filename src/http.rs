use std::time::Duration;

use reqwest::{
    header,
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, ClientBuilder, Method, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{event, Level};

use crate::{
    error::{Error, Result},
    models::{ApptimizeConfig, ApptimizeOptions, CodeBlockResponse},
};

const API_URL: &str = "https://api.apptimize.com";
const RUST_SDK_OS: &str = "rust";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

const API_TOKEN_HEADER: &str = "apptimizeapitoken";
const APP_NAME_HEADER: &str = "apptimizeapplicationname";
const APP_VERSION_HEADER: &str = "apptimizeapplicationversion";
const OS_HEADER: &str = "apptimizeoperatingsystem";
const OS_VERSION_HEADER: &str = "apptimizeoperatingsystemversion";

/// Version string reported in the operating system version header.
pub(crate) fn os_version() -> String {
    format!(
        "{} ({}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Config(format!("{} is not a valid header value: {}", name, e)))
}

/// Headers attached to every request, installed once as the client defaults.
pub(crate) fn identity_headers(config: &ApptimizeConfig) -> Result<HeaderMap> {
    let mut token = header_value("api token", &config.api_token)?;
    token.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(HeaderName::from_static(API_TOKEN_HEADER), token);
    headers.insert(
        HeaderName::from_static(APP_NAME_HEADER),
        header_value("app name", config.app_name.as_deref().unwrap_or_default())?,
    );
    headers.insert(
        HeaderName::from_static(APP_VERSION_HEADER),
        header_value(
            "app version",
            config.app_version.as_deref().unwrap_or_default(),
        )?,
    );
    headers.insert(
        HeaderName::from_static(OS_HEADER),
        HeaderValue::from_static(RUST_SDK_OS),
    );
    headers.insert(
        HeaderName::from_static(OS_VERSION_HEADER),
        header_value("os version", &os_version())?,
    );
    Ok(headers)
}

/// Builds the endpoint urls on top of the configured api host.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    base_url: Url,
}

impl Endpoints {
    pub fn new(api_url: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(api_url.unwrap_or(API_URL))
            .map_err(|e| Error::Config(format!("invalid api url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "invalid api url: {} cannot be a base",
                base_url
            )));
        }
        Ok(Self { base_url })
    }

    /// `/v1/users/{user_id}/code-blocks/{experiment}`
    pub fn code_block(&self, user_id: &str, experiment: &str) -> Result<Url> {
        self.build(&["v1", "users", user_id, "code-blocks", experiment])
    }

    /// `/v1/users/{user_id}/events/{event}`
    pub fn event(&self, user_id: &str, event: &str) -> Result<Url> {
        self.build(&["v1", "users", user_id, "events", event])
    }

    // Each identifier is pushed as one percent-encoded segment. Dot segments
    // can't be carried in a url at all, they would be resolved away.
    fn build(&self, segments: &[&str]) -> Result<Url> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(Error::InvalidId(dot.to_string()));
        }
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

pub(crate) fn encode_body<T: Serialize + ?Sized>(body: Option<&T>) -> Result<Option<Vec<u8>>> {
    match body {
        Some(body) => serde_json::to_vec(body)
            .map(Some)
            .map_err(Error::Serialize),
        None => Ok(None),
    }
}

pub(crate) fn check_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Status {
            code: status.as_u16(),
            text: status.to_string(),
        })
    }
}

pub(crate) fn decode_body<R: DeserializeOwned>(bytes: &[u8]) -> Result<R> {
    serde_json::from_slice(bytes).map_err(Error::Deserialize)
}

/// Emits the error on the debug side channel and hands the result back untouched.
pub(crate) fn log_failure<T>(
    debug: bool,
    method: &Method,
    url: &Url,
    res: Result<T>,
) -> Result<T> {
    if debug {
        if let Err(e) = &res {
            event!(Level::ERROR, "apptimize {} {} failed: {:?}", method, url, e);
        }
    }
    res
}

#[derive(Debug, Clone)]
pub struct ApptimizeHttpClient {
    endpoints: Endpoints,
    http_client: Client,
    debug: bool,
}

impl ApptimizeHttpClient {
    pub fn new(config: &ApptimizeConfig, options: &ApptimizeOptions) -> Result<Self> {
        let endpoints = Endpoints::new(options.api_url.as_deref())?;
        let mut builder = ClientBuilder::new()
            .pool_idle_timeout(Some(Duration::from_secs(60)))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .default_headers(identity_headers(config)?);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            endpoints,
            http_client,
            debug: options.debug,
        })
    }

    pub async fn get_variant(&self, user_id: &str, experiment: &str) -> Result<String> {
        let url = self.endpoints.code_block(user_id, experiment)?;
        let res = self
            .request_json::<(), CodeBlockResponse>(Method::GET, url, None)
            .await?;
        Ok(res.code_block_variant.unwrap_or_default())
    }

    pub async fn track_event<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        event: &str,
        attributes: Option<&T>,
    ) -> Result<()> {
        let url = self.endpoints.event(user_id, event)?;
        self.request(Method::POST, url, attributes).await
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<()> {
        let res = self
            .send(method.clone(), url.clone(), body)
            .await
            .map(|_| ());
        log_failure(self.debug, &method, &url, res)
    }

    async fn request_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<R> {
        let res = match self.send(method.clone(), url.clone(), body).await {
            Ok(response) => match response.bytes().await {
                Ok(bytes) => decode_body(&bytes),
                Err(err) => Err(Error::Transport(err)),
            },
            Err(err) => Err(err),
        };
        log_failure(self.debug, &method, &url, res)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response> {
        let body = encode_body(body)?;
        event!(Level::DEBUG, "apptimize request: {} {}", method, url);

        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.header(header::CONTENT_TYPE, JSON_CONTENT_TYPE).body(body);
        }
        let response = request.send().await?;
        check_status(response.status())?;
        Ok(response)
    }
}
