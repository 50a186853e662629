//! Synchronous client, for callers that are not running an async runtime.
//!
//! Must not be used from inside a tokio runtime, the underlying
//! `reqwest::blocking` client refuses to block there.
use std::time::Duration;

use reqwest::{
    blocking::{self, ClientBuilder, Response},
    header, Method, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{event, Level};

use crate::{
    error::{Error, Result},
    http::{
        check_status, decode_body, encode_body, identity_headers, log_failure, Endpoints,
        JSON_CONTENT_TYPE,
    },
    models::{ApptimizeConfig, ApptimizeOptions, CodeBlockResponse},
};

/// Blocking counterpart of [`crate::Client`], with the same operations.
#[derive(Debug, Clone)]
pub struct Client {
    endpoints: Endpoints,
    http_client: blocking::Client,
    debug: bool,
}

impl Client {
    pub fn new(config: ApptimizeConfig) -> Result<Self> {
        Self::with_options(config, ApptimizeOptions::default())
    }

    pub fn with_options(config: ApptimizeConfig, options: ApptimizeOptions) -> Result<Self> {
        let endpoints = Endpoints::new(options.api_url.as_deref())?;
        let http_client = ClientBuilder::new()
            .pool_idle_timeout(Some(Duration::from_secs(60)))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .timeout(options.timeout)
            .default_headers(identity_headers(&config)?)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            endpoints,
            http_client,
            debug: options.debug,
        })
    }

    /// Returns the code block variant the user should run for an experiment.
    pub fn get_variant(&self, user_id: &str, experiment: &str) -> Result<String> {
        let url = self.endpoints.code_block(user_id, experiment)?;
        let res: CodeBlockResponse = self.request_json::<(), _>(Method::GET, url, None)?;
        Ok(res.code_block_variant.unwrap_or_default())
    }

    pub fn track(&self, user_id: &str, event: &str) -> Result<()> {
        self.track_event::<()>(user_id, event, None)
    }

    pub fn track_event<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        event: &str,
        attributes: Option<&T>,
    ) -> Result<()> {
        let url = self.endpoints.event(user_id, event)?;
        let res = self.send(Method::POST, url.clone(), attributes).map(|_| ());
        log_failure(self.debug, &Method::POST, &url, res)
    }

    /// More than one payload fails with [`Error::BadAttributes`] before any request is made.
    pub fn track_payloads<T: Serialize>(
        &self,
        user_id: &str,
        event: &str,
        payloads: &[T],
    ) -> Result<()> {
        match payloads {
            [] => self.track(user_id, event),
            [attributes] => self.track_event(user_id, event, Some(attributes)),
            _ => Err(Error::BadAttributes),
        }
    }

    fn request_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<R> {
        let res = self
            .send(method.clone(), url.clone(), body)
            .and_then(|response| response.bytes().map_err(Error::Transport))
            .and_then(|bytes| decode_body(&bytes));
        log_failure(self.debug, &method, &url, res)
    }

    fn send<B: Serialize + ?Sized>(
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
        let response = request.send()?;
        check_status(response.status())?;
        Ok(response)
    }
}
