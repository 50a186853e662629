use serde::Serialize;

use crate::{
    error::{Error, Result},
    http::ApptimizeHttpClient,
    models::{ApptimizeConfig, ApptimizeOptions},
};

/// Apptimize client. Every call is a single round-trip to the API, nothing is cached.
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: ApptimizeHttpClient,
}

impl Client {
    pub fn new(config: ApptimizeConfig) -> Result<Self> {
        Self::with_options(config, ApptimizeOptions::default())
    }

    pub fn with_options(config: ApptimizeConfig, options: ApptimizeOptions) -> Result<Self> {
        let http_client = ApptimizeHttpClient::new(&config, &options)?;
        Ok(Self { http_client })
    }

    /// Returns the code block variant the user should run for an experiment.
    ///
    /// An empty string means the server assigned no variant.
    pub async fn get_variant(&self, user_id: &str, experiment: &str) -> Result<String> {
        self.http_client.get_variant(user_id, experiment).await
    }

    /// Tracks an event without attributes.
    pub async fn track(&self, user_id: &str, event: &str) -> Result<()> {
        self.http_client
            .track_event::<()>(user_id, event, None)
            .await
    }

    /// Tracks an event, sending `attributes` (a map or a struct) as the JSON body.
    pub async fn track_event<T: Serialize + ?Sized>(
        &self,
        user_id: &str,
        event: &str,
        attributes: Option<&T>,
    ) -> Result<()> {
        self.http_client
            .track_event(user_id, event, attributes)
            .await
    }

    /// Tracks an event with zero or one attribute payloads.
    ///
    /// More than one payload fails with [`Error::BadAttributes`] before any request is made.
    pub async fn track_payloads<T: Serialize>(
        &self,
        user_id: &str,
        event: &str,
        payloads: &[T],
    ) -> Result<()> {
        match payloads {
            [] => self.track(user_id, event).await,
            [attributes] => self.track_event(user_id, event, Some(attributes)).await,
            _ => Err(Error::BadAttributes),
        }
    }
}
