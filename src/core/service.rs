//! Distance-matrix service boundary
//!
//! [`DistanceService`] is the single capability the engine needs: given
//! origins and destinations, return a distance-matrix reply. The production
//! implementation is [`GoogleMapsClient`]; tests substitute scripted fakes.

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::{Error, Result};

/// Environment variable holding the distance-matrix API key
pub const API_KEY_ENV: &str = "GMAPS_API_KEY";

/// Reply status meaning the whole matrix is trustworthy
pub const STATUS_OK: &str = "OK";

/// Raw distance-matrix reply.
///
/// Fields are kept as loose JSON so a malformed part degrades only what it
/// touches; see [`DistanceMatrixReply::distance`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistanceMatrixReply {
    #[serde(default)]
    status: Value,

    #[serde(default)]
    rows: Value,

    #[serde(default)]
    error_message: Value,
}

impl DistanceMatrixReply {
    /// Parse a reply from a JSON value
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::Http(format!("Malformed distance-matrix reply: {e}")))
    }

    /// Reported status, if it is a string
    pub fn status(&self) -> Option<&str> {
        self.status.as_str()
    }

    /// Human-readable explanation sent along with a failed status
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_str()
    }

    /// True only when the service reported `"OK"` for the whole request
    pub fn is_ok(&self) -> bool {
        self.status() == Some(STATUS_OK)
    }

    /// True when the reply's arrays disagree with the request's dimensions.
    ///
    /// Cells are read by position, so a reply with a different number of
    /// rows or elements (an address containing `|` is split by the service)
    /// cannot be mapped back onto the request. Absent or non-array parts are
    /// not a mismatch; they only leave the affected cells missing.
    pub fn contradicts_shape(&self, origins: usize, destinations: usize) -> bool {
        let Some(rows) = self.rows.as_array() else {
            return false;
        };
        rows.len() != origins
            || rows.iter().any(|row| {
                row.get("elements")
                    .and_then(Value::as_array)
                    .is_some_and(|elements| elements.len() != destinations)
            })
    }

    /// Distance in meters from origin `origin` to destination `destination`.
    ///
    /// `None` when the element is absent, not `OK`-shaped, or non-numeric.
    pub fn distance(&self, origin: usize, destination: usize) -> Option<f64> {
        self.rows
            .get(origin)?
            .get("elements")?
            .get(destination)?
            .get("distance")?
            .get("value")?
            .as_f64()
    }
}

/// Capability to compute a distance matrix between two address lists
pub trait DistanceService {
    /// Query distances from every origin to every destination.
    ///
    /// An `Err` is a transport failure and aborts the run. A reply whose
    /// status is not `OK` is returned as `Ok` and handled by the caller.
    fn query(
        &self,
        origins: &[String],
        destinations: &[String],
    ) -> impl Future<Output = Result<DistanceMatrixReply>> + Send;
}

/// Connection settings for the distance-matrix HTTP API
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Scheme and host of the API, without a trailing slash
    pub base_url: String,

    /// API key sent as the `key` query parameter
    pub api_key: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: String::new(),
        }
    }
}

impl ServiceConfig {
    /// Default endpoint with the API key read from [`API_KEY_ENV`]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            ..Default::default()
        }
    }

    fn matrix_url(&self) -> String {
        format!("{}/maps/api/distancematrix/json", self.base_url.trim_end_matches('/'))
    }
}

/// Google Maps Distance Matrix client
pub struct GoogleMapsClient {
    client: Client,
    config: ServiceConfig,
}

impl GoogleMapsClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("detour-rank/{}", env!("DETOUR_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }
}

impl DistanceService for GoogleMapsClient {
    async fn query(&self, origins: &[String], destinations: &[String]) -> Result<DistanceMatrixReply> {
        debug!(
            "distance matrix request: {} origins x {} destinations",
            origins.len(),
            destinations.len()
        );

        let response = self
            .client
            .get(self.config.matrix_url())
            .query(&[
                ("origins", origins.join("|")),
                ("destinations", destinations.join("|")),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("Distance matrix request failed: {status}")));
        }

        let body: Value = response.json().await?;
        DistanceMatrixReply::from_json(body)
    }
}
