//! Nominatim (OpenStreetMap) geocoding.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reelmap_core::GeoPoint;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{GeocodeError, GeocodeResult};
use crate::geocode::resilience::RateLimiter;
use crate::geocode::Geocoder;

const SOURCE_NAME: &str = "nominatim";

/// Nominatim search API client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: Client,
    base_url: String,
}

/// One hit from `/search?format=json`.
///
/// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl NominatimPlace {
    /// Convert the textual coordinates into a validated point.
    ///
    /// # Errors
    /// Returns [`GeocodeError::Parse`] for non-numeric values and
    /// [`GeocodeError::InvalidCoordinate`] for out-of-range ones.
    pub fn position(&self) -> GeocodeResult<GeoPoint> {
        let parse = |value: &str| {
            value.trim().parse::<f64>().map_err(|_| GeocodeError::Parse {
                source_name: SOURCE_NAME.to_string(),
                message: format!("not a coordinate: {value:?}"),
            })
        };
        Ok(GeoPoint::new(
            parse(self.lat.as_str())?,
            parse(self.lon.as_str())?,
        )?)
    }
}

impl NominatimClient {
    /// Create a new Nominatim client.
    ///
    /// Nominatim rejects requests without an identifying user agent.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn search_url(&self, place: &str) -> GeocodeResult<Url> {
        let endpoint = format!("{}/search", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &endpoint,
            &[("q", place), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| GeocodeError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: format!("invalid endpoint {endpoint}: {e}"),
        })
    }

    /// Look up the best match for a free-text place name.
    ///
    /// Rate limit: 1 request/second (enforced by caller).
    ///
    /// # Errors
    /// Returns an error if the request fails, the service refuses it, or the
    /// response cannot be interpreted.
    pub async fn search(&self, place: &str) -> GeocodeResult<Option<GeoPoint>> {
        let url = self.search_url(place)?;
        log::debug!("GET {url}");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited {
                source_name: SOURCE_NAME.to_string(),
            });
        }
        if !status.is_success() {
            return Err(GeocodeError::Http {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let places = response.json::<Vec<NominatimPlace>>().await?;
        places.first().map(NominatimPlace::position).transpose()
    }
}

/// Rate-limited, retrying geocoder backed by [`NominatimClient`].
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: NominatimClient,
    rate_limiter: RateLimiter,
    max_retries: usize,
}

impl NominatimGeocoder {
    #[must_use]
    pub fn new(client: NominatimClient, requests_per_second: u32, max_retries: usize) -> Self {
        Self {
            client,
            rate_limiter: RateLimiter::new(requests_per_second),
            max_retries,
        }
    }

    /// Build a geocoder from the configured endpoint, user agent and limits.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> GeocodeResult<Self> {
        let client = NominatimClient::new(config.nominatim_url.clone(), &config.user_agent)?;
        Ok(Self::new(
            client,
            config.geocode_requests_per_second,
            config.geocode_max_retries,
        ))
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn locate(&self, place: &str) -> GeocodeResult<Option<GeoPoint>> {
        let lookup = || async move {
            self.rate_limiter.acquire().await;
            self.client.search(place).await
        };

        lookup
            .retry(ExponentialBuilder::default().with_max_times(self.max_retries))
            .when(GeocodeError::is_transient)
            .notify(|err, after| {
                log::warn!("Geocoding {place:?} failed ({err}), retrying in {after:?}");
            })
            .await
    }
}
