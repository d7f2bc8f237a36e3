//! Provider access layer: token caching, request throttling and retry.
//!
//! [`AmadeusClient`] owns all process-wide mutable state of the access
//! layer (the cached bearer token and the last-send timestamp) behind
//! tokio mutexes, so concurrent callers serialize through the same
//! throttle instead of computing stale delays against each other. The
//! HTTP transport sits behind the [`HttpTransport`] trait so tests can
//! swap in a scripted implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::codec::format_date;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::mapper::{map_flight_search_response, map_location};
use crate::models::{Airport, Flight, SearchQuery};
use crate::provider::{FlightSearchResponse, LocationResponse, TokenResponse};

/// Offer cap for the per-date lookups issued by the trend aggregator.
const TREND_RESULT_CAP: u32 = 10;

/// Page size for airport keyword lookups.
const LOCATION_PAGE_LIMIT: u32 = 7;

/// Severity attached to user-facing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Pluggable notification sink for user-facing messages. Defaults to a
/// no-op so the access layer stays decoupled from any particular UI
/// notification mechanism.
pub type Notifier = Arc<dyn Fn(&str, Severity) + Send + Sync>;

/// Status, Retry-After header and body of a provider response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub retry_after_secs: Option<u64>,
    pub body: String,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam between the client and the wire.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs a form-encoded body, as the OAuth2 token endpoint expects.
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<RawResponse, ApiError>;

    /// GETs with a bearer token and query parameters.
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        bearer_token: &str,
    ) -> Result<RawResponse, ApiError>;
}

/// Production transport backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

async fn raw_response(response: reqwest::Response) -> Result<RawResponse, ApiError> {
    let status = response.status().as_u16();
    let retry_after_secs = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());
    let body = response.text().await?;
    Ok(RawResponse {
        status,
        retry_after_secs,
        body,
    })
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<RawResponse, ApiError> {
        let response = self.client.post(url).form(form).send().await?;
        raw_response(response).await
    }

    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        bearer_token: &str,
    ) -> Result<RawResponse, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(bearer_token)
            .send()
            .await?;
        raw_response(response).await
    }
}

/// Cached bearer token with its expiry instant.
struct TokenState {
    token: Option<String>,
    expires_at: OffsetDateTime,
}

/// Client session for the flight-data provider.
pub struct AmadeusClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    /// Cached token; the mutex also serializes concurrent refreshes so
    /// only one exchange is in flight at a time.
    token: Mutex<TokenState>,
    /// Send time of the most recent data request. The mutex waiter
    /// queue is the FIFO request queue: each caller waits out the
    /// remaining interval against the previous actual send time.
    last_request: Mutex<Option<Instant>>,
    notifier: Notifier,
}

impl AmadeusClient {
    /// Creates a client with the production reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(
            config.request_timeout_secs,
        ))?);
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client over an arbitrary transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            token: Mutex::new(TokenState {
                token: None,
                expires_at: OffsetDateTime::UNIX_EPOCH,
            }),
            last_request: Mutex::new(None),
            notifier: Arc::new(|_, _| {}),
        }
    }

    /// Installs the notification sink invoked on every failure path and
    /// on rate-limit waits.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    fn notify(&self, message: &str, severity: Severity) {
        (self.notifier)(message, severity);
    }

    fn notify_failure(&self, err: ApiError) -> ApiError {
        self.notify(err.user_message(), Severity::Error);
        err
    }

    /// Returns the cached bearer token, exchanging credentials for a
    /// fresh one when absent or expired. The cached expiry keeps a
    /// safety margin below the provider's expires_in. A failed exchange
    /// is never retried automatically; repeated credential failures
    /// should stay visible.
    pub async fn get_access_token(&self) -> Result<String, ApiError> {
        let mut state = self.token.lock().await;
        let now = OffsetDateTime::now_utc();
        if let Some(token) = &state.token {
            if now < state.expires_at {
                return Ok(token.clone());
            }
        }

        log::debug!("access token absent or expired, requesting a new one");
        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.api_key.as_str()),
            ("client_secret", self.config.api_secret.as_str()),
        ];
        let response = self
            .transport
            .post_form(&url, &form)
            .await
            .map_err(|e| self.notify_failure(e))?;

        if !response.is_success() {
            log::error!("token exchange failed with status {}", response.status);
            return Err(self.notify_failure(ApiError::TokenAcquisitionFailed {
                status: response.status,
                body: response.body,
            }));
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::MalformedResponse(format!("token response: {}", e)))
            .map_err(|e| self.notify_failure(e))?;

        let lifetime = (parsed.expires_in - self.config.token_expiry_margin_secs).max(0);
        state.token = Some(parsed.access_token.clone());
        state.expires_at = now + time::Duration::seconds(lifetime);
        Ok(parsed.access_token)
    }

    /// Waits until at least the configured interval has passed since the
    /// previous request's actual send time, then claims the current
    /// instant as this request's send time. Callers queue up FIFO on the
    /// mutex, so spacing holds across any number of concurrent callers.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        let min_interval = Duration::from_millis(self.config.min_request_interval_ms);
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Issues one throttled GET against the provider, retrying on 429 up
    /// to the configured cap. The retry delay honors a Retry-After
    /// header when present, otherwise backs off exponentially. Non-429
    /// failures are classified and surfaced immediately.
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<String, ApiError> {
        self.pace().await;
        let url = format!("{}{}", self.config.base_url, path);

        let mut attempt: u32 = 0;
        loop {
            let token = self.get_access_token().await?;
            let response = self
                .transport
                .get(&url, query, &token)
                .await
                .map_err(|e| self.notify_failure(e))?;

            if response.status == 429 && attempt < self.config.max_retries {
                let delay = response
                    .retry_after_secs
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| {
                        Duration::from_millis(self.config.retry_base_delay_ms << attempt)
                    });
                self.notify(
                    "Taking a little longer than usual. Hang tight.",
                    Severity::Info,
                );
                log::warn!(
                    "rate limited on {}, waiting {:?} before attempt {}",
                    path,
                    delay,
                    attempt + 2
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if response.status == 429 {
                return Err(self.notify_failure(ApiError::RateLimited {
                    attempts: attempt + 1,
                }));
            }

            if !response.is_success() {
                log::error!("provider returned {} for {}", response.status, path);
                return Err(
                    self.notify_failure(ApiError::from_status(response.status, response.body))
                );
            }

            return Ok(response.body);
        }
    }

    /// Searches flight offers for a validated query, returning the
    /// normalized flights for the outbound itinerary of each offer.
    pub async fn search_flights(&self, query: &SearchQuery) -> Result<Vec<Flight>, ApiError> {
        let mut params = vec![
            ("originLocationCode".to_string(), query.origin.clone()),
            (
                "destinationLocationCode".to_string(),
                query.destination.clone(),
            ),
            (
                "departureDate".to_string(),
                format_date(query.departure_date),
            ),
            ("adults".to_string(), query.passengers.to_string()),
            ("nonStop".to_string(), "false".to_string()),
            ("max".to_string(), self.config.max_results.to_string()),
            (
                "currencyCode".to_string(),
                self.config.currency_code.clone(),
            ),
            (
                "travelClass".to_string(),
                query.travel_class.as_str().to_string(),
            ),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate".to_string(), format_date(return_date)));
        }

        let body = self.get_json("/v2/shopping/flight-offers", &params).await?;
        let response: FlightSearchResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("flight search response: {}", e)))?;
        map_flight_search_response(&response)
    }

    /// Looks up airports matching a keyword, most-traveled first.
    pub async fn search_airports(&self, keyword: &str) -> Result<Vec<Airport>, ApiError> {
        let params = vec![
            ("subType".to_string(), "AIRPORT".to_string()),
            ("keyword".to_string(), keyword.to_string()),
            ("page[limit]".to_string(), LOCATION_PAGE_LIMIT.to_string()),
            ("sort".to_string(), "analytics.travelers.score".to_string()),
            ("view".to_string(), "LIGHT".to_string()),
        ];

        let body = self.get_json("/v1/reference-data/locations", &params).await?;
        let response: LocationResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("location response: {}", e)))?;
        Ok(response.data.iter().map(map_location).collect())
    }

    /// Single-date lookup used by the price-trend aggregator: one adult,
    /// a small offer cap, and a same-day return unless one way.
    pub async fn flights_for_date(
        &self,
        origin: &str,
        destination: &str,
        date: Date,
        one_way: bool,
    ) -> Result<Vec<Flight>, ApiError> {
        let mut params = vec![
            ("originLocationCode".to_string(), origin.to_string()),
            ("destinationLocationCode".to_string(), destination.to_string()),
            ("departureDate".to_string(), format_date(date)),
            ("adults".to_string(), "1".to_string()),
            ("nonStop".to_string(), "false".to_string()),
            ("max".to_string(), TREND_RESULT_CAP.to_string()),
            (
                "currencyCode".to_string(),
                self.config.currency_code.clone(),
            ),
        ];
        if !one_way {
            params.push(("returnDate".to_string(), format_date(date)));
        }

        let body = self.get_json("/v2/shopping/flight-offers", &params).await?;
        let response: FlightSearchResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("flight search response: {}", e)))?;
        map_flight_search_response(&response)
    }
}
