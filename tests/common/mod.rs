#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use time::macros::datetime;
use time::PrimitiveDateTime;

use farescope::client::{HttpTransport, Notifier, RawResponse, Severity};
use farescope::error::ApiError;
use farescope::models::{Flight, FlightSegment};

static INIT_LOGGER: Once = Once::new();

/// Initializes the test logger exactly once across all tests.
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Builds a flight with enough segments to satisfy the
/// `segments.len() - 1 == stops` invariant.
pub fn test_flight(
    id: &str,
    airline_code: &str,
    airline: &str,
    price: f64,
    stops: u32,
    departure_time: PrimitiveDateTime,
    arrival_time: PrimitiveDateTime,
    duration_minutes: u32,
) -> Flight {
    let mut segments = Vec::new();
    for leg in 0..=stops {
        segments.push(FlightSegment {
            departure_airport: if leg == 0 { "JFK".into() } else { "XXX".into() },
            departure_time,
            arrival_airport: if leg == stops { "LAX".into() } else { "XXX".into() },
            arrival_time,
            carrier_code: airline_code.to_string(),
            flight_number: format!("{}{}", airline_code, 100 + leg),
            duration_minutes: duration_minutes / (stops + 1),
            stops: 0,
        });
    }

    Flight {
        id: id.to_string(),
        airline: airline.to_string(),
        airline_code: airline_code.to_string(),
        origin: "JFK".to_string(),
        destination: "LAX".to_string(),
        departure_time,
        arrival_time,
        duration_minutes,
        stops,
        price,
        currency: "USD".to_string(),
        segments,
    }
}

/// The four-flight fixture set used across the engine tests.
/// Prices {250, 180.5, 420, 310} keyed to ids 1 through 4.
pub fn fixture_flights() -> Vec<Flight> {
    vec![
        test_flight(
            "1",
            "DL",
            "Delta Air Lines",
            250.0,
            0,
            datetime!(2026-09-14 08:00:00),
            datetime!(2026-09-14 11:15:00),
            375,
        ),
        test_flight(
            "2",
            "AA",
            "American Airlines",
            180.5,
            1,
            datetime!(2026-09-14 06:30:00),
            datetime!(2026-09-14 13:05:00),
            395,
        ),
        test_flight(
            "3",
            "UA",
            "United Airlines",
            420.0,
            2,
            datetime!(2026-09-14 14:45:00),
            datetime!(2026-09-14 23:55:00),
            550,
        ),
        test_flight(
            "4",
            "DL",
            "Delta Air Lines",
            310.0,
            3,
            datetime!(2026-09-14 22:10:00),
            datetime!(2026-09-15 09:40:00),
            690,
        ),
    ]
}

pub fn ids(flights: &[Flight]) -> Vec<String> {
    flights.iter().map(|f| f.id.clone()).collect()
}

// ─── Canned provider payloads ───────────────────────────────────────

/// A flight-offers response with one single-segment offer per
/// (price, carrier code) pair, plus a small carrier dictionary.
pub fn offers_json(offers: &[(f64, &str)]) -> String {
    let data: Vec<_> = offers
        .iter()
        .enumerate()
        .map(|(i, (price, carrier))| {
            json!({
                "id": (i + 1).to_string(),
                "itineraries": [{
                    "duration": "PT6H5M",
                    "segments": [{
                        "departure": { "iataCode": "JFK", "at": "2026-09-14T08:00:00" },
                        "arrival": { "iataCode": "LAX", "at": "2026-09-14T11:05:00" },
                        "carrierCode": carrier,
                        "number": "100",
                        "duration": "PT6H5M",
                        "numberOfStops": 0
                    }]
                }],
                "price": { "currency": "USD", "grandTotal": format!("{:.2}", price) },
                "validatingAirlineCodes": [carrier]
            })
        })
        .collect();

    json!({
        "meta": { "count": data.len() },
        "data": data,
        "dictionaries": {
            "carriers": {
                "DL": "Delta Air Lines",
                "AA": "American Airlines",
                "UA": "United Airlines"
            }
        }
    })
    .to_string()
}

pub fn token_json(expires_in: i64) -> String {
    json!({ "access_token": "test-token", "expires_in": expires_in }).to_string()
}

pub fn ok(body: String) -> RawResponse {
    RawResponse {
        status: 200,
        retry_after_secs: None,
        body,
    }
}

pub fn status(code: u16, body: &str) -> RawResponse {
    RawResponse {
        status: code,
        retry_after_secs: None,
        body: body.to_string(),
    }
}

pub fn rate_limited(retry_after_secs: Option<u64>) -> RawResponse {
    RawResponse {
        status: 429,
        retry_after_secs,
        body: "rate limit exceeded".to_string(),
    }
}

// ─── Scripted transport ─────────────────────────────────────────────

/// One recorded GET with the instant the client handed it over.
pub struct GetRecord {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub sent_at: tokio::time::Instant,
}

/// Transport that answers from a script instead of the network.
/// GET responses pop from a queue, falling back to a default; token
/// requests are counted separately.
pub struct MockTransport {
    token_response: Mutex<RawResponse>,
    pub token_requests: AtomicU32,
    responses: Mutex<VecDeque<RawResponse>>,
    default_response: Mutex<RawResponse>,
    pub get_log: Mutex<Vec<GetRecord>>,
    delay: Mutex<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            token_response: Mutex::new(ok(token_json(1799))),
            token_requests: AtomicU32::new(0),
            responses: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(ok(offers_json(&[]))),
            get_log: Mutex::new(Vec::new()),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn push_response(&self, response: RawResponse) {
        self.responses.lock().push_back(response);
    }

    pub fn set_default_response(&self, response: RawResponse) {
        *self.default_response.lock() = response;
    }

    pub fn set_token_response(&self, response: RawResponse) {
        *self.token_response.lock() = response;
    }

    /// Adds artificial latency to every GET.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn get_count(&self) -> usize {
        self.get_log.lock().len()
    }

    /// Gaps between consecutive GET send times.
    pub fn send_gaps(&self) -> Vec<Duration> {
        let log = self.get_log.lock();
        log.windows(2)
            .map(|pair| pair[1].sent_at - pair[0].sent_at)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_form(&self, _url: &str, _form: &[(&str, &str)]) -> Result<RawResponse, ApiError> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.token_response.lock().clone())
    }

    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        _bearer_token: &str,
    ) -> Result<RawResponse, ApiError> {
        self.get_log.lock().push(GetRecord {
            url: url.to_string(),
            query: query.to_vec(),
            sent_at: tokio::time::Instant::now(),
        });

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.responses.lock().pop_front();
        Ok(scripted.unwrap_or_else(|| self.default_response.lock().clone()))
    }
}

// ─── Notification capture ───────────────────────────────────────────

/// A notifier that records every message it is handed.
pub fn capture_notifier() -> (Notifier, Arc<Mutex<Vec<(String, Severity)>>>) {
    let captured: Arc<Mutex<Vec<(String, Severity)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();
    let notifier: Notifier = Arc::new(move |message, severity| {
        sink.lock().push((message.to_string(), severity));
    });
    (notifier, captured)
}
