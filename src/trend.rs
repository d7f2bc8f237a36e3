//! Price-trend aggregation: cheapest fare per date over a range.
//!
//! One offer lookup is issued per date point, all concurrently in
//! flight at once (the access layer's throttle still spaces the actual
//! sends). Each date's offers reduce to the minimum price among the
//! offers matching the active filter set; dates with no matching offers
//! are omitted from the series entirely rather than charted as zero.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::RwLock;
use time::{Date, OffsetDateTime};

use crate::client::AmadeusClient;
use crate::codec::format_date;
use crate::error::ApiError;
use crate::filter::{filter_flights, has_active_filters, FilterOptions};
use crate::models::{ChartDataPoint, FilterState, Flight, TrendRange};

/// Extra attempts per date query, on top of the access layer's own
/// 429 handling.
const DATE_QUERY_RETRIES: u32 = 2;

/// Backoff base for per-date retries, doubled per attempt.
const DATE_RETRY_BASE_MS: u64 = 1000;

/// Per-date retry delays never exceed this.
const DATE_RETRY_CAP: Duration = Duration::from_secs(10);

impl TrendRange {
    /// Number of date points and the day spacing between them.
    fn layout(&self) -> (usize, i64) {
        match self {
            TrendRange::SevenDays => (7, 1),
            TrendRange::ThirtyDays => (6, 5),
            TrendRange::ThreeMonths => (6, 15),
        }
    }
}

/// Dates sampled for a range, starting the day after `today`.
pub fn compute_date_points(range: TrendRange, today: Date) -> Vec<Date> {
    let (points, spacing) = range.layout();
    let start = today + time::Duration::days(1);
    (0..points as i64)
        .map(|i| start + time::Duration::days(i * spacing))
        .collect()
}

/// Computes and holds the cheapest-fare-per-date series for a route.
///
/// The previously computed series stays visible through [`Self::series`]
/// while a refresh is in flight and is replaced atomically once the new
/// series is fully computed, so a chart never flashes to empty.
pub struct PriceTrend {
    client: Arc<AmadeusClient>,
    series: RwLock<Vec<ChartDataPoint>>,
}

impl PriceTrend {
    pub fn new(client: Arc<AmadeusClient>) -> Self {
        Self {
            client,
            series: RwLock::new(Vec::new()),
        }
    }

    /// The most recently completed series.
    pub fn series(&self) -> Vec<ChartDataPoint> {
        self.series.read().clone()
    }

    /// Recomputes the series for a route and range and swaps it in.
    ///
    /// Filters narrow the reduction only while actively narrowed (see
    /// [`has_active_filters`]); otherwise every returned offer
    /// participates. Dates whose lookups fail after retries, or match
    /// nothing, are dropped from the series.
    pub async fn refresh(
        &self,
        origin: &str,
        destination: &str,
        range: TrendRange,
        one_way: bool,
        filters: &FilterState,
        options: Option<&FilterOptions>,
    ) -> Vec<ChartDataPoint> {
        let dates = compute_date_points(range, OffsetDateTime::now_utc().date());
        let filters_active = has_active_filters(filters, options);

        let lookups = dates
            .iter()
            .map(|date| self.fetch_date(origin, destination, *date, one_way));
        let results = join_all(lookups).await;

        let mut points = Vec::new();
        for (date, flights) in dates.iter().zip(results) {
            let Some(flights) = flights else {
                continue;
            };
            if flights.is_empty() {
                continue;
            }

            let relevant = if filters_active {
                filter_flights(&flights, filters)
            } else {
                flights
            };
            if let Some(cheapest) = min_price(&relevant) {
                points.push(ChartDataPoint {
                    label: format_date(*date),
                    value: cheapest,
                });
            }
        }

        *self.series.write() = points.clone();
        points
    }

    /// One date lookup with a generic resilience retry. Rate-limit
    /// failures are not retried here: the access layer has already
    /// exhausted its 429 policy, and stacking a second retry loop on
    /// top would amplify load exactly when the provider is saturated.
    async fn fetch_date(
        &self,
        origin: &str,
        destination: &str,
        date: Date,
        one_way: bool,
    ) -> Option<Vec<Flight>> {
        let mut attempt: u32 = 0;
        loop {
            match self
                .client
                .flights_for_date(origin, destination, date, one_way)
                .await
            {
                Ok(flights) => return Some(flights),
                Err(ApiError::RateLimited { .. }) => {
                    log::warn!("dropping trend point {}: rate limited", format_date(date));
                    return None;
                }
                Err(e) if attempt < DATE_QUERY_RETRIES => {
                    let delay =
                        Duration::from_millis(DATE_RETRY_BASE_MS << attempt).min(DATE_RETRY_CAP);
                    log::warn!(
                        "trend lookup for {} failed ({}), retrying in {:?}",
                        format_date(date),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::warn!(
                        "dropping trend point {} after {} attempts: {}",
                        format_date(date),
                        attempt + 1,
                        e
                    );
                    return None;
                }
            }
        }
    }
}

fn min_price(flights: &[Flight]) -> Option<f64> {
    flights
        .iter()
        .map(|flight| flight.price)
        .min_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn seven_day_range_is_daily_starting_tomorrow() {
        let points = compute_date_points(TrendRange::SevenDays, date!(2026 - 09 - 01));
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], date!(2026 - 09 - 02));
        assert_eq!(points[6], date!(2026 - 09 - 08));
    }

    #[test]
    fn wider_ranges_space_points_out() {
        let month = compute_date_points(TrendRange::ThirtyDays, date!(2026 - 09 - 01));
        assert_eq!(month.len(), 6);
        assert_eq!(month[1], date!(2026 - 09 - 07));
        assert_eq!(month[5], date!(2026 - 09 - 27));

        let quarter = compute_date_points(TrendRange::ThreeMonths, date!(2026 - 09 - 01));
        assert_eq!(quarter.len(), 6);
        assert_eq!(quarter[1], date!(2026 - 09 - 17));
        assert_eq!(quarter[5], date!(2026 - 11 - 16));
    }
}
