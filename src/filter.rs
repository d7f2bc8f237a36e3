//! Flight filtering, sorting and filter-option aggregation.
//!
//! All functions here are pure over value types. Callers recompute
//! derived data (filtered results, filter options) whenever their
//! inputs change and cache the outputs themselves; nothing in this
//! module holds state.

use time::PrimitiveDateTime;

use crate::models::{FilterState, Flight, SortConfig, SortDirection, SortField};

/// Stop counts of 2 or more share one "2+" bucket.
const STOP_BUCKET_MAX: u32 = 2;

/// Minutes between midnight and a local timestamp's time of day.
pub fn minutes_from_midnight(at: PrimitiveDateTime) -> u32 {
    at.hour() as u32 * 60 + at.minute() as u32
}

fn stop_bucket(stops: u32) -> u32 {
    stops.min(STOP_BUCKET_MAX)
}

/// One selectable airline with its offer count.
#[derive(Debug, Clone, PartialEq)]
pub struct AirlineOption {
    pub code: String,
    pub name: String,
    pub count: u32,
}

/// One selectable stop bucket with its offer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopOption {
    /// Stop count clamped to the "2+" bucket
    pub value: u32,
    pub count: u32,
}

/// Dynamic range of filterable attributes, recomputed whenever the
/// underlying flight set changes.
///
/// For an empty flight set the price bounds default to 0..1000 and the
/// departure bounds are the inverted range 1440..0, which callers must
/// treat explicitly as "no data".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Airlines present in the set, sorted by display name
    pub airlines: Vec<AirlineOption>,
    /// Stop buckets present in the set, ascending
    pub stop_options: Vec<StopOption>,
    /// Floor of the cheapest observed price
    pub price_min: f64,
    /// Ceiling of the most expensive observed price
    pub price_max: f64,
    /// Earliest observed departure, minutes from midnight
    pub departure_time_min: u32,
    /// Latest observed departure, minutes from midnight
    pub departure_time_max: u32,
}

impl FilterOptions {
    /// A filter state spanning the full observed bounds, restricting
    /// nothing. This is the reset state for filter controls.
    pub fn unrestricted_filters(&self) -> FilterState {
        FilterState {
            stops: Vec::new(),
            price_range: (self.price_min, self.price_max),
            airlines: Vec::new(),
            departure_time_range: (self.departure_time_min, self.departure_time_max),
        }
    }
}

/// Applies the conjunction of the four filter predicates, preserving
/// input order. Empty stop/airline selections restrict nothing.
pub fn filter_flights(flights: &[Flight], filters: &FilterState) -> Vec<Flight> {
    flights
        .iter()
        .filter(|flight| {
            if !filters.stops.is_empty() && !filters.stops.contains(&stop_bucket(flight.stops)) {
                return false;
            }

            if flight.price < filters.price_range.0 || flight.price > filters.price_range.1 {
                return false;
            }

            if !filters.airlines.is_empty() && !filters.airlines.contains(&flight.airline_code) {
                return false;
            }

            let departure_minutes = minutes_from_midnight(flight.departure_time);
            if departure_minutes < filters.departure_time_range.0
                || departure_minutes > filters.departure_time_range.1
            {
                return false;
            }

            true
        })
        .cloned()
        .collect()
}

/// Returns a new sequence sorted by the configured field. The sort is
/// stable, so ties keep their input order and repeated clicks through
/// sort toggles stay deterministic. Descending negates the comparator.
pub fn sort_flights(flights: &[Flight], sort: &SortConfig) -> Vec<Flight> {
    let mut sorted = flights.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Duration => a.duration_minutes.cmp(&b.duration_minutes),
            SortField::DepartureTime => a.departure_time.cmp(&b.departure_time),
            SortField::ArrivalTime => a.arrival_time.cmp(&b.arrival_time),
            SortField::Stops => a.stops.cmp(&b.stops),
            SortField::Airline => a.airline.cmp(&b.airline),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Accumulates the available filter dimensions from a flight set in a
/// single pass: airline and stop-bucket counts, price bounds floored
/// and ceiled to whole units so slider bounds always contain every
/// observed price, and the observed departure-minute bounds.
pub fn extract_filter_options(flights: &[Flight]) -> FilterOptions {
    let mut airlines: Vec<AirlineOption> = Vec::new();
    let mut stops: std::collections::BTreeMap<u32, u32> = std::collections::BTreeMap::new();
    let mut price_min = f64::INFINITY;
    let mut price_max = f64::NEG_INFINITY;
    let mut departure_time_min = 1440;
    let mut departure_time_max = 0;

    for flight in flights {
        match airlines
            .iter_mut()
            .find(|option| option.code == flight.airline_code)
        {
            Some(option) => option.count += 1,
            None => airlines.push(AirlineOption {
                code: flight.airline_code.clone(),
                // First name seen wins; within one result set every
                // entry for a code carries the same name.
                name: flight.airline.clone(),
                count: 1,
            }),
        }

        *stops.entry(stop_bucket(flight.stops)).or_insert(0) += 1;

        price_min = price_min.min(flight.price);
        price_max = price_max.max(flight.price);

        let departure_minutes = minutes_from_midnight(flight.departure_time);
        departure_time_min = departure_time_min.min(departure_minutes);
        departure_time_max = departure_time_max.max(departure_minutes);
    }

    if !price_min.is_finite() {
        price_min = 0.0;
    }
    if !price_max.is_finite() {
        price_max = 1000.0;
    }

    airlines.sort_by(|a, b| a.name.cmp(&b.name));

    FilterOptions {
        airlines,
        stop_options: stops
            .into_iter()
            .map(|(value, count)| StopOption { value, count })
            .collect(),
        price_min: price_min.floor(),
        price_max: price_max.ceil(),
        departure_time_min,
        departure_time_max,
    }
}

/// True when the user has narrowed any dimension from its observed
/// bounds. Unconditionally false before any data exists.
pub fn has_active_filters(filters: &FilterState, options: Option<&FilterOptions>) -> bool {
    let Some(options) = options else {
        return false;
    };
    if !filters.stops.is_empty() {
        return true;
    }
    if !filters.airlines.is_empty() {
        return true;
    }
    if filters.price_range.0 != options.price_min || filters.price_range.1 != options.price_max {
        return true;
    }
    if filters.departure_time_range.0 != options.departure_time_min
        || filters.departure_time_range.1 != options.departure_time_max
    {
        return true;
    }
    false
}

// ─── URL query serialization ────────────────────────────────────────
//
// The contract for shareable filtered result views: stops and airlines
// are comma-joined and omitted when unrestricted, range bounds and the
// sort are always written.

/// Serializes a filter/sort state to URL query pairs.
pub fn filters_to_query(filters: &FilterState, sort: &SortConfig) -> Vec<(String, String)> {
    let mut params = Vec::new();

    if !filters.stops.is_empty() {
        let stops = filters
            .stops
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("stops".to_string(), stops));
    }
    params.push(("priceMin".to_string(), filters.price_range.0.to_string()));
    params.push(("priceMax".to_string(), filters.price_range.1.to_string()));
    if !filters.airlines.is_empty() {
        params.push(("airlines".to_string(), filters.airlines.join(",")));
    }
    params.push((
        "depMin".to_string(),
        filters.departure_time_range.0.to_string(),
    ));
    params.push((
        "depMax".to_string(),
        filters.departure_time_range.1.to_string(),
    ));
    params.push(("sort".to_string(), sort.field.as_str().to_string()));
    params.push(("dir".to_string(), sort.direction.as_str().to_string()));

    params
}

/// Restores a filter/sort state from URL query pairs. Missing or
/// unparseable values fall back to the full bounds in `options` and the
/// default sort.
pub fn filters_from_query(
    params: &[(String, String)],
    options: &FilterOptions,
) -> (FilterState, SortConfig) {
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let parse_list = |value: Option<&str>| {
        value
            .map(|v| {
                v.split(',')
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };

    let stops = get("stops")
        .map(|v| v.split(',').filter_map(|item| item.parse().ok()).collect())
        .unwrap_or_default();
    let airlines = parse_list(get("airlines"));

    let price_min = get("priceMin")
        .and_then(|v| v.parse().ok())
        .unwrap_or(options.price_min);
    let price_max = get("priceMax")
        .and_then(|v| v.parse().ok())
        .unwrap_or(options.price_max);
    let dep_min = get("depMin")
        .and_then(|v| v.parse().ok())
        .unwrap_or(options.departure_time_min);
    let dep_max = get("depMax")
        .and_then(|v| v.parse().ok())
        .unwrap_or(options.departure_time_max);

    let sort = SortConfig {
        field: get("sort")
            .and_then(SortField::parse)
            .unwrap_or(SortConfig::default().field),
        direction: get("dir")
            .and_then(SortDirection::parse)
            .unwrap_or(SortConfig::default().direction),
    };

    (
        FilterState {
            stops,
            price_range: (price_min, price_max),
            airlines,
            departure_time_range: (dep_min, dep_max),
        },
        sort,
    )
}
