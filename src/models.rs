//! Data models for the farescope core.
//! Defines the normalized flight domain entities plus the filter, sort
//! and chart value types shared by the engine and the API client.

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

/// An airport, sourced from provider location search or the static
/// popular-airports table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Three-letter IATA code, e.g. "JFK"
    pub iata_code: String,
    /// Airport display name
    pub name: String,
    /// City the airport serves
    pub city_name: String,
    /// Country the airport is in
    pub country_name: String,
}

/// One non-stop leg within an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSegment {
    /// IATA code of the departure airport
    pub departure_airport: String,
    /// Departure timestamp, provider-local (no offset)
    pub departure_time: PrimitiveDateTime,
    /// IATA code of the arrival airport
    pub arrival_airport: String,
    /// Arrival timestamp, provider-local (no offset)
    pub arrival_time: PrimitiveDateTime,
    /// Operating carrier code, e.g. "BA"
    pub carrier_code: String,
    /// Carrier code plus flight number, e.g. "BA178"
    pub flight_number: String,
    /// Segment flying time in minutes
    pub duration_minutes: u32,
    /// Technical stops within the segment (almost always 0)
    pub stops: u32,
}

/// A normalized flight offer for one direction of travel.
///
/// Built once per raw provider offer by the mapper and treated as an
/// immutable record for the lifetime of a result set. Invariants:
/// `segments.len() - 1 == stops`, `origin` is the first segment's
/// departure airport and `destination` the last segment's arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Provider-assigned offer id
    pub id: String,
    /// Airline display name (dictionary lookup, raw code as fallback)
    pub airline: String,
    /// Validating airline code
    pub airline_code: String,
    /// IATA code of the overall origin
    pub origin: String,
    /// IATA code of the overall destination
    pub destination: String,
    /// Departure of the first segment
    pub departure_time: PrimitiveDateTime,
    /// Arrival of the last segment
    pub arrival_time: PrimitiveDateTime,
    /// Total itinerary duration in minutes
    pub duration_minutes: u32,
    /// Number of intermediate stops (segments - 1)
    pub stops: u32,
    /// Grand total price in `currency`
    pub price: f64,
    /// Price currency code, e.g. "USD"
    pub currency: String,
    /// The legs making up this flight, in travel order
    pub segments: Vec<FlightSegment>,
}

/// User-selected restrictions on a flight result set.
///
/// Empty `stops`/`airlines` vectors mean "no restriction on this
/// dimension", not "exclude everything".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Allowed stop buckets (0, 1, 2 where 2 means "2 or more")
    pub stops: Vec<u32>,
    /// Inclusive price bounds
    pub price_range: (f64, f64),
    /// Allowed airline codes
    pub airlines: Vec<String>,
    /// Inclusive departure window in minutes from midnight
    pub departure_time_range: (u32, u32),
}

/// Attribute a result set can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Price,
    Duration,
    DepartureTime,
    ArrivalTime,
    Stops,
    Airline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Field and direction to order a result set by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: SortField::Price,
            direction: SortDirection::Asc,
        }
    }
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Duration => "duration",
            SortField::DepartureTime => "departureTime",
            SortField::ArrivalTime => "arrivalTime",
            SortField::Stops => "stops",
            SortField::Airline => "airline",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "price" => Some(SortField::Price),
            "duration" => Some(SortField::Duration),
            "departureTime" => Some(SortField::DepartureTime),
            "arrivalTime" => Some(SortField::ArrivalTime),
            "stops" => Some(SortField::Stops),
            "airline" => Some(SortField::Airline),
            _ => None,
        }
    }
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Cabin class accepted by the provider search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

/// Parameters for a flight-offer search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// IATA code of the origin airport
    pub origin: String,
    /// IATA code of the destination airport
    pub destination: String,
    pub departure_date: Date,
    /// Return date for round trips
    pub return_date: Option<Date>,
    /// Number of adult passengers (1 to 9)
    pub passengers: u32,
    pub travel_class: TravelClass,
}

impl SearchQuery {
    /// Validates the search parameters before they reach the provider.
    ///
    /// # Validation Rules
    /// - Origin and destination must be present
    /// - Passengers must be between 1 and 9
    /// - Return date, when set, must not precede the departure date
    pub fn validate(&self) -> Result<(), String> {
        if self.origin.is_empty() {
            return Err("origin is required".to_string());
        }
        if self.destination.is_empty() {
            return Err("destination is required".to_string());
        }
        if self.passengers < 1 || self.passengers > 9 {
            return Err("passengers must be between 1 and 9".to_string());
        }
        if let Some(return_date) = self.return_date {
            if return_date < self.departure_date {
                return Err("return date must not be before departure".to_string());
            }
        }
        Ok(())
    }
}

/// One point of the price-trend chart: cheapest matching fare for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Date label in `yyyy-mm-dd` form
    pub label: String,
    /// Lowest matching price observed for that date
    pub value: f64,
}

/// Selectable window over which the cheapest-fare-per-date series is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendRange {
    /// 7 daily points
    #[serde(rename = "7d")]
    SevenDays,
    /// 6 points spaced 5 days apart
    #[serde(rename = "30d")]
    ThirtyDays,
    /// 6 points spaced 15 days apart
    #[serde(rename = "3m")]
    ThreeMonths,
}
