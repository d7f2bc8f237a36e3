//! Raw wire types for the flight-data provider (Amadeus-shaped API).
//!
//! These structs mirror the documented response schemas exactly as they
//! arrive on the wire (camelCase, string-typed prices and timestamps).
//! They never leave the access layer; the mapper converts them into the
//! normalized domain entities in [`crate::models`].

use serde::Deserialize;
use std::collections::HashMap;

/// Response from the OAuth2 client-credentials token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
    /// Local timestamp like "2026-09-14T08:35:00", no offset
    pub at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegmentData {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub carrier_code: String,
    pub number: String,
    /// ISO-8601-like duration, e.g. "PT2H30M"
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub number_of_stops: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryData {
    #[serde(default)]
    pub duration: String,
    pub segments: Vec<FlightSegmentData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceData {
    pub currency: String,
    /// Decimal amount as a string, e.g. "412.30"
    pub grand_total: String,
}

/// A single priced itinerary option returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOfferData {
    pub id: String,
    pub itineraries: Vec<ItineraryData>,
    pub price: PriceData,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
}

/// Carrier dictionary and friends shipped alongside search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dictionaries {
    /// Airline code to display name
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub count: u32,
}

/// Envelope of `GET /v2/shopping/flight-offers`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightSearchResponse {
    pub meta: Option<ResponseMeta>,
    #[serde(default)]
    pub data: Vec<FlightOfferData>,
    #[serde(default)]
    pub dictionaries: Dictionaries,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAddress {
    pub city_name: String,
    pub country_name: String,
}

/// A location record from `GET /v1/reference-data/locations`.
/// The nested address block is required; its absence is treated as a
/// malformed response when the envelope is deserialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub iata_code: String,
    pub name: String,
    pub address: LocationAddress,
}

/// Envelope of the location search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationResponse {
    #[serde(default)]
    pub data: Vec<LocationData>,
}
