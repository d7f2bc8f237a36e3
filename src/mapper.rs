//! Offer mapper: raw provider records to normalized domain entities.
//!
//! Mapping is hardened: a missing itinerary, an empty segment list, an
//! unparseable timestamp or price all surface as
//! [`ApiError::MalformedResponse`] instead of producing NaN prices or
//! panicking mid-render. Duration parsing stays fail-soft (see
//! [`crate::codec::parse_duration`]).

use std::collections::HashMap;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::codec::parse_duration;
use crate::error::ApiError;
use crate::models::{Airport, Flight, FlightSegment};
use crate::provider::{FlightOfferData, FlightSearchResponse, LocationData};

/// Provider timestamps are local to the airport and carry no offset.
const TIMESTAMP_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

fn parse_timestamp(value: &str, context: &str) -> Result<PrimitiveDateTime, ApiError> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT).map_err(|e| {
        ApiError::MalformedResponse(format!("bad {} timestamp {:?}: {}", context, value, e))
    })
}

/// Maps one raw offer into a [`Flight`].
///
/// Only the first itinerary is used; the provider returns one itinerary
/// per direction and each directional search is mapped independently.
/// Origin and destination come from the first segment's departure and
/// the last segment's arrival, so multi-segment itineraries collapse to
/// a single origin/destination pair. The airline display name is looked
/// up in the carrier dictionary by the first validating-airline code,
/// falling back to the raw code itself.
pub fn map_flight_offer(
    offer: &FlightOfferData,
    carriers: &HashMap<String, String>,
) -> Result<Flight, ApiError> {
    let itinerary = offer.itineraries.first().ok_or_else(|| {
        ApiError::MalformedResponse(format!("offer {} has no itineraries", offer.id))
    })?;

    let first_segment = itinerary.segments.first().ok_or_else(|| {
        ApiError::MalformedResponse(format!("offer {} has no segments", offer.id))
    })?;
    // Non-empty is established above, so last() cannot fail; unwrap_or
    // keeps the error path total anyway.
    let last_segment = itinerary.segments.last().unwrap_or(first_segment);

    let airline_code = offer
        .validating_airline_codes
        .first()
        .unwrap_or(&first_segment.carrier_code)
        .clone();
    let airline = carriers
        .get(&airline_code)
        .cloned()
        .unwrap_or_else(|| airline_code.clone());

    let price: f64 = offer.price.grand_total.parse().map_err(|_| {
        ApiError::MalformedResponse(format!(
            "offer {} has unparseable grand total {:?}",
            offer.id, offer.price.grand_total
        ))
    })?;

    let segments = itinerary
        .segments
        .iter()
        .map(|seg| {
            Ok(FlightSegment {
                departure_airport: seg.departure.iata_code.clone(),
                departure_time: parse_timestamp(&seg.departure.at, "segment departure")?,
                arrival_airport: seg.arrival.iata_code.clone(),
                arrival_time: parse_timestamp(&seg.arrival.at, "segment arrival")?,
                carrier_code: seg.carrier_code.clone(),
                flight_number: format!("{}{}", seg.carrier_code, seg.number),
                duration_minutes: parse_duration(&seg.duration),
                stops: seg.number_of_stops,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Flight {
        id: offer.id.clone(),
        airline,
        airline_code,
        origin: first_segment.departure.iata_code.clone(),
        destination: last_segment.arrival.iata_code.clone(),
        departure_time: parse_timestamp(&first_segment.departure.at, "departure")?,
        arrival_time: parse_timestamp(&last_segment.arrival.at, "arrival")?,
        duration_minutes: parse_duration(&itinerary.duration),
        stops: (itinerary.segments.len() - 1) as u32,
        price,
        currency: offer.price.currency.clone(),
        segments,
    })
}

/// Maps every offer in a search response. Empty input yields empty
/// output; one malformed offer fails the whole response.
pub fn map_flight_search_response(
    response: &FlightSearchResponse,
) -> Result<Vec<Flight>, ApiError> {
    response
        .data
        .iter()
        .map(|offer| map_flight_offer(offer, &response.dictionaries.carriers))
        .collect()
}

/// Direct field projection from a provider location record.
pub fn map_location(location: &LocationData) -> Airport {
    Airport {
        iata_code: location.iata_code.clone(),
        name: location.name.clone(),
        city_name: location.address.city_name.clone(),
        country_name: location.address.country_name.clone(),
    }
}
