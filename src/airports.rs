//! Static table of popular airports, used to seed airport pickers
//! before any provider lookup has run.

use crate::models::Airport;

const POPULAR: &[(&str, &str, &str, &str)] = &[
    ("JFK", "John F Kennedy Intl", "New York", "United States"),
    ("LAX", "Los Angeles Intl", "Los Angeles", "United States"),
    ("ORD", "O'Hare Intl", "Chicago", "United States"),
    ("ATL", "Hartsfield-Jackson Intl", "Atlanta", "United States"),
    ("DFW", "Dallas/Fort Worth Intl", "Dallas", "United States"),
    ("SFO", "San Francisco Intl", "San Francisco", "United States"),
    ("MIA", "Miami Intl", "Miami", "United States"),
    ("BOS", "Logan Intl", "Boston", "United States"),
    ("SEA", "Seattle-Tacoma Intl", "Seattle", "United States"),
    ("DEN", "Denver Intl", "Denver", "United States"),
    ("LHR", "Heathrow", "London", "United Kingdom"),
    ("CDG", "Charles de Gaulle", "Paris", "France"),
    ("FRA", "Frankfurt Intl", "Frankfurt", "Germany"),
    ("MAD", "Adolfo Suárez Madrid-Barajas", "Madrid", "Spain"),
    ("MEX", "Benito Juárez Intl", "Mexico City", "Mexico"),
    ("CUN", "Cancún Intl", "Cancún", "Mexico"),
];

/// The popular-airports table as owned values.
pub fn popular_airports() -> Vec<Airport> {
    POPULAR
        .iter()
        .map(|(iata_code, name, city_name, country_name)| Airport {
            iata_code: (*iata_code).to_string(),
            name: (*name).to_string(),
            city_name: (*city_name).to_string(),
            country_name: (*country_name).to_string(),
        })
        .collect()
}
