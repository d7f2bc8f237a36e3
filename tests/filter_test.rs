mod common;

use common::{fixture_flights, ids, test_flight};
use time::macros::datetime;

use farescope::filter::{
    extract_filter_options, filter_flights, filters_from_query, filters_to_query,
    has_active_filters, sort_flights,
};
use farescope::models::{FilterState, SortConfig, SortDirection, SortField};

#[test]
fn unrestricted_filters_keep_every_flight_in_order() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);
    let filtered = filter_flights(&flights, &options.unrestricted_filters());
    assert_eq!(ids(&filtered), vec!["1", "2", "3", "4"]);
}

#[test]
fn stops_filter_matches_through_the_two_plus_bucket() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let mut filters = options.unrestricted_filters();
    filters.stops = vec![2];
    // Flight 4 has 3 stops and still lands in the "2+" bucket.
    assert_eq!(ids(&filter_flights(&flights, &filters)), vec!["3", "4"]);

    filters.stops = vec![0, 1];
    assert_eq!(ids(&filter_flights(&flights, &filters)), vec!["1", "2"]);
}

#[test]
fn price_bounds_are_inclusive() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let mut filters = options.unrestricted_filters();
    filters.price_range = (180.5, 310.0);
    assert_eq!(ids(&filter_flights(&flights, &filters)), vec!["1", "2", "4"]);
}

#[test]
fn airline_filter_matches_by_code() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let mut filters = options.unrestricted_filters();
    filters.airlines = vec!["DL".to_string()];
    assert_eq!(ids(&filter_flights(&flights, &filters)), vec!["1", "4"]);
}

#[test]
fn departure_window_is_inclusive_at_both_ends() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let mut filters = options.unrestricted_filters();
    // 06:30 through 08:00, the exact departure minutes of flights 2 and 1
    filters.departure_time_range = (390, 480);
    assert_eq!(ids(&filter_flights(&flights, &filters)), vec!["1", "2"]);
}

#[test]
fn predicates_are_conjunctive() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let mut filters = options.unrestricted_filters();
    filters.stops = vec![2];
    filters.airlines = vec!["DL".to_string()];
    assert_eq!(ids(&filter_flights(&flights, &filters)), vec!["4"]);
}

#[test]
fn sort_by_price_both_directions() {
    let flights = fixture_flights();

    let asc = sort_flights(
        &flights,
        &SortConfig {
            field: SortField::Price,
            direction: SortDirection::Asc,
        },
    );
    assert_eq!(ids(&asc), vec!["2", "1", "4", "3"]);

    let desc = sort_flights(
        &flights,
        &SortConfig {
            field: SortField::Price,
            direction: SortDirection::Desc,
        },
    );
    assert_eq!(ids(&desc), vec!["3", "4", "1", "2"]);

    // The input sequence is never mutated.
    assert_eq!(ids(&flights), vec!["1", "2", "3", "4"]);
}

#[test]
fn equal_keys_keep_input_order() {
    let twin = |id: &str| {
        test_flight(
            id,
            "DL",
            "Delta Air Lines",
            250.0,
            0,
            datetime!(2026-09-14 08:00:00),
            datetime!(2026-09-14 11:15:00),
            375,
        )
    };
    let flights = vec![twin("a"), twin("b"), twin("c")];

    let sorted = sort_flights(&flights, &SortConfig::default());
    assert_eq!(ids(&sorted), vec!["a", "b", "c"]);

    // Sorting an already sorted sequence changes nothing.
    let again = sort_flights(&sorted, &SortConfig::default());
    assert_eq!(sorted, again);
}

#[test]
fn sort_by_remaining_fields() {
    let flights = fixture_flights();

    let by_duration = sort_flights(
        &flights,
        &SortConfig {
            field: SortField::Duration,
            direction: SortDirection::Asc,
        },
    );
    assert_eq!(ids(&by_duration), vec!["1", "2", "3", "4"]);

    let by_departure = sort_flights(
        &flights,
        &SortConfig {
            field: SortField::DepartureTime,
            direction: SortDirection::Desc,
        },
    );
    assert_eq!(ids(&by_departure), vec!["4", "3", "1", "2"]);

    // Airline orders by display name, so American < Delta < United.
    let by_airline = sort_flights(
        &flights,
        &SortConfig {
            field: SortField::Airline,
            direction: SortDirection::Asc,
        },
    );
    assert_eq!(ids(&by_airline), vec!["2", "1", "4", "3"]);
}

#[test]
fn options_aggregate_counts_and_bounds() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let names: Vec<_> = options
        .airlines
        .iter()
        .map(|a| (a.code.as_str(), a.count))
        .collect();
    assert_eq!(names, vec![("AA", 1), ("DL", 2), ("UA", 1)]);

    let stops: Vec<_> = options
        .stop_options
        .iter()
        .map(|s| (s.value, s.count))
        .collect();
    assert_eq!(stops, vec![(0, 1), (1, 1), (2, 2)]);

    assert_eq!(options.price_min, 180.0);
    assert_eq!(options.price_max, 420.0);
    assert_eq!(options.departure_time_min, 390);
    assert_eq!(options.departure_time_max, 1330);
}

#[test]
fn active_filter_detection() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);
    let unrestricted = options.unrestricted_filters();

    assert!(!has_active_filters(&unrestricted, Some(&options)));
    assert!(!has_active_filters(&unrestricted, None));

    let mut narrowed = unrestricted.clone();
    narrowed.price_range.1 = 300.0;
    assert!(has_active_filters(&narrowed, Some(&options)));

    let mut narrowed = unrestricted.clone();
    narrowed.stops = vec![0];
    assert!(has_active_filters(&narrowed, Some(&options)));

    let mut narrowed = unrestricted.clone();
    narrowed.airlines = vec!["DL".to_string()];
    assert!(has_active_filters(&narrowed, Some(&options)));

    let mut narrowed = unrestricted;
    narrowed.departure_time_range.0 = 400;
    assert!(has_active_filters(&narrowed, Some(&options)));
}

#[test]
fn query_serialization_round_trips() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let filters = FilterState {
        stops: vec![0, 2],
        price_range: (200.0, 400.0),
        airlines: vec!["DL".to_string(), "AA".to_string()],
        departure_time_range: (360, 1200),
    };
    let sort = SortConfig {
        field: SortField::DepartureTime,
        direction: SortDirection::Desc,
    };

    let params = filters_to_query(&filters, &sort);
    let lookup = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(lookup("stops"), Some("0,2"));
    assert_eq!(lookup("priceMin"), Some("200"));
    assert_eq!(lookup("priceMax"), Some("400"));
    assert_eq!(lookup("airlines"), Some("DL,AA"));
    assert_eq!(lookup("depMin"), Some("360"));
    assert_eq!(lookup("depMax"), Some("1200"));
    assert_eq!(lookup("sort"), Some("departureTime"));
    assert_eq!(lookup("dir"), Some("desc"));

    let (restored, restored_sort) = filters_from_query(&params, &options);
    assert_eq!(restored, filters);
    assert_eq!(restored_sort, sort);
}

#[test]
fn unrestricted_dimensions_are_omitted_from_queries() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let params = filters_to_query(&options.unrestricted_filters(), &SortConfig::default());
    assert!(!params.iter().any(|(k, _)| k == "stops"));
    assert!(!params.iter().any(|(k, _)| k == "airlines"));
}

#[test]
fn garbage_query_values_fall_back_to_bounds_and_default_sort() {
    let flights = fixture_flights();
    let options = extract_filter_options(&flights);

    let params = vec![
        ("priceMin".to_string(), "cheap".to_string()),
        ("depMax".to_string(), "-".to_string()),
        ("sort".to_string(), "vibes".to_string()),
        ("dir".to_string(), "sideways".to_string()),
    ];
    let (filters, sort) = filters_from_query(&params, &options);

    assert_eq!(filters.price_range, (options.price_min, options.price_max));
    assert_eq!(
        filters.departure_time_range,
        (options.departure_time_min, options.departure_time_max)
    );
    assert!(filters.stops.is_empty());
    assert!(filters.airlines.is_empty());
    assert_eq!(sort, SortConfig::default());
}
