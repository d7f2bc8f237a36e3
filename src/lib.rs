//! farescope: flight fare search core.
//!
//! A pure filter/sort/aggregation engine over normalized flight offers
//! plus a throttled, token-caching client for an Amadeus-shaped
//! flight-data API. Rendering and routing belong to the embedding
//! application; this crate only produces the data they consume.

pub mod airports; // Static popular-airports table
pub mod client; // Provider access layer: token, throttle, retry
pub mod codec; // Duration and time-of-day codecs
pub mod config; // Configuration management
pub mod error; // Error types and handling
pub mod filter; // Filter & sort engine
pub mod mapper; // Raw offer to domain Flight mapping
pub mod models; // Data structures and types
pub mod provider; // Raw provider wire types
pub mod recent; // Recent-search history
pub mod trend; // Price-trend aggregation

// Re-export key types for convenience
pub use client::{AmadeusClient, HttpTransport, Notifier, RawResponse, Severity};
pub use config::ClientConfig;
pub use error::ApiError;
pub use filter::{
    extract_filter_options, filter_flights, filters_from_query, filters_to_query,
    has_active_filters, sort_flights, FilterOptions,
};
pub use models::{
    Airport, ChartDataPoint, FilterState, Flight, FlightSegment, SearchQuery, SortConfig,
    SortDirection, SortField, TravelClass, TrendRange,
};
pub use trend::PriceTrend;
