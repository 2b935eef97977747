/// Upstream market-data access
///
/// Structure:
/// - `params` - canonical query parameter set
/// - `client` - `Upstream` trait and the reqwest-backed implementation
/// - `finnhub` - typed endpoint wrappers and response types
pub mod client;
pub mod finnhub;
pub mod params;

pub use client::{HttpUpstream, Upstream};
pub use finnhub::FinnhubApi;
pub use params::QueryParams;
