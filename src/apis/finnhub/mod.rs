/// Finnhub REST client
///
/// API Documentation: https://finnhub.io/docs/api
///
/// Endpoints implemented:
/// 1. /quote - Real-time quote
/// 2. /search - Symbol lookup
/// 3. /stock/profile2 - Company profile
/// 4. /stock/candle - OHLCV candles
/// 5. /company-news - Company news over a date window
/// 6. /news - General market news
/// 7. /stock/peers - Peer tickers
/// 8. /stock/metric - Basic financials
///
/// All calls go through an [`Upstream`], normally the caching wrapper, so
/// this layer only builds parameters and decodes bodies.
pub mod types;

pub use self::types::{
    Candle, CandleResponse, CompanyProfile, MetricsResponse, NewsArticle, Quote, Resolution,
    SearchMatch, SearchResponse,
};

use crate::apis::{QueryParams, Upstream};
use crate::constants::*;
use crate::errors::PluginResult;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct FinnhubApi {
    upstream: Arc<dyn Upstream>,
}

impl FinnhubApi {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        api_key: &str,
        params: QueryParams,
    ) -> PluginResult<T> {
        let body = self.upstream.get_json(path, api_key, &params).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Undecoded `/quote` body, as served by the REST facade
    pub async fn quote_raw(&self, api_key: &str, symbol: &str) -> PluginResult<Value> {
        self.upstream
            .get_json(ENDPOINT_QUOTE, api_key, &QueryParams::new().with("symbol", symbol))
            .await
    }

    pub async fn quote(&self, api_key: &str, symbol: &str) -> PluginResult<Quote> {
        Ok(serde_json::from_value(self.quote_raw(api_key, symbol).await?)?)
    }

    /// Undecoded `/search` body, as served by the REST facade
    pub async fn search_raw(&self, api_key: &str, query: &str) -> PluginResult<Value> {
        self.upstream
            .get_json(ENDPOINT_SEARCH, api_key, &QueryParams::new().with("q", query))
            .await
    }

    pub async fn search(&self, api_key: &str, query: &str) -> PluginResult<SearchResponse> {
        Ok(serde_json::from_value(self.search_raw(api_key, query).await?)?)
    }

    pub async fn profile(&self, api_key: &str, symbol: &str) -> PluginResult<CompanyProfile> {
        self.fetch(
            ENDPOINT_PROFILE,
            api_key,
            QueryParams::new().with("symbol", symbol),
        )
        .await
    }

    /// Candles between two unix timestamps (seconds, inclusive)
    pub async fn candles(
        &self,
        api_key: &str,
        symbol: &str,
        resolution: Resolution,
        from: i64,
        to: i64,
    ) -> PluginResult<CandleResponse> {
        self.fetch(
            ENDPOINT_CANDLES,
            api_key,
            QueryParams::new()
                .with("symbol", symbol)
                .with("resolution", resolution)
                .with("from", from)
                .with("to", to),
        )
        .await
    }

    pub async fn company_news(
        &self,
        api_key: &str,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PluginResult<Vec<NewsArticle>> {
        self.fetch(
            ENDPOINT_COMPANY_NEWS,
            api_key,
            QueryParams::new()
                .with("symbol", symbol)
                .with("from", from.format("%Y-%m-%d"))
                .with("to", to.format("%Y-%m-%d")),
        )
        .await
    }

    pub async fn market_news(&self, api_key: &str, category: &str) -> PluginResult<Vec<NewsArticle>> {
        self.fetch(
            ENDPOINT_MARKET_NEWS,
            api_key,
            QueryParams::new().with("category", category),
        )
        .await
    }

    pub async fn peers(&self, api_key: &str, symbol: &str) -> PluginResult<Vec<String>> {
        self.fetch(
            ENDPOINT_PEERS,
            api_key,
            QueryParams::new().with("symbol", symbol),
        )
        .await
    }

    pub async fn metrics(&self, api_key: &str, symbol: &str) -> PluginResult<MetricsResponse> {
        self.fetch(
            ENDPOINT_METRICS,
            api_key,
            QueryParams::new()
                .with("symbol", symbol)
                .with("metric", "all"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PluginError;
    use crate::testing::StubUpstream;
    use serde_json::json;

    #[tokio::test]
    async fn test_candles_sends_window_and_resolution() {
        let stub = Arc::new(StubUpstream::fixed(json!({"s": "no_data"})));
        let api = FinnhubApi::new(stub.clone());

        let series = api
            .candles("k", "AAPL", Resolution::Week, 100, 200)
            .await
            .unwrap();
        assert!(!series.is_ok());

        let (path, params, key) = stub.recorded().remove(0);
        assert_eq!(path, ENDPOINT_CANDLES);
        assert_eq!(key, "k");
        assert_eq!(params.canonical_query(), "from=100&resolution=W&symbol=AAPL&to=200");
    }

    #[tokio::test]
    async fn test_company_news_formats_dates() {
        let stub = Arc::new(StubUpstream::fixed(json!([])));
        let api = FinnhubApi::new(stub.clone());
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        let articles = api.company_news("k", "MSFT", from, to).await.unwrap();
        assert!(articles.is_empty());

        let (_, params, _) = stub.recorded().remove(0);
        assert_eq!(params.get("from"), Some("2024-01-01"));
        assert_eq!(params.get("to"), Some("2024-01-08"));
    }

    #[tokio::test]
    async fn test_metrics_requests_all() {
        let stub = Arc::new(StubUpstream::fixed(json!({"metric": {"peTTM": 30.0}})));
        let api = FinnhubApi::new(stub.clone());

        let metrics = api.metrics("k", "AAPL").await.unwrap();
        assert_eq!(metrics.metric_f64("peTTM"), Some(30.0));
        assert_eq!(stub.recorded()[0].1.get("metric"), Some("all"));
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_transport_error() {
        let stub = Arc::new(StubUpstream::fixed(json!({"not": "a list"})));
        let api = FinnhubApi::new(stub);

        let err = api.peers("k", "AAPL").await.unwrap_err();
        assert!(matches!(err, PluginError::Transport(_)));
    }
}
