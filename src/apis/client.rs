/// Upstream HTTP client
///
/// One authenticated GET per logical call, JSON body returned as an untyped
/// `serde_json::Value`. No retries: a failed attempt is surfaced immediately.
use super::params::QueryParams;
use crate::constants::AUTH_QUERY_PARAM;
use crate::errors::{PluginError, PluginResult};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

/// Anything that can answer an authenticated GET with a JSON body
///
/// Implemented by [`HttpUpstream`] for real traffic and by the caching
/// wrapper in `crate::cache`, which is transparent to callers.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get_json(&self, path: &str, api_key: &str, params: &QueryParams)
        -> PluginResult<Value>;
}

/// reqwest-backed upstream client
pub struct HttpUpstream {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpUpstream {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, String> {
        if timeout_secs == 0 {
            return Err("Timeout must be greater than zero".to_string());
        }
        Url::parse(base_url).map_err(|e| format!("Invalid base URL '{}': {}", base_url, e))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base + path, then the auth parameter followed by caller parameters
    pub fn build_url(
        &self,
        path: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> PluginResult<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        let mut url = Url::parse(&joined).map_err(|e| {
            PluginError::Configuration(format!("Invalid upstream URL '{}': {}", joined, e))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(AUTH_QUERY_PARAM, api_key);
            for (name, value) in params.iter() {
                query.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_json(
        &self,
        path: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> PluginResult<Value> {
        let url = self.build_url(path, api_key, params)?;
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                logger::warning(
                    LogTag::Api,
                    &format!("GET {} failed after {}ms: {}", path, start.elapsed().as_millis(), err),
                );
                return Err(PluginError::from(err.without_url()));
            }
        };

        let status = response.status();
        logger::debug(
            LogTag::Api,
            &format!(
                "GET {}?{} -> {} in {}ms",
                path,
                params.canonical_query(),
                status.as_u16(),
                start.elapsed().as_millis()
            ),
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PluginError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PluginError::from(e.without_url()))?;
        logger::verbose(
            LogTag::Api,
            &format!("{} body: {}", path, String::from_utf8_lossy(&bytes)),
        );

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_appends_token_and_params() {
        let client = HttpUpstream::new("https://finnhub.io/api/v1/", 10).unwrap();
        let params = QueryParams::new().with("symbol", "AAPL");
        let url = client.build_url("/quote", "secret", &params).unwrap();
        assert_eq!(
            url.as_str(),
            "https://finnhub.io/api/v1/quote?token=secret&symbol=AAPL"
        );
    }

    #[test]
    fn test_build_url_without_params() {
        let client = HttpUpstream::new("https://finnhub.io/api/v1", 10).unwrap();
        let url = client.build_url("stock/peers", "", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://finnhub.io/api/v1/stock/peers?token=");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(HttpUpstream::new("https://finnhub.io/api/v1", 0).is_err());
        assert!(HttpUpstream::new("not a url", 10).is_err());
    }

    #[cfg(feature = "web")]
    mod live {
        use super::*;
        use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
        use std::collections::HashMap;

        async fn spawn_server() -> String {
            let app = Router::new()
                .route(
                    "/quote",
                    get(|Query(q): Query<HashMap<String, String>>| async move {
                        Json(serde_json::json!({
                            "c": 150.0,
                            "token_seen": q.get("token").cloned().unwrap_or_default(),
                            "symbol_seen": q.get("symbol").cloned().unwrap_or_default(),
                        }))
                    }),
                )
                .route(
                    "/limited",
                    get(|| async { (StatusCode::TOO_MANY_REQUESTS, "API limit reached") }),
                )
                .route("/garbage", get(|| async { "not json" }));

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{}", addr)
        }

        #[tokio::test]
        async fn test_success_returns_parsed_body() {
            let base = spawn_server().await;
            let client = HttpUpstream::new(&base, 5).unwrap();
            let params = QueryParams::new().with("symbol", "AAPL");

            let body = client.get_json("/quote", "k1", &params).await.unwrap();
            assert_eq!(body["c"], 150.0);
            assert_eq!(body["token_seen"], "k1");
            assert_eq!(body["symbol_seen"], "AAPL");
        }

        #[tokio::test]
        async fn test_non_success_status_is_upstream_error() {
            let base = spawn_server().await;
            let client = HttpUpstream::new(&base, 5).unwrap();

            let err = client
                .get_json("/limited", "k1", &QueryParams::new())
                .await
                .unwrap_err();
            assert_eq!(
                err,
                PluginError::Upstream {
                    status: 429,
                    body: "API limit reached".to_string()
                }
            );
        }

        #[tokio::test]
        async fn test_unparseable_body_is_transport_error() {
            let base = spawn_server().await;
            let client = HttpUpstream::new(&base, 5).unwrap();

            let err = client
                .get_json("/garbage", "k1", &QueryParams::new())
                .await
                .unwrap_err();
            assert!(matches!(err, PluginError::Transport(_)));
        }

        #[tokio::test]
        async fn test_unreachable_host_is_transport_error() {
            // Bind then drop to get a port nobody listens on
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let client = HttpUpstream::new(&format!("http://{}", addr), 5).unwrap();
            let err = client
                .get_json("/quote", "k1", &QueryParams::new())
                .await
                .unwrap_err();
            assert!(matches!(err, PluginError::Transport(_)));
        }
    }
}
