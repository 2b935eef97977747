/// Finnhub response types
///
/// Field names follow the wire format; every numeric field defaults so a
/// partial or empty object (`{}`) still parses and can be judged empty.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// QUOTE
// ============================================================================

/// Real-time quote from `/quote`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current price
    #[serde(default)]
    pub c: f64,
    /// Change
    #[serde(default)]
    pub d: Option<f64>,
    /// Percent change
    #[serde(default)]
    pub dp: Option<f64>,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub l: f64,
    #[serde(default)]
    pub o: f64,
    /// Previous close
    #[serde(default)]
    pub pc: f64,
    #[serde(default)]
    pub t: i64,
}

impl Quote {
    /// Unknown symbols come back as an all-zero quote rather than an error
    pub fn is_empty(&self) -> bool {
        self.c == 0.0 && self.h == 0.0 && self.l == 0.0 && self.o == 0.0 && self.pc == 0.0
    }

    pub fn change(&self) -> f64 {
        self.d.unwrap_or(self.c - self.pc)
    }

    pub fn percent_change(&self) -> f64 {
        match self.dp {
            Some(dp) => dp,
            None if self.pc != 0.0 => (self.c - self.pc) / self.pc * 100.0,
            None => 0.0,
        }
    }
}

// ============================================================================
// SYMBOL SEARCH
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub result: Vec<SearchMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_symbol: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

// ============================================================================
// COMPANY PROFILE
// ============================================================================

/// Company profile from `/stock/profile2`; unknown symbols return `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default, rename = "finnhubIndustry")]
    pub industry: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub currency: String,
    /// Millions of `currency`
    #[serde(default)]
    pub market_capitalization: f64,
    /// Millions of shares
    #[serde(default)]
    pub share_outstanding: f64,
    #[serde(default)]
    pub ipo: String,
    #[serde(default)]
    pub weburl: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub phone: String,
}

impl CompanyProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.ticker.is_empty()
    }
}

// ============================================================================
// CANDLES
// ============================================================================

/// Column-oriented candle series from `/stock/candle`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleResponse {
    #[serde(default)]
    pub c: Vec<f64>,
    #[serde(default)]
    pub h: Vec<f64>,
    #[serde(default)]
    pub l: Vec<f64>,
    #[serde(default)]
    pub o: Vec<f64>,
    #[serde(default)]
    pub v: Vec<f64>,
    #[serde(default)]
    pub t: Vec<i64>,
    /// `ok` or `no_data`
    #[serde(default)]
    pub s: String,
}

/// One row of a [`CandleResponse`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl CandleResponse {
    pub fn is_ok(&self) -> bool {
        self.s == "ok"
    }

    /// Row view, truncated to the shortest column
    pub fn candles(&self) -> Vec<Candle> {
        let len = [
            self.c.len(),
            self.h.len(),
            self.l.len(),
            self.o.len(),
            self.v.len(),
            self.t.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);

        (0..len)
            .map(|i| Candle {
                timestamp: self.t[i],
                open: self.o[i],
                high: self.h[i],
                low: self.l[i],
                close: self.c[i],
                volume: self.v[i],
            })
            .collect()
    }
}

/// Candle width accepted by `/stock/candle`
///
/// Deserializes through [`FromStr`], so `"d"` and `"D"` are both accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Resolution {
    #[serde(rename = "1")]
    OneMinute,
    #[serde(rename = "5")]
    FiveMinutes,
    #[serde(rename = "15")]
    FifteenMinutes,
    #[serde(rename = "30")]
    ThirtyMinutes,
    #[serde(rename = "60")]
    Hour,
    #[default]
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
}

impl Resolution {
    pub const ALL: [Resolution; 8] = [
        Resolution::OneMinute,
        Resolution::FiveMinutes,
        Resolution::FifteenMinutes,
        Resolution::ThirtyMinutes,
        Resolution::Hour,
        Resolution::Day,
        Resolution::Week,
        Resolution::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneMinute => "1",
            Resolution::FiveMinutes => "5",
            Resolution::FifteenMinutes => "15",
            Resolution::ThirtyMinutes => "30",
            Resolution::Hour => "60",
            Resolution::Day => "D",
            Resolution::Week => "W",
            Resolution::Month => "M",
        }
    }

    /// Intraday resolutions get a time column in rendered output
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Resolution::OneMinute
                | Resolution::FiveMinutes
                | Resolution::FifteenMinutes
                | Resolution::ThirtyMinutes
                | Resolution::Hour
        )
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid resolution '{}'", s))
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// NEWS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub category: String,
    /// Unix seconds
    #[serde(default)]
    pub datetime: i64,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
}

// ============================================================================
// BASIC FINANCIALS
// ============================================================================

/// `/stock/metric?metric=all`; only the flat `metric` map is used
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    #[serde(default)]
    pub metric: HashMap<String, Value>,
    #[serde(default)]
    pub metric_type: String,
    #[serde(default)]
    pub symbol: String,
}

impl MetricsResponse {
    pub fn metric_f64(&self, name: &str) -> Option<f64> {
        self.metric.get(name).and_then(Value::as_f64)
    }

    pub fn is_empty(&self) -> bool {
        self.metric.values().all(Value::is_null)
    }
}
