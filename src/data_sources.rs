//! Request building for external macroeconomic and market data providers.
//!
//! Providers form a closed set ([`SourceKind`]); each request variant of
//! [`DataRequest`] carries that provider's parameters and knows how to build
//! its URL. Credentials live in an immutable [`ApiCredentials`] value that a
//! [`DataOrchestrator`] checks once, at construction, against every request
//! it will issue.
//!
//! Sending requests requires the `fetch` feature.

use crate::errors::{SignalAnalysisError, SignalResult};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder value shipped in sample configurations
pub const CREDENTIAL_PLACEHOLDER: &str = "YOUR_API_KEY";

/// Per-request timeout in seconds
#[cfg(feature = "fetch")]
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    /// Trading Economics indicators
    TradingEconomics,
    /// World Bank indicators
    WorldBank,
    /// US Bureau of Economic Analysis
    Bea,
    /// Financial Modeling Prep economic indicators
    FinancialModelingPrep,
    /// EOD Historical Data macro indicators
    EodHistoricalData,
    /// US Census economic time series
    CensusEconomic,
    /// Alpha Vantage market data
    AlphaVantage,
    /// OECD SDMX statistics
    Oecd,
    /// UN Comtrade trade flows
    UnComtrade,
    /// Eurostat statistics
    Eurostat,
}

impl SourceKind {
    /// Every provider, in a fixed order.
    pub const ALL: [SourceKind; 10] = [
        SourceKind::TradingEconomics,
        SourceKind::WorldBank,
        SourceKind::Bea,
        SourceKind::FinancialModelingPrep,
        SourceKind::EodHistoricalData,
        SourceKind::CensusEconomic,
        SourceKind::AlphaVantage,
        SourceKind::Oecd,
        SourceKind::UnComtrade,
        SourceKind::Eurostat,
    ];

    /// Stable identifier.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::TradingEconomics => "trading_economics",
            SourceKind::WorldBank => "world_bank",
            SourceKind::Bea => "bea",
            SourceKind::FinancialModelingPrep => "financial_modeling_prep",
            SourceKind::EodHistoricalData => "eod_historical_data",
            SourceKind::CensusEconomic => "census_economic",
            SourceKind::AlphaVantage => "alpha_vantage",
            SourceKind::Oecd => "oecd",
            SourceKind::UnComtrade => "un_comtrade",
            SourceKind::Eurostat => "eurostat",
        }
    }

    /// Endpoint prefix.
    pub fn base_url(&self) -> &'static str {
        match self {
            SourceKind::TradingEconomics => "https://api.tradingeconomics.com/indicators",
            SourceKind::WorldBank => "http://api.worldbank.org/v2/country/all/indicator/",
            SourceKind::Bea => "https://apps.bea.gov/api/data/",
            SourceKind::FinancialModelingPrep => "https://financialmodelingprep.com/api/v3/",
            SourceKind::EodHistoricalData => "https://eodhistoricaldata.com/api/macro-indicator/",
            SourceKind::CensusEconomic => "https://api.census.gov/data/",
            SourceKind::AlphaVantage => "https://www.alphavantage.co/query",
            SourceKind::Oecd => "https://stats.oecd.org/SDMX-JSON/data/",
            SourceKind::UnComtrade => "https://comtrade.un.org/api/get",
            SourceKind::Eurostat => {
                "https://ec.europa.eu/eurostat/api/dissemination/statistics/1.0/data/"
            }
        }
    }

    /// True if requests embed an API key.
    pub fn requires_credential(&self) -> bool {
        matches!(
            self,
            SourceKind::TradingEconomics
                | SourceKind::Bea
                | SourceKind::FinancialModelingPrep
                | SourceKind::EodHistoricalData
                | SourceKind::AlphaVantage
        )
    }

    /// Environment variable read by [`ApiCredentials::from_env`].
    pub fn env_var(&self) -> &'static str {
        match self {
            SourceKind::TradingEconomics => "TRADING_ECONOMICS_API_KEY",
            SourceKind::WorldBank => "WORLD_BANK_API_KEY",
            SourceKind::Bea => "BEA_API_KEY",
            SourceKind::FinancialModelingPrep => "FINANCIAL_MODELING_PREP_API_KEY",
            SourceKind::EodHistoricalData => "EOD_HISTORICAL_DATA_API_KEY",
            SourceKind::CensusEconomic => "CENSUS_ECONOMIC_API_KEY",
            SourceKind::AlphaVantage => "ALPHA_VANTAGE_API_KEY",
            SourceKind::Oecd => "OECD_API_KEY",
            SourceKind::UnComtrade => "UN_COMTRADE_API_KEY",
            SourceKind::Eurostat => "EUROSTAT_API_KEY",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// API keys per provider. Immutable once built.
#[derive(Clone, Default)]
pub struct ApiCredentials {
    keys: BTreeMap<SourceKind, String>,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys stay out of logs
        f.debug_set().entries(self.keys.keys()).finish()
    }
}

impl ApiCredentials {
    /// Empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` stored for `kind`.
    pub fn with_key(mut self, kind: SourceKind, key: impl Into<String>) -> Self {
        self.keys.insert(kind, key.into());
        self
    }

    /// Reads every provider's key from its environment variable.
    pub fn from_env() -> Self {
        let keys = SourceKind::ALL
            .iter()
            .filter_map(|kind| std::env::var(kind.env_var()).ok().map(|key| (*kind, key)))
            .collect();
        Self { keys }
    }

    /// Usable key for `kind`. Empty values and the placeholder count as unset.
    pub fn key(&self, kind: SourceKind) -> Option<&str> {
        self.keys
            .get(&kind)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty() && *k != CREDENTIAL_PLACEHOLDER)
    }

    /// Like [`key`](Self::key) but fails with `Configuration` when unset.
    pub fn require(&self, kind: SourceKind) -> SignalResult<&str> {
        self.key(kind).ok_or_else(|| SignalAnalysisError::Configuration {
            reason: format!(
                "missing API key for {} (set {})",
                kind.name(),
                kind.env_var()
            ),
        })
    }
}

/// A request to one provider with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRequest {
    /// Indicator series
    TradingEconomics {
        /// Indicator name, e.g. `GDP`
        indicator: String,
    },
    /// Indicator series for all countries
    WorldBank {
        /// Indicator code, e.g. `NY.GDP.MKTP.CD`
        indicator: String,
    },
    /// National accounts table
    Bea {
        /// Dataset name, e.g. `NIPA`
        dataset: String,
        /// Table name, e.g. `T10101`
        table_name: String,
    },
    /// Economic indicator
    FinancialModelingPrep {
        /// Indicator name, e.g. `gdp`
        indicator: String,
    },
    /// Macro indicators of one country
    EodHistoricalData {
        /// Country code, e.g. `US`
        country: String,
    },
    /// Economic time series
    CensusEconomic {
        /// Dataset path, e.g. `timeseries/eits`
        dataset: String,
    },
    /// Market time series
    AlphaVantage {
        /// API function, e.g. `TIME_SERIES_DAILY`
        function: String,
        /// Ticker symbol
        symbol: String,
    },
    /// SDMX dataset slice
    Oecd {
        /// Dataset, e.g. `QNA`
        dataset: String,
        /// Location code, e.g. `USA`
        location: String,
    },
    /// Trade flows
    UnComtrade {
        /// Reporting area
        reporter: String,
        /// Partner area
        partner: String,
        /// `import` or `export`
        trade_flow: String,
    },
    /// Statistics dataset
    Eurostat {
        /// Dataset code, e.g. `nama_10_gdp`
        dataset: String,
    },
}

impl DataRequest {
    /// Provider addressed by this request.
    pub fn kind(&self) -> SourceKind {
        match self {
            DataRequest::TradingEconomics { .. } => SourceKind::TradingEconomics,
            DataRequest::WorldBank { .. } => SourceKind::WorldBank,
            DataRequest::Bea { .. } => SourceKind::Bea,
            DataRequest::FinancialModelingPrep { .. } => SourceKind::FinancialModelingPrep,
            DataRequest::EodHistoricalData { .. } => SourceKind::EodHistoricalData,
            DataRequest::CensusEconomic { .. } => SourceKind::CensusEconomic,
            DataRequest::AlphaVantage { .. } => SourceKind::AlphaVantage,
            DataRequest::Oecd { .. } => SourceKind::Oecd,
            DataRequest::UnComtrade { .. } => SourceKind::UnComtrade,
            DataRequest::Eurostat { .. } => SourceKind::Eurostat,
        }
    }

    /// Request with the customary default parameters for `kind`.
    pub fn default_for(kind: SourceKind) -> Self {
        let s = |v: &str| v.to_string();
        match kind {
            SourceKind::TradingEconomics => DataRequest::TradingEconomics { indicator: s("GDP") },
            SourceKind::WorldBank => DataRequest::WorldBank {
                indicator: s("NY.GDP.MKTP.CD"),
            },
            SourceKind::Bea => DataRequest::Bea {
                dataset: s("NIPA"),
                table_name: s("T10101"),
            },
            SourceKind::FinancialModelingPrep => {
                DataRequest::FinancialModelingPrep { indicator: s("gdp") }
            }
            SourceKind::EodHistoricalData => DataRequest::EodHistoricalData { country: s("US") },
            SourceKind::CensusEconomic => DataRequest::CensusEconomic {
                dataset: s("timeseries/eits"),
            },
            SourceKind::AlphaVantage => DataRequest::AlphaVantage {
                function: s("TIME_SERIES_DAILY"),
                symbol: s("SPY"),
            },
            SourceKind::Oecd => DataRequest::Oecd {
                dataset: s("QNA"),
                location: s("USA"),
            },
            SourceKind::UnComtrade => DataRequest::UnComtrade {
                reporter: s("all"),
                partner: s("world"),
                trade_flow: s("import"),
            },
            SourceKind::Eurostat => DataRequest::Eurostat {
                dataset: s("nama_10_gdp"),
            },
        }
    }

    /// One default request per provider.
    pub fn defaults() -> Vec<Self> {
        SourceKind::ALL.iter().map(|&kind| Self::default_for(kind)).collect()
    }

    fn parameters(&self) -> Vec<&str> {
        match self {
            DataRequest::TradingEconomics { indicator }
            | DataRequest::WorldBank { indicator }
            | DataRequest::FinancialModelingPrep { indicator } => vec![indicator],
            DataRequest::EodHistoricalData { country } => vec![country],
            DataRequest::CensusEconomic { dataset } | DataRequest::Eurostat { dataset } => {
                vec![dataset]
            }
            DataRequest::Bea { dataset, table_name } => vec![dataset, table_name],
            DataRequest::AlphaVantage { function, symbol } => vec![function, symbol],
            DataRequest::Oecd { dataset, location } => vec![dataset, location],
            DataRequest::UnComtrade {
                reporter,
                partner,
                trade_flow,
            } => vec![reporter, partner, trade_flow],
        }
    }

    /// Builds the request URL against the provider's public endpoint.
    ///
    /// Parameters are inserted verbatim, so they are restricted to URL-safe
    /// characters (`A-Z a-z 0-9 - . _ ~ /`).
    ///
    /// # Errors
    /// `Configuration` if a required key is unset or a parameter is empty or
    /// contains other characters.
    pub fn url(&self, credentials: &ApiCredentials) -> SignalResult<String> {
        self.url_with_base(self.kind().base_url(), credentials)
    }

    /// Like [`url`](Self::url) with `base` in place of [`SourceKind::base_url`].
    pub fn url_with_base(&self, base: &str, credentials: &ApiCredentials) -> SignalResult<String> {
        let kind = self.kind();
        for value in self.parameters() {
            validate_url_component(kind, value)?;
        }

        let url = match self {
            DataRequest::TradingEconomics { indicator } => {
                let key = credentials.require(kind)?;
                format!("{}/{}?c={}&f=json", base, indicator, key)
            }
            DataRequest::WorldBank { indicator } => format!("{}{}?format=json", base, indicator),
            DataRequest::Bea { dataset, table_name } => {
                let key = credentials.require(kind)?;
                format!(
                    "{}?UserID={}&method=GetData&datasetname={}&TableName={}&ResultFormat=JSON",
                    base, key, dataset, table_name
                )
            }
            DataRequest::FinancialModelingPrep { indicator } => {
                let key = credentials.require(kind)?;
                format!("{}economic-indicator/{}?apikey={}", base, indicator, key)
            }
            DataRequest::EodHistoricalData { country } => {
                let key = credentials.require(kind)?;
                format!("{}{}?api_token={}&fmt=json", base, country, key)
            }
            DataRequest::CensusEconomic { dataset } | DataRequest::Eurostat { dataset } => {
                format!("{}{}", base, dataset)
            }
            DataRequest::AlphaVantage { function, symbol } => {
                let key = credentials.require(kind)?;
                format!("{}?function={}&symbol={}&apikey={}", base, function, symbol, key)
            }
            DataRequest::Oecd { dataset, location } => format!("{}{}/{}", base, dataset, location),
            DataRequest::UnComtrade {
                reporter,
                partner,
                trade_flow,
            } => format!(
                "{}?max=5&type=C&freq=A&px=HS&ps=latest&r={}&p={}&rg={}&cc=AG2&fmt=json",
                base, reporter, partner, trade_flow
            ),
        };
        Ok(url)
    }
}

fn validate_url_component(kind: SourceKind, value: &str) -> SignalResult<()> {
    let safe = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '/');
    if value.is_empty() || !value.chars().all(safe) {
        return Err(SignalAnalysisError::Configuration {
            reason: format!("invalid request parameter '{}' for {}", value, kind.name()),
        });
    }
    Ok(())
}

/// Issues a fixed set of requests with validated credentials.
#[derive(Debug, Clone)]
pub struct DataOrchestrator {
    credentials: ApiCredentials,
    requests: Vec<DataRequest>,
    base_urls: BTreeMap<SourceKind, String>,
    #[cfg(feature = "fetch")]
    client: reqwest::blocking::Client,
}

impl DataOrchestrator {
    /// Builds the orchestrator, resolving every request URL up front.
    ///
    /// # Errors
    /// `Configuration` naming the first request whose key is missing or whose
    /// parameters are invalid.
    pub fn new(credentials: ApiCredentials, requests: Vec<DataRequest>) -> SignalResult<Self> {
        for request in &requests {
            request.url(&credentials)?;
        }

        Ok(Self {
            credentials,
            requests,
            base_urls: BTreeMap::new(),
            #[cfg(feature = "fetch")]
            client: reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .map_err(|e| SignalAnalysisError::Configuration {
                    reason: format!("HTTP client setup failed: {}", e),
                })?,
        })
    }

    /// Orchestrator over [`DataRequest::defaults`].
    pub fn with_defaults(credentials: ApiCredentials) -> SignalResult<Self> {
        Self::new(credentials, DataRequest::defaults())
    }

    /// Sends requests for `kind` to `base_url` instead of the public
    /// endpoint, e.g. a mirror or proxy. The rest of the URL is unchanged.
    pub fn with_base_url(mut self, kind: SourceKind, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(kind, base_url.into());
        self
    }

    /// Configured requests.
    pub fn requests(&self) -> &[DataRequest] {
        &self.requests
    }

    fn resolve(&self, request: &DataRequest) -> SignalResult<String> {
        let kind = request.kind();
        let base = self
            .base_urls
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.base_url());
        request.url_with_base(base, &self.credentials)
    }

    /// Resolved URL of every request.
    pub fn urls(&self) -> SignalResult<Vec<(SourceKind, String)>> {
        self.requests
            .iter()
            .map(|r| Ok((r.kind(), self.resolve(r)?)))
            .collect()
    }

    /// Performs one request and parses the JSON body.
    ///
    /// # Errors
    /// `HttpStatus` for any status other than 200, `RequestFailed` for
    /// transport or decoding failures.
    #[cfg(feature = "fetch")]
    pub fn fetch(&self, request: &DataRequest) -> SignalResult<serde_json::Value> {
        let url = self.resolve(request)?;
        log::debug!("fetching {} data", request.kind());

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SignalAnalysisError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SignalAnalysisError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .map_err(|e| SignalAnalysisError::RequestFailed {
                url,
                reason: e.to_string(),
            })
    }

    /// Performs every request; a failure is recorded and the rest still run.
    #[cfg(feature = "fetch")]
    pub fn fetch_all(&self) -> Vec<(SourceKind, SignalResult<serde_json::Value>)> {
        self.requests
            .iter()
            .map(|request| {
                let result = self.fetch(request);
                if let Err(e) = &result {
                    log::warn!("{} request failed: {}", request.kind(), e);
                }
                (request.kind(), result)
            })
            .collect()
    }
}
