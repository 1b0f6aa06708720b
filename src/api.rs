//! Synchronous client for the **disease.sh v3 COVID-19 API**.
//!
//! Global and country fetches never fail from the caller's point of view: when the
//! API is unreachable or returns something unreadable the client logs the problem and
//! hands back a static backup (see [`crate::backup`]). Region fetches fall back to
//! [`RegionSynthesizer`] instead.
//!
//! ### Notes
//! - Only the US has an authoritative sub-national endpoint (`/states`); every other
//!   country is synthesized.
//! - Network timeouts use a sane default (30s). Transient failures (5xx / network)
//!   are retried a few times with a short backoff; 4xx responses are not.
//! - The `try_*` methods expose the raw [`FetchError`] for callers that want it.
//!
//! Typical usage:
//! ```no_run
//! # use covid_dash::Client;
//! let client = Client::default();
//! let global = client.fetch_global();
//! let countries = client.fetch_countries();
//! println!("{} countries, live = {}", countries.data.len(), global.origin.is_live());
//! ```
use crate::backup::{backup_countries, backup_global};
use crate::models::{
    ApiCountry, ApiRegion, CountryRecord, Fetched, GlobalSnapshot, RegionRecord,
};
use crate::synth::RegionSynthesizer;
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

/// Failure of a single API request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not parse response from {url}: {message}")]
    Parse { url: String, message: String },
}

/// Authoritative sub-national endpoint for a country, if any.
pub fn region_endpoint(iso: Option<&str>) -> Option<&'static str> {
    match iso?.to_ascii_uppercase().as_str() {
        "US" => Some("/states"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
    backoff_ms: Vec<u64>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Client {
    /// Client against a different API root (mirrors, local test servers).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("covid_dash/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .unwrap_or_else(|err| {
                log::warn!("falling back to default http client: {err}");
                HttpClient::new()
            });
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            backoff_ms: vec![100, 300, 700],
        }
    }

    /// Replace the retry schedule. One attempt is made per entry.
    pub fn with_backoff(mut self, backoff_ms: Vec<u64>) -> Self {
        self.backoff_ms = if backoff_ms.is_empty() {
            vec![0]
        } else {
            backoff_ms
        };
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Small retry for transient failures (5xx / network errors)
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut last_err: Option<FetchError> = None;
        for &backoff_ms in &self.backoff_ms {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    return r.json().map_err(|e| FetchError::Parse {
                        url: url.to_string(),
                        message: e.to_string(),
                    });
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(FetchError::Status {
                        url: url.to_string(),
                        status: r.status(),
                    });
                }
                Ok(r) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: r.status(),
                    });
                }
                Err(e) => {
                    last_err = Some(FetchError::Network {
                        url: url.to_string(),
                        source: e,
                    })
                }
            }
            log::debug!("retrying {url} in {backoff_ms}ms");
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(last_err.unwrap_or_else(|| FetchError::Parse {
            url: url.to_string(),
            message: "no request attempted".into(),
        }))
    }

    /// `GET /all`, errors surfaced.
    pub fn try_fetch_global(&self) -> Result<GlobalSnapshot, FetchError> {
        let url = self.url("/all");
        let v = self.get_json(&url)?;
        parse_global(&v).map_err(|message| FetchError::Parse { url, message })
    }

    /// `GET /countries`, errors surfaced.
    pub fn try_fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.url("/countries");
        let v = self.get_json(&url)?;
        parse_countries(&v).map_err(|message| FetchError::Parse { url, message })
    }

    /// Fetch authoritative regions for `country`. `Ok(None)` means the country
    /// has no sub-national endpoint.
    pub fn try_fetch_regions(
        &self,
        country: &CountryRecord,
    ) -> Result<Option<Vec<RegionRecord>>, FetchError> {
        let Some(path) = region_endpoint(country.iso_code.as_deref()) else {
            return Ok(None);
        };
        let url = self.url(path);
        let v = self.get_json(&url)?;
        parse_regions(&v)
            .map(Some)
            .map_err(|message| FetchError::Parse { url, message })
    }

    /// Global snapshot, or the backup snapshot if the fetch fails.
    pub fn fetch_global(&self) -> Fetched<GlobalSnapshot> {
        match self.try_fetch_global() {
            Ok(g) => Fetched::live(g),
            Err(err) => {
                log::warn!("error fetching global data, using backup: {err}");
                Fetched::backup(backup_global(), err.to_string())
            }
        }
    }

    /// All countries, or the 5-entry backup list if the fetch fails or is empty.
    pub fn fetch_countries(&self) -> Fetched<Vec<CountryRecord>> {
        match self.try_fetch_countries() {
            Ok(countries) if !countries.is_empty() => Fetched::live(countries),
            Ok(_) => {
                log::warn!("countries endpoint returned no rows, using backup");
                Fetched::backup(backup_countries(), "empty country list")
            }
            Err(err) => {
                log::warn!("error fetching countries data, using backup: {err}");
                Fetched::backup(backup_countries(), err.to_string())
            }
        }
    }

    /// Regions of `country`: authoritative when available, synthesized otherwise.
    pub fn fetch_regions(
        &self,
        country: &CountryRecord,
        synth: &mut RegionSynthesizer,
    ) -> Fetched<Vec<RegionRecord>> {
        let reason = match self.try_fetch_regions(country) {
            Ok(Some(regions)) if !regions.is_empty() => {
                log::info!("{} regions loaded for {}", regions.len(), country.name);
                return Fetched::live(regions);
            }
            Ok(Some(_)) => Some(format!("no regions returned for {}", country.name)),
            Ok(None) => None,
            Err(err) => {
                log::warn!("error fetching regions for {}: {err}", country.name);
                Some(err.to_string())
            }
        };
        let regions = synth.synthesize(country);
        log::debug!("synthesized {} regions for {}", regions.len(), country.name);
        Fetched::synthesized(regions, reason)
    }
}

/// Parse the `/all` payload.
pub fn parse_global(v: &Value) -> Result<GlobalSnapshot, String> {
    if !v.is_object() {
        return Err("unexpected response shape: not an object".into());
    }
    if let Some(message) = v.get("message").and_then(Value::as_str) {
        return Err(format!("api error: {message}"));
    }
    serde_json::from_value(v.clone()).map_err(|e| format!("parse global: {e}"))
}

/// Parse the `/countries` payload, keeping API order. Rows that cannot be
/// read are skipped; the payload only fails if rows exist and none parse.
pub fn parse_countries(v: &Value) -> Result<Vec<CountryRecord>, String> {
    let arr = v
        .as_array()
        .ok_or_else(|| "unexpected response shape: not a top-level array".to_string())?;
    let mut countries = Vec::with_capacity(arr.len());
    let mut skipped = 0usize;
    for entry in arr {
        match serde_json::from_value::<ApiCountry>(entry.clone()) {
            Ok(c) => countries.push(CountryRecord::from(c)),
            Err(e) => {
                log::warn!("skipping unreadable country row: {e}");
                skipped += 1;
            }
        }
    }
    if countries.is_empty() && skipped > 0 {
        return Err(format!("parse countries: none of {skipped} rows could be read"));
    }
    Ok(countries)
}

/// Parse the `/states` payload (a top-level array).
pub fn parse_regions(v: &Value) -> Result<Vec<RegionRecord>, String> {
    if !v.is_array() {
        return Err("unexpected response shape: not a top-level array".into());
    }
    let regions: Vec<ApiRegion> =
        serde_json::from_value(v.clone()).map_err(|e| format!("parse regions: {e}"))?;
    Ok(regions.into_iter().map(RegionRecord::from).collect())
}
