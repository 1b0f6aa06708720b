use serde::{Deserialize, Serialize};

/// Point-in-time worldwide aggregate returned by `GET /all`.
///
/// Every figure is optional: `None` means the API did not report it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSnapshot {
    #[serde(default, deserialize_with = "de_opt_count")]
    pub cases: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub deaths: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub recovered: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub active: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub critical: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub tests: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_cases: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_deaths: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_recovered: Option<u64>,
}

/// `countryInfo` block of a `/countries` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryInfo {
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub flag: Option<String>,
}

/// Raw entry from the `/countries` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountry {
    pub country: String,
    #[serde(default)]
    pub country_info: CountryInfo,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub cases: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub deaths: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub recovered: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub active: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_cases: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_deaths: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_recovered: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_metric")]
    pub cases_per_one_million: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_metric")]
    pub deaths_per_one_million: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_metric")]
    pub tests_per_one_million: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub population: Option<u64>,
}

/// Tidy country aggregate used by this crate. `name` is the unique key.
///
/// `recovered + active + deaths == cases` is not guaranteed; upstream data
/// regularly violates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub iso_code: Option<String>,
    pub flag_url: Option<String>,
    pub cases: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub today_cases: u64,
    pub today_deaths: u64,
    pub today_recovered: u64,
    pub cases_per_million: Option<f64>,
    pub deaths_per_million: Option<f64>,
    pub tests_per_million: Option<f64>,
    pub population: Option<u64>,
}

impl From<ApiCountry> for CountryRecord {
    fn from(c: ApiCountry) -> Self {
        Self {
            name: c.country,
            iso_code: c.country_info.iso2.filter(|s| !s.trim().is_empty()),
            flag_url: c.country_info.flag,
            cases: c.cases.unwrap_or(0),
            deaths: c.deaths.unwrap_or(0),
            recovered: c.recovered.unwrap_or(0),
            active: c.active.unwrap_or(0),
            today_cases: c.today_cases.unwrap_or(0),
            today_deaths: c.today_deaths.unwrap_or(0),
            today_recovered: c.today_recovered.unwrap_or(0),
            cases_per_million: c.cases_per_one_million,
            deaths_per_million: c.deaths_per_one_million,
            tests_per_million: c.tests_per_one_million,
            population: c.population.filter(|p| *p > 0),
        }
    }
}

/// Raw entry from the `/states` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegion {
    pub state: String,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub cases: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub deaths: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub recovered: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub active: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_cases: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub today_deaths: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub tests: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_metric")]
    pub cases_per_one_million: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_metric")]
    pub deaths_per_one_million: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_metric")]
    pub tests_per_one_million: Option<f64>,
}

/// Sub-national breakdown of a country, either authoritative (API) or
/// synthesized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub cases: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub today_cases: u64,
    pub today_deaths: u64,
    pub tests: u64,
    pub cases_per_million: Option<f64>,
    pub deaths_per_million: Option<f64>,
    pub tests_per_million: Option<f64>,
}

impl From<ApiRegion> for RegionRecord {
    fn from(r: ApiRegion) -> Self {
        Self {
            name: r.state,
            cases: r.cases.unwrap_or(0),
            deaths: r.deaths.unwrap_or(0),
            recovered: r.recovered.unwrap_or(0),
            active: r.active.unwrap_or(0),
            today_cases: r.today_cases.unwrap_or(0),
            today_deaths: r.today_deaths.unwrap_or(0),
            tests: r.tests.unwrap_or(0),
            cases_per_million: r.cases_per_one_million,
            deaths_per_million: r.deaths_per_one_million,
            tests_per_million: r.tests_per_one_million,
        }
    }
}

/// Where a payload came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Fetched from the remote API.
    Live,
    /// Static backup substituted after a failed fetch.
    Backup { reason: String },
    /// Generated by the region synthesizer. `reason` is set when an
    /// authoritative fetch was attempted and failed.
    Synthesized { reason: Option<String> },
}

impl Origin {
    pub fn is_live(&self) -> bool {
        matches!(self, Origin::Live)
    }
}

/// A payload plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: Origin::Live,
        }
    }

    pub fn backup(data: T, reason: impl Into<String>) -> Self {
        Self {
            data,
            origin: Origin::Backup {
                reason: reason.into(),
            },
        }
    }

    pub fn synthesized(data: T, reason: Option<String>) -> Self {
        Self {
            data,
            origin: Origin::Synthesized { reason },
        }
    }
}

/// Serde helper: parse a non-negative count from a JSON integer, float,
/// numeric string or null. Negative values are treated as unknown.
fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a non-negative number, a numeric string, or null")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(u64::try_from(v).ok())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_finite() && v >= 0.0 {
                Ok(Some(v.floor() as u64))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<u64>() {
                Ok(v) => Ok(Some(v)),
                Err(_) => s
                    .parse::<f64>()
                    .map_err(E::custom)
                    .and_then(|f| self.visit_f64(f)),
            }
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// Serde helper: per-million figures arrive as integers, floats, strings or null.
fn de_opt_metric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Metric {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Metric>::deserialize(deserializer)? {
        Some(Metric::Num(v)) if v.is_finite() => Some(v),
        Some(Metric::Text(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accept_floats_strings_and_null() {
        let g: GlobalSnapshot = serde_json::from_str(
            r#"{"cases": 12.9, "deaths": "34", "recovered": null, "active": -1}"#,
        )
        .unwrap();
        assert_eq!(g.cases, Some(12));
        assert_eq!(g.deaths, Some(34));
        assert_eq!(g.recovered, None);
        assert_eq!(g.active, None);
        assert_eq!(g.critical, None);
    }

    #[test]
    fn country_without_iso_keeps_name() {
        let raw: ApiCountry = serde_json::from_str(
            r#"{"country":"Diamond Princess","countryInfo":{"iso2":null,"flag":null},"cases":712}"#,
        )
        .unwrap();
        let c = CountryRecord::from(raw);
        assert_eq!(c.name, "Diamond Princess");
        assert_eq!(c.iso_code, None);
        assert_eq!(c.cases, 712);
        assert_eq!(c.deaths, 0);
        assert_eq!(c.population, None);
    }
}
