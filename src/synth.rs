//! Approximate sub-region breakdowns for countries without authoritative data.
//!
//! A synthesized set always has the same names and length for a given
//! country; only the figures vary between calls. The split follows a few
//! fixed rules:
//! - countries below [`MATERIALITY_THRESHOLD`] cases get no regions at all;
//! - the region count is `cases / 50_000`, clamped to `4..=names.len()`;
//! - each region receives `cases / N` perturbed by up to ±50%, adding on even
//!   indices and subtracting on odd ones, floored at [`MIN_REGION_CASES`];
//! - deaths and recovered scale with the country's own ratios and `active`
//!   takes the remainder, so the three always add up to the region's cases.
//!
//! ### Example
//! ```
//! use covid_dash::synth::RegionSynthesizer;
//! # let country = covid_dash::backup::backup_countries().remove(0);
//! let mut synth = RegionSynthesizer::with_seed(7);
//! let regions = synth.synthesize(&country);
//! assert_eq!(regions[0].name, "New York");
//! ```
use crate::models::{CountryRecord, RegionRecord};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Countries with fewer cases than this are not split into regions.
pub const MATERIALITY_THRESHOLD: u64 = 10_000;
/// Roughly one region per this many cases.
pub const CASES_PER_REGION: u64 = 50_000;
pub const MIN_REGIONS: usize = 4;
/// Lowest case count a synthesized region can have.
pub const MIN_REGION_CASES: u64 = 500;
/// Largest relative deviation from the even split.
pub const MAX_VARIATION: f64 = 0.5;
/// Synthesized regions report this many tests per case.
pub const TESTS_PER_CASE: u64 = 10;

/// Region names for a country plus the divisor used for per-million figures
/// when the country's population is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTable {
    pub names: &'static [&'static str],
    pub per_million_divisor: f64,
}

const GENERIC: RegionTable = RegionTable {
    names: &[
        "Region 1",
        "Region 2",
        "Region 3",
        "Region 4",
        "Region 5",
        "Capital Region",
        "Northern Region",
        "Southern Region",
        "Eastern Region",
        "Western Region",
    ],
    per_million_divisor: 5.0,
};

/// Curated region table for an ISO2 code, or the generic table.
pub fn region_table(iso: Option<&str>) -> RegionTable {
    let Some(iso) = iso else {
        return GENERIC;
    };
    let (names, per_million_divisor): (&'static [&'static str], f64) =
        match iso.to_ascii_uppercase().as_str() {
            "US" => (
                &[
                    "New York",
                    "California",
                    "Texas",
                    "Florida",
                    "Illinois",
                    "Pennsylvania",
                    "Ohio",
                    "Georgia",
                    "Michigan",
                    "North Carolina",
                ],
                5.0,
            ),
            "IN" => (
                &[
                    "Maharashtra",
                    "Kerala",
                    "Karnataka",
                    "Tamil Nadu",
                    "Uttar Pradesh",
                    "Delhi",
                    "West Bengal",
                    "Odisha",
                    "Telangana",
                    "Rajasthan",
                    "Haryana",
                    "Madhya Pradesh",
                    "Gujarat",
                    "Punjab",
                    "Jammu and Kashmir",
                    "Jharkhand",
                    "Assam",
                    "Bihar",
                    "Himachal Pradesh",
                    "Uttarakhand",
                ],
                10.0,
            ),
            "BR" => (
                &[
                    "São Paulo",
                    "Rio de Janeiro",
                    "Minas Gerais",
                    "Bahia",
                    "Paraná",
                    "Rio Grande do Sul",
                    "Pernambuco",
                    "Ceará",
                    "Pará",
                    "Santa Catarina",
                    "Maranhão",
                    "Goiás",
                    "Amazonas",
                    "Espírito Santo",
                    "Paraíba",
                ],
                8.0,
            ),
            "DE" => (
                &[
                    "Bavaria",
                    "North Rhine-Westphalia",
                    "Baden-Württemberg",
                    "Lower Saxony",
                    "Hesse",
                    "Saxony",
                    "Berlin",
                    "Rhineland-Palatinate",
                    "Schleswig-Holstein",
                    "Brandenburg",
                ],
                5.0,
            ),
            "GB" => (
                &[
                    "England",
                    "Scotland",
                    "Wales",
                    "Northern Ireland",
                    "London",
                    "South East",
                    "North West",
                    "East of England",
                    "West Midlands",
                    "South West",
                    "Yorkshire",
                    "North East",
                ],
                6.0,
            ),
            "FR" => (
                &[
                    "Île-de-France",
                    "Auvergne-Rhône-Alpes",
                    "Hauts-de-France",
                    "Provence-Alpes-Côte d'Azur",
                    "Grand Est",
                    "Occitanie",
                    "Nouvelle-Aquitaine",
                    "Normandy",
                    "Brittany",
                    "Pays de la Loire",
                ],
                5.0,
            ),
            "IT" => (
                &[
                    "Lombardy",
                    "Lazio",
                    "Campania",
                    "Veneto",
                    "Sicily",
                    "Emilia-Romagna",
                    "Piedmont",
                    "Apulia",
                    "Tuscany",
                    "Calabria",
                ],
                5.0,
            ),
            "ES" => (
                &[
                    "Madrid",
                    "Catalonia",
                    "Andalusia",
                    "Valencia",
                    "Galicia",
                    "Castile and León",
                    "Basque Country",
                    "Canary Islands",
                    "Castilla-La Mancha",
                    "Murcia",
                ],
                5.0,
            ),
            "CA" => (
                &[
                    "Ontario",
                    "Quebec",
                    "British Columbia",
                    "Alberta",
                    "Manitoba",
                    "Saskatchewan",
                    "Nova Scotia",
                    "New Brunswick",
                    "Newfoundland and Labrador",
                    "Prince Edward Island",
                ],
                5.0,
            ),
            "AU" => (
                &[
                    "New South Wales",
                    "Victoria",
                    "Queensland",
                    "Western Australia",
                    "South Australia",
                    "Tasmania",
                    "Australian Capital Territory",
                    "Northern Territory",
                ],
                5.0,
            ),
            "JP" => (
                &[
                    "Tokyo", "Osaka", "Kanagawa", "Aichi", "Saitama", "Chiba", "Hyogo", "Hokkaido",
                    "Fukuoka", "Kyoto",
                ],
                5.0,
            ),
            "CN" => (
                &[
                    "Hubei",
                    "Guangdong",
                    "Henan",
                    "Zhejiang",
                    "Hunan",
                    "Anhui",
                    "Jiangxi",
                    "Shandong",
                    "Jiangsu",
                    "Chongqing",
                    "Sichuan",
                    "Heilongjiang",
                    "Beijing",
                    "Shanghai",
                    "Hebei",
                ],
                12.0,
            ),
            _ => return GENERIC,
        };
    RegionTable {
        names,
        per_million_divisor,
    }
}

/// Number of regions a country is split into (0 below the materiality threshold).
pub fn region_count(country: &CountryRecord) -> usize {
    if country.cases < MATERIALITY_THRESHOLD {
        return 0;
    }
    let table_len = region_table(country.iso_code.as_deref()).names.len();
    let wanted = usize::try_from(country.cases / CASES_PER_REGION).unwrap_or(usize::MAX);
    wanted.max(MIN_REGIONS).min(table_len)
}

/// Generate regions for `country` using the given random source.
pub fn synthesize_with<R: Rng + ?Sized>(country: &CountryRecord, rng: &mut R) -> Vec<RegionRecord> {
    let n = region_count(country);
    if n == 0 {
        return Vec::new();
    }
    let table = region_table(country.iso_code.as_deref());
    let n64 = n as u64;
    let base = country.cases / n64;
    let today_cases_base = country.today_cases / n64;
    let today_deaths_base = country.today_deaths / n64;
    // population share of one region, when known
    let share = country.population.map(|p| p as f64 / n as f64).filter(|s| *s > 0.0);

    let per_million = |value: u64| -> Option<f64> {
        Some(match share {
            Some(share) => (value as f64 * 1_000_000.0 / share).floor(),
            None => (value as f64 / table.per_million_divisor).floor(),
        })
    };

    table.names[..n]
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let cases = perturb(base, index, rng).max(MIN_REGION_CASES);
            let deaths = scale(cases, country.deaths, country.cases);
            let recovered = scale(cases, country.recovered, country.cases);
            let active = cases.saturating_sub(deaths).saturating_sub(recovered);
            let tests = cases.saturating_mul(TESTS_PER_CASE);
            RegionRecord {
                name: (*name).to_string(),
                cases,
                deaths,
                recovered,
                active,
                today_cases: perturb(today_cases_base, index, rng),
                today_deaths: perturb(today_deaths_base, index, rng),
                tests,
                cases_per_million: per_million(cases),
                deaths_per_million: per_million(deaths),
                tests_per_million: per_million(tests),
            }
        })
        .collect()
}

/// Even indices gain, odd indices lose, up to `MAX_VARIATION * base`.
/// Never goes below zero.
fn perturb<R: Rng + ?Sized>(base: u64, index: usize, rng: &mut R) -> u64 {
    let variation = (rng.gen_range(0.0..1.0) * base as f64 * MAX_VARIATION).floor() as u64;
    if index % 2 == 0 {
        base.saturating_add(variation)
    } else {
        base.saturating_sub(variation)
    }
}

/// `floor(value * numerator / denominator)`, 0 when the denominator is 0.
fn scale(value: u64, numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (value as u128 * numerator as u128 / denominator as u128).min(u64::MAX as u128) as u64
}

/// Region synthesizer owning its random stream.
#[derive(Debug, Clone)]
pub struct RegionSynthesizer {
    rng: ChaCha8Rng,
}

impl Default for RegionSynthesizer {
    fn default() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RegionSynthesizer {
    /// Reproducible synthesizer; the same seed yields the same figures.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn synthesize(&mut self, country: &CountryRecord) -> Vec<RegionRecord> {
        synthesize_with(country, &mut self.rng)
    }

    /// Independent child synthesizer, seeded from this one's stream, for use
    /// on a worker thread.
    pub fn fork(&mut self) -> Self {
        Self::with_seed(self.rng.gen_range(0..u64::MAX))
    }
}
