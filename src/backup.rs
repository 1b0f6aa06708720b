//! Static snapshots served when the live API is unreachable.
use crate::models::{CountryRecord, GlobalSnapshot};

pub fn backup_global() -> GlobalSnapshot {
    GlobalSnapshot {
        cases: Some(650_000_000),
        deaths: Some(6_800_000),
        recovered: Some(630_000_000),
        active: Some(13_200_000),
        critical: Some(40_000),
        tests: Some(6_500_000_000),
        today_cases: Some(50_000),
        today_deaths: Some(1_000),
        today_recovered: Some(60_000),
    }
}

/// Five large countries, in this order: USA, India, Brazil, France, Germany.
pub fn backup_countries() -> Vec<CountryRecord> {
    vec![
        country(
            "USA",
            "US",
            [100_000_000, 1_100_000, 97_000_000, 1_900_000],
            [10_000, 100, 15_000],
            [300_000.0, 3_300.0, 3_000_000.0],
        ),
        country(
            "India",
            "IN",
            [44_000_000, 530_000, 43_400_000, 70_000],
            [2_000, 10, 3_000],
            [31_000.0, 380.0, 670_000.0],
        ),
        country(
            "Brazil",
            "BR",
            [36_000_000, 700_000, 35_000_000, 300_000],
            [5_000, 30, 6_000],
            [170_000.0, 3_300.0, 700_000.0],
        ),
        country(
            "France",
            "FR",
            [38_000_000, 160_000, 37_500_000, 340_000],
            [3_000, 20, 4_000],
            [580_000.0, 2_400.0, 3_700_000.0],
        ),
        country(
            "Germany",
            "DE",
            [37_000_000, 170_000, 36_700_000, 130_000],
            [2_000, 15, 3_000],
            [440_000.0, 2_000.0, 1_200_000.0],
        ),
    ]
}

// totals: cases, deaths, recovered, active; today: cases, deaths, recovered;
// per_million: cases, deaths, tests
fn country(
    name: &str,
    iso2: &str,
    totals: [u64; 4],
    today: [u64; 3],
    per_million: [f64; 3],
) -> CountryRecord {
    let [cases, deaths, recovered, active] = totals;
    let [today_cases, today_deaths, today_recovered] = today;
    let [cases_pm, deaths_pm, tests_pm] = per_million;
    CountryRecord {
        name: name.into(),
        iso_code: Some(iso2.into()),
        flag_url: Some(format!(
            "https://disease.sh/assets/img/flags/{}.png",
            iso2.to_ascii_lowercase()
        )),
        cases,
        deaths,
        recovered,
        active,
        today_cases,
        today_deaths,
        today_recovered,
        cases_per_million: Some(cases_pm),
        deaths_per_million: Some(deaths_pm),
        tests_per_million: Some(tests_pm),
        population: None,
    }
}
