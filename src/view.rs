//! Pure view models for whatever surface draws the dashboard.
//!
//! Nothing here touches the network or mutates state; the CLI and the GUI
//! both render these structures.
use crate::format::{format_count, format_delta, format_metric, format_number, format_rate};
use crate::models::{CountryRecord, GlobalSnapshot, Origin, RegionRecord};
use crate::session::Session;
use serde::Serialize;

/// Semantic colour hint for a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatKind {
    Cases,
    Active,
    Recovered,
    Deaths,
    Critical,
    Tests,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLine {
    pub label: &'static str,
    pub value: String,
    /// Today's increment, e.g. `"+1,000"`.
    pub delta: Option<String>,
    pub kind: StatKind,
}

impl StatLine {
    fn new(label: &'static str, value: String, kind: StatKind) -> Self {
        Self {
            label,
            value,
            delta: None,
            kind,
        }
    }

    fn with_delta(mut self, delta: Option<String>) -> Self {
        self.delta = delta;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    pub name: String,
    pub cases: String,
    pub selected: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRow {
    pub name: String,
    pub cases: String,
    pub deaths: String,
    pub recovered: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub title: String,
    pub flag_url: Option<String>,
    pub stats: Vec<StatLine>,
    /// Per-million figures, test totals and recovery rate.
    pub rates: Vec<StatLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionsView {
    pub title: String,
    pub rows: Vec<RegionRow>,
    pub approximate: bool,
}

/// Everything a surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub global: Vec<StatLine>,
    pub countries: Vec<CountryRow>,
    pub country: Option<DetailView>,
    pub regions: Option<RegionsView>,
    pub region: Option<DetailView>,
    /// Transient notice shown when backup data is on screen.
    pub notice: Option<String>,
}

pub fn global_stats(g: &GlobalSnapshot) -> Vec<StatLine> {
    vec![
        StatLine::new("Total Cases", format_number(g.cases), StatKind::Cases)
            .with_delta(format_delta(g.today_cases)),
        StatLine::new("Active Cases", format_number(g.active), StatKind::Active),
        StatLine::new("Recovered", format_number(g.recovered), StatKind::Recovered)
            .with_delta(format_delta(g.today_recovered)),
        StatLine::new("Deaths", format_number(g.deaths), StatKind::Deaths)
            .with_delta(format_delta(g.today_deaths)),
        StatLine::new("Critical", format_number(g.critical), StatKind::Critical),
        StatLine::new("Tests", format_number(g.tests), StatKind::Tests),
    ]
}

pub fn country_details(c: &CountryRecord) -> DetailView {
    DetailView {
        title: c.name.clone(),
        flag_url: c.flag_url.clone(),
        stats: vec![
            StatLine::new("Total Cases", format_count(c.cases), StatKind::Cases)
                .with_delta(format_delta(Some(c.today_cases))),
            StatLine::new("Active Cases", format_count(c.active), StatKind::Active),
            StatLine::new("Recovered", format_count(c.recovered), StatKind::Recovered)
                .with_delta(format_delta(Some(c.today_recovered))),
            StatLine::new("Deaths", format_count(c.deaths), StatKind::Deaths)
                .with_delta(format_delta(Some(c.today_deaths))),
        ],
        rates: vec![
            StatLine::new(
                "Cases per Million",
                format_metric(c.cases_per_million),
                StatKind::Cases,
            ),
            StatLine::new(
                "Deaths per Million",
                format_metric(c.deaths_per_million),
                StatKind::Deaths,
            ),
            StatLine::new(
                "Tests per Million",
                format_metric(c.tests_per_million),
                StatKind::Tests,
            ),
            StatLine::new(
                "Recovery Rate",
                format_rate(c.recovered, c.cases),
                StatKind::Recovered,
            ),
        ],
    }
}

pub fn region_details(r: &RegionRecord) -> DetailView {
    DetailView {
        title: format!("{} Statistics", r.name),
        flag_url: None,
        stats: vec![
            StatLine::new("Total Cases", format_count(r.cases), StatKind::Cases)
                .with_delta(format_delta(Some(r.today_cases))),
            StatLine::new("Active Cases", format_count(r.active), StatKind::Active),
            StatLine::new("Recovered", format_count(r.recovered), StatKind::Recovered),
            StatLine::new("Deaths", format_count(r.deaths), StatKind::Deaths)
                .with_delta(format_delta(Some(r.today_deaths))),
        ],
        rates: vec![
            StatLine::new(
                "Cases per Million",
                format_metric(r.cases_per_million),
                StatKind::Cases,
            ),
            StatLine::new(
                "Deaths per Million",
                format_metric(r.deaths_per_million),
                StatKind::Deaths,
            ),
            StatLine::new("Tests", format_count(r.tests), StatKind::Tests),
            StatLine::new(
                "Recovery Rate",
                format_rate(r.recovered, r.cases),
                StatKind::Recovered,
            ),
        ],
    }
}

/// Case-insensitive substring match of `query` against a country name.
/// An empty query matches everything.
pub fn matches_search(name: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// Countries sorted by cases, highest first. Ties keep fetch order.
pub fn sorted_by_cases(countries: &[CountryRecord]) -> Vec<&CountryRecord> {
    let mut sorted: Vec<&CountryRecord> = countries.iter().collect();
    sorted.sort_by(|a, b| b.cases.cmp(&a.cases));
    sorted
}

/// Country list rows: sorted, with visibility from the search query.
pub fn countries_list(
    countries: &[CountryRecord],
    selected: Option<&str>,
    query: &str,
) -> Vec<CountryRow> {
    sorted_by_cases(countries)
        .into_iter()
        .map(|c| CountryRow {
            name: c.name.clone(),
            cases: format!("Cases: {}", format_count(c.cases)),
            selected: selected == Some(c.name.as_str()),
            visible: matches_search(&c.name, query),
        })
        .collect()
}

pub fn regions_list(
    country: &str,
    regions: &[RegionRecord],
    selected: Option<&str>,
    approximate: bool,
) -> RegionsView {
    RegionsView {
        title: format!("{country} - States/Provinces ({})", regions.len()),
        rows: regions
            .iter()
            .map(|r| RegionRow {
                name: r.name.clone(),
                cases: format!("Cases: {}", format_count(r.cases)),
                deaths: format!("Deaths: {}", format_count(r.deaths)),
                recovered: format!("Recovered: {}", format_count(r.recovered)),
                selected: selected == Some(r.name.as_str()),
            })
            .collect(),
        approximate,
    }
}

fn notice(session: &Session) -> Option<String> {
    let backed_up = |o: Option<&Origin>| matches!(o, Some(Origin::Backup { .. }));
    match (
        backed_up(session.global_origin()),
        backed_up(session.countries_origin()),
    ) {
        (true, true) => Some("Live data unavailable; showing backup figures.".into()),
        (true, false) => Some("Failed to load global data; showing backup figures.".into()),
        (false, true) => Some("Failed to load countries data; showing backup figures.".into()),
        (false, false) => None,
    }
}

/// Build the whole dashboard for the current session and search query.
pub fn dashboard(session: &Session, query: &str) -> DashboardView {
    let selection = session.selection();
    let selected_country = selection.country();
    let selected_region = selection.region();
    DashboardView {
        global: session.global().map(global_stats).unwrap_or_default(),
        countries: countries_list(
            session.countries(),
            selected_country.map(|c| c.name.as_str()),
            query,
        ),
        country: selected_country.map(country_details),
        regions: session
            .regions()
            .filter(|set| !set.regions.is_empty())
            .map(|set| {
                regions_list(
                    &set.country,
                    &set.regions,
                    selected_region.map(|r| r.name.as_str()),
                    !set.origin.is_live(),
                )
            }),
        region: selected_region.map(region_details),
        notice: notice(session),
    }
}
