use covid_dash::backup::{backup_countries, backup_global};
use covid_dash::models::{CountryRecord, Origin, RegionRecord};
use covid_dash::session::Session;
use covid_dash::view::{
    countries_list, country_details, dashboard, global_stats, matches_search, region_details,
    sorted_by_cases,
};

fn named(name: &str, cases: u64) -> CountryRecord {
    CountryRecord {
        name: name.into(),
        cases,
        ..Default::default()
    }
}

#[test]
fn backup_list_sorts_by_cases_descending() {
    let rows = countries_list(&backup_countries(), None, "");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["USA", "India", "France", "Germany", "Brazil"]);
    assert_eq!(rows[0].cases, "Cases: 100,000,000");
    assert!(rows.iter().all(|r| r.visible && !r.selected));
}

#[test]
fn ties_keep_fetch_order() {
    let countries = vec![
        named("B", 10),
        named("A", 20),
        named("C", 10),
        named("D", 20),
        named("E", 10),
    ];
    let names: Vec<&str> = sorted_by_cases(&countries)
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["A", "D", "B", "C", "E"]);
}

#[test]
fn search_only_changes_visibility() {
    let countries = backup_countries();
    let rows = countries_list(&countries, Some("Brazil"), "ind");
    let visible: Vec<&str> = rows
        .iter()
        .filter(|r| r.visible)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(visible, ["India"]);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().any(|r| r.name == "Brazil" && r.selected && !r.visible));
}

#[test]
fn search_predicate() {
    assert!(matches_search("India", "IND"));
    assert!(matches_search("United Kingdom", "king"));
    assert!(matches_search("Côte d'Ivoire", "CÔTE"));
    assert!(matches_search("USA", ""));
    assert!(matches_search("USA", "  "));
    assert!(!matches_search("USA", "india"));
}

#[test]
fn global_panel_lines() {
    let lines = global_stats(&backup_global());
    let labels: Vec<&str> = lines.iter().map(|l| l.label).collect();
    assert_eq!(
        labels,
        ["Total Cases", "Active Cases", "Recovered", "Deaths", "Critical", "Tests"]
    );
    assert_eq!(lines[0].value, "650,000,000");
    assert_eq!(lines[0].delta.as_deref(), Some("+50,000"));
    assert_eq!(lines[1].delta, None);
    assert_eq!(lines[5].value, "6,500,000,000");

    let unknown = global_stats(&Default::default());
    assert!(unknown.iter().all(|l| l.value == "N/A" && l.delta.is_none()));
}

#[test]
fn country_and_region_details() {
    let usa = &backup_countries()[0];
    let d = country_details(usa);
    assert_eq!(d.title, "USA");
    assert_eq!(d.flag_url.as_deref(), Some("https://disease.sh/assets/img/flags/us.png"));
    assert_eq!(d.stats[0].delta.as_deref(), Some("+10,000"));
    assert_eq!(d.rates[0].value, "300,000");
    assert_eq!(d.rates[3].label, "Recovery Rate");
    assert_eq!(d.rates[3].value, "97.00%");

    let r = region_details(&RegionRecord {
        name: "Ohio".into(),
        cases: 0,
        tests: 12_345,
        ..Default::default()
    });
    assert_eq!(r.title, "Ohio Statistics");
    assert_eq!(r.stats[0].delta, None);
    assert_eq!(r.rates[2].value, "12,345");
    assert_eq!(r.rates[3].value, "N/A");
}

#[test]
fn dashboard_reflects_session() {
    let mut s = Session::new();
    assert!(dashboard(&s, "").global.is_empty());

    s.set_global(backup_global(), Origin::Backup { reason: "down".into() });
    s.replace_countries(backup_countries(), Origin::Live);
    let v = dashboard(&s, "");
    assert_eq!(v.global.len(), 6);
    assert!(v.notice.unwrap().contains("global"));
    assert!(v.country.is_none() && v.regions.is_none() && v.region.is_none());

    let t = s.select_country("Germany").unwrap();
    let regions = vec![
        RegionRecord { name: "Berlin".into(), cases: 10, ..Default::default() },
        RegionRecord { name: "Hesse".into(), cases: 20, ..Default::default() },
    ];
    s.apply_regions(&t, regions, Origin::Synthesized { reason: None });
    s.select_region("Hesse");

    let v = dashboard(&s, "");
    assert_eq!(v.country.unwrap().title, "Germany");
    let rv = v.regions.unwrap();
    assert_eq!(rv.title, "Germany - States/Provinces (2)");
    assert!(rv.approximate);
    assert!(rv.rows[1].selected && !rv.rows[0].selected);
    assert_eq!(v.region.unwrap().title, "Hesse Statistics");
    assert!(v.countries.iter().any(|r| r.name == "Germany" && r.selected));
}

#[test]
fn empty_region_set_is_not_shown() {
    let mut s = Session::new();
    s.replace_countries(vec![named("Tinyland", 50)], Origin::Live);
    let t = s.select_country("Tinyland").unwrap();
    s.apply_regions(&t, vec![], Origin::Synthesized { reason: None });
    let v = dashboard(&s, "");
    assert!(v.country.is_some());
    assert!(v.regions.is_none());
    assert!(v.notice.is_none());
}
