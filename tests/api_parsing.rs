use covid_dash::api::{parse_countries, parse_global, parse_regions, region_endpoint};

#[test]
fn parse_global_sample() {
    let sample = r#"
    {
      "updated": 1700000000000,
      "cases": 697000000,
      "todayCases": 1234,
      "deaths": 6930000,
      "todayDeaths": 12,
      "recovered": 669000000,
      "todayRecovered": 2000,
      "active": 21000000,
      "critical": 36000,
      "casesPerOneMillion": 89420,
      "deathsPerOneMillion": 889.2,
      "tests": 7000000000,
      "population": 7900000000,
      "affectedCountries": 231
    }
    "#;
    let v: serde_json::Value = serde_json::from_str(sample).unwrap();
    let g = parse_global(&v).unwrap();
    assert_eq!(g.cases, Some(697_000_000));
    assert_eq!(g.today_cases, Some(1_234));
    assert_eq!(g.critical, Some(36_000));
    assert_eq!(g.tests, Some(7_000_000_000));
    assert_eq!(g.today_recovered, Some(2_000));
}

#[test]
fn parse_global_rejects_api_error_and_arrays() {
    let err: serde_json::Value = serde_json::json!({"message": "Country not found"});
    assert!(parse_global(&err).unwrap_err().contains("Country not found"));
    assert!(parse_global(&serde_json::json!([1, 2])).is_err());
}

#[test]
fn parse_countries_sample() {
    let sample = r#"
    [
      {
        "updated": 1700000000000,
        "country": "Afghanistan",
        "countryInfo": {"_id": 4, "iso2": "AF", "iso3": "AFG", "lat": 33, "long": 65,
                        "flag": "https://disease.sh/assets/img/flags/af.png"},
        "cases": 234174, "todayCases": 0, "deaths": 7996, "todayDeaths": 0,
        "recovered": 211080, "todayRecovered": 0, "active": 15098, "critical": 1124,
        "casesPerOneMillion": 5690, "deathsPerOneMillion": 194.3, "tests": 1400000,
        "testsPerOneMillion": 34018.5, "population": 41128771, "continent": "Asia"
      },
      {
        "country": "MS Zaandam",
        "countryInfo": {"_id": null, "iso2": null, "iso3": null, "flag": null},
        "cases": 9, "deaths": 2, "recovered": null, "active": 7,
        "casesPerOneMillion": 0, "deathsPerOneMillion": 0, "testsPerOneMillion": 0,
        "population": 0
      }
    ]
    "#;
    let v: serde_json::Value = serde_json::from_str(sample).unwrap();
    let countries = parse_countries(&v).unwrap();
    assert_eq!(countries.len(), 2);

    let af = &countries[0];
    assert_eq!(af.name, "Afghanistan");
    assert_eq!(af.iso_code.as_deref(), Some("AF"));
    assert_eq!(af.cases, 234_174);
    assert_eq!(af.deaths_per_million, Some(194.3));
    assert_eq!(af.tests_per_million, Some(34_018.5));
    assert_eq!(af.population, Some(41_128_771));

    let ship = &countries[1];
    assert_eq!(ship.iso_code, None);
    assert_eq!(ship.recovered, 0);
    assert_eq!(ship.population, None);
}

#[test]
fn parse_countries_requires_array() {
    assert!(parse_countries(&serde_json::json!({"country": "USA"})).is_err());
    assert!(parse_countries(&serde_json::json!([{"cases": 1}])).is_err());
}

#[test]
fn parse_us_states_sample() {
    let sample = r#"
    [
      {"state": "California", "updated": 1700000000000, "cases": 12000000, "todayCases": 0,
       "deaths": 100000, "todayDeaths": 0, "recovered": 11800000, "active": 100000,
       "casesPerOneMillion": 306000, "deathsPerOneMillion": 2550, "tests": 190000000,
       "testsPerOneMillion": 4800000, "population": 39500000},
      {"state": "Texas", "cases": "8400000", "deaths": 93000}
    ]
    "#;
    let v: serde_json::Value = serde_json::from_str(sample).unwrap();
    let regions = parse_regions(&v).unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].name, "California");
    assert_eq!(regions[0].tests, 190_000_000);
    assert_eq!(regions[0].cases_per_million, Some(306_000.0));
    assert_eq!(regions[1].cases, 8_400_000);
    assert_eq!(regions[1].recovered, 0);
    assert_eq!(regions[1].cases_per_million, None);
}

#[test]
fn parse_regions_requires_top_level_array() {
    let wrapped = serde_json::json!({"states": [{"state": "Ohio", "cases": 1}]});
    assert!(parse_regions(&wrapped).is_err());
    assert!(parse_regions(&serde_json::json!("nope")).is_err());
    assert!(parse_regions(&serde_json::json!([{"province": "Ontario"}])).is_err());
}

#[test]
fn unreadable_country_rows_are_skipped() {
    let v = serde_json::json!([
        {"country": null, "cases": 5},
        {"country": "Chile", "cases": 5000000},
        {"cases": 7},
        {"country": "Peru", "cases": "4500000"}
    ]);
    let countries = parse_countries(&v).unwrap();
    let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Chile", "Peru"]);
    assert_eq!(countries[1].cases, 4_500_000);

    assert!(parse_countries(&serde_json::json!([])).unwrap().is_empty());
}

#[test]
fn only_us_has_an_endpoint() {
    assert_eq!(region_endpoint(Some("US")), Some("/states"));
    assert_eq!(region_endpoint(Some("us")), Some("/states"));
    assert_eq!(region_endpoint(Some("IN")), None);
    assert_eq!(region_endpoint(None), None);
}
