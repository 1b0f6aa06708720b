use covid_dash::backup::backup_countries;
use covid_dash::models::{CountryRecord, Origin, RegionRecord};
use covid_dash::session::{SelectionPhase, Session};

fn region(name: &str) -> RegionRecord {
    RegionRecord {
        name: name.into(),
        cases: 1_000,
        ..Default::default()
    }
}

fn synthesized() -> Origin {
    Origin::Synthesized { reason: None }
}

fn loaded() -> Session {
    let mut s = Session::new();
    s.replace_countries(backup_countries(), Origin::Live);
    s
}

#[test]
fn unknown_country_is_a_no_op() {
    let mut s = loaded();
    assert!(s.select_country("Atlantis").is_none());
    assert_eq!(s.selection().phase(), SelectionPhase::NoSelection);

    s.select_country("India").unwrap();
    assert!(s.select_country("india").is_none(), "lookup is exact");
    assert_eq!(s.selection().country().unwrap().name, "India");
}

#[test]
fn region_requires_a_region_set_for_the_country() {
    let mut s = loaded();
    assert!(!s.select_region("Kerala"));

    let ticket = s.select_country("India").unwrap();
    assert!(!s.select_region("Kerala"), "regions not delivered yet");

    assert!(s.apply_regions(&ticket, vec![region("Kerala"), region("Delhi")], synthesized()));
    assert!(!s.select_region("Texas"));
    assert_eq!(s.selection().phase(), SelectionPhase::CountrySelected);

    assert!(s.select_region("Kerala"));
    assert_eq!(s.selection().phase(), SelectionPhase::CountryAndRegionSelected);
    assert_eq!(s.selection().region().unwrap().name, "Kerala");
}

#[test]
fn switching_country_clears_region() {
    let mut s = loaded();
    let t = s.select_country("India").unwrap();
    s.apply_regions(&t, vec![region("Kerala")], synthesized());
    s.select_region("Kerala");

    s.select_country("Brazil").unwrap();
    assert_eq!(s.selection().phase(), SelectionPhase::CountrySelected);
    assert!(s.selection().region().is_none());
    assert!(s.regions().is_none());
    assert!(!s.select_region("Kerala"));
}

#[test]
fn stale_region_result_is_discarded() {
    let mut s = loaded();
    let a = s.select_country("India").unwrap();
    let b = s.select_country("Brazil").unwrap();

    assert!(!s.apply_regions(&a, vec![region("Kerala")], synthesized()));
    assert_eq!(s.selection().country().unwrap().name, "Brazil");
    assert!(s.regions().is_none());

    assert!(s.apply_regions(&b, vec![region("Bahia")], synthesized()));
    assert_eq!(s.regions().unwrap().country, "Brazil");

    // A's result arriving even later is still ignored
    assert!(!s.apply_regions(&a, vec![region("Kerala")], synthesized()));
    assert_eq!(s.regions().unwrap().regions[0].name, "Bahia");
}

#[test]
fn reselecting_same_country_invalidates_old_ticket() {
    let mut s = loaded();
    let first = s.select_country("USA").unwrap();
    let second = s.select_country("USA").unwrap();
    assert!(second.generation > first.generation);
    assert!(!s.apply_regions(&first, vec![region("Texas")], Origin::Live));
    assert!(s.apply_regions(&second, vec![region("Ohio")], Origin::Live));
}

#[test]
fn invariant_holds_over_arbitrary_sequences() {
    let mut s = loaded();
    let names = ["USA", "India", "Nowhere", "Brazil"];
    let regions = ["A", "B", "Z"];
    let mut tickets = Vec::new();
    for step in 0..200usize {
        match step % 5 {
            0 | 3 => {
                if let Some(t) = s.select_country(names[step % names.len()]) {
                    tickets.push(t);
                }
            }
            1 => {
                if let Some(t) = tickets.get(step % tickets.len().max(1)).cloned() {
                    s.apply_regions(&t, vec![region("A"), region("B")], synthesized());
                }
            }
            2 => {
                s.select_region(regions[step % regions.len()]);
            }
            _ => {
                if step % 7 == 0 {
                    s.clear();
                }
            }
        }
        let sel = s.selection();
        if sel.region().is_some() {
            let country = sel.country().expect("region implies country");
            let set = s.regions().expect("region implies region set");
            assert_eq!(set.country, country.name);
            assert!(set.regions.iter().any(|r| Some(r) == sel.region()));
        }
    }
}

#[test]
fn refresh_keeps_selection_by_name() {
    let mut s = loaded();
    let t = s.select_country("France").unwrap();
    s.apply_regions(&t, vec![region("Brittany")], synthesized());
    s.select_region("Brittany");

    let mut fresh = backup_countries();
    fresh[3].cases += 1;
    s.replace_countries(fresh, Origin::Live);
    let sel = s.selection();
    assert_eq!(sel.country().unwrap().cases, 38_000_001);
    assert_eq!(sel.region().unwrap().name, "Brittany");
}

#[test]
fn refresh_without_selected_country_clears_selection() {
    let mut s = loaded();
    let t = s.select_country("France").unwrap();
    s.replace_countries(
        vec![CountryRecord {
            name: "Peru".into(),
            cases: 4_000_000,
            ..Default::default()
        }],
        Origin::Live,
    );
    assert_eq!(s.selection().phase(), SelectionPhase::NoSelection);
    assert!(!s.apply_regions(&t, vec![region("Brittany")], synthesized()));
    assert!(s.select_country("Peru").is_some());
}
