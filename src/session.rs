//! In-memory dashboard state: the current data sets and what is selected.
//!
//! Invariant: a region can only be selected while a country is selected, and
//! only from the region set produced for that country. Region results are
//! tagged with the generation of the selection that requested them; a result
//! whose generation is no longer current is discarded.
use crate::models::{CountryRecord, GlobalSnapshot, Origin, RegionRecord};

/// Coarse position in the selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    NoSelection,
    CountrySelected,
    CountryAndRegionSelected,
}

/// Selected country and region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    country: Option<CountryRecord>,
    region: Option<RegionRecord>,
}

impl SelectionState {
    pub fn country(&self) -> Option<&CountryRecord> {
        self.country.as_ref()
    }

    pub fn region(&self) -> Option<&RegionRecord> {
        self.region.as_ref()
    }

    pub fn phase(&self) -> SelectionPhase {
        match (&self.country, &self.region) {
            (None, _) => SelectionPhase::NoSelection,
            (Some(_), None) => SelectionPhase::CountrySelected,
            (Some(_), Some(_)) => SelectionPhase::CountryAndRegionSelected,
        }
    }
}

/// Regions produced for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSet {
    pub country: String,
    pub regions: Vec<RegionRecord>,
    pub origin: Origin,
}

/// Handle for an outstanding region request.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTicket {
    pub generation: u64,
    pub country: CountryRecord,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    global: Option<(GlobalSnapshot, Origin)>,
    countries: Vec<CountryRecord>,
    countries_origin: Option<Origin>,
    selection: SelectionState,
    regions: Option<RegionSet>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> Option<&GlobalSnapshot> {
        self.global.as_ref().map(|(g, _)| g)
    }

    pub fn global_origin(&self) -> Option<&Origin> {
        self.global.as_ref().map(|(_, o)| o)
    }

    /// Countries in fetch order.
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn countries_origin(&self) -> Option<&Origin> {
        self.countries_origin.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Region set for the selected country, once it has arrived.
    pub fn regions(&self) -> Option<&RegionSet> {
        self.regions.as_ref()
    }

    /// True while a region request for the selected country is outstanding.
    pub fn regions_pending(&self) -> bool {
        self.selection.country.is_some() && self.regions.is_none()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_global(&mut self, global: GlobalSnapshot, origin: Origin) {
        self.global = Some((global, origin));
    }

    /// Swap in a fresh country set. A selected country that still exists is
    /// re-pointed at its new record; one that vanished clears the selection.
    pub fn replace_countries(&mut self, countries: Vec<CountryRecord>, origin: Origin) {
        self.countries = countries;
        self.countries_origin = Some(origin);
        let Some(selected) = self.selection.country.as_ref().map(|c| c.name.clone()) else {
            return;
        };
        match self.countries.iter().find(|c| c.name == selected) {
            Some(fresh) => self.selection.country = Some(fresh.clone()),
            None => {
                log::info!("selected country {selected} is gone after refresh, clearing selection");
                self.clear();
            }
        }
    }

    /// Select a country by exact name. Unknown names leave the state untouched
    /// and return `None`; otherwise the region selection is cleared and the
    /// returned ticket must be used to deliver the country's regions.
    pub fn select_country(&mut self, name: &str) -> Option<RegionTicket> {
        let country = self.countries.iter().find(|c| c.name == name)?.clone();
        log::info!("selected country: {}", country.name);
        self.generation += 1;
        self.selection.country = Some(country.clone());
        self.selection.region = None;
        self.regions = None;
        Some(RegionTicket {
            generation: self.generation,
            country,
        })
    }

    /// Deliver regions for `ticket`. Returns `false` (and drops them) when
    /// the selection has moved on since the ticket was issued.
    pub fn apply_regions(
        &mut self,
        ticket: &RegionTicket,
        regions: Vec<RegionRecord>,
        origin: Origin,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale regions for {} (generation {}, current {})",
                ticket.country.name,
                ticket.generation,
                self.generation
            );
            return false;
        }
        let Some(country) = self.selection.country.as_ref() else {
            return false;
        };
        self.regions = Some(RegionSet {
            country: country.name.clone(),
            regions,
            origin,
        });
        true
    }

    /// Select a region of the current set by exact name. No-op (`false`)
    /// without a region set or for an unknown name.
    pub fn select_region(&mut self, name: &str) -> bool {
        let Some(set) = self.regions.as_ref() else {
            return false;
        };
        let Some(region) = set.regions.iter().find(|r| r.name == name) else {
            return false;
        };
        log::info!("selected region: {}", region.name);
        self.selection.region = Some(region.clone());
        true
    }

    /// Back to `NoSelection`; outstanding region requests become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.selection = SelectionState::default();
        self.regions = None;
    }
}
