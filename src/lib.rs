//! covid_dash
//!
//! A small Rust library for retrieving and presenting public pandemic statistics
//! from the disease.sh API. Pairs with the `covid-dash` CLI and the
//! `covid-dash-gui` desktop dashboard.
//!
//! ### Features
//! - Fetch global and per-country aggregates, with static backups when the API is down
//! - US state data from the API; approximate region breakdowns for every other country
//! - A selection model (country → region) that ignores late results for old selections
//! - Pure view models with search filtering, ready for any rendering surface
//! - Periodic refresh of global and country data
//!
//! ### Example
//! ```no_run
//! use covid_dash::{Client, Dashboard, RegionSynthesizer};
//! use std::time::Duration;
//!
//! let mut dash = Dashboard::new(Client::default(), RegionSynthesizer::default());
//! dash.refresh();
//! dash.wait(Duration::from_secs(60));
//! dash.select_country("India");
//! dash.wait(Duration::from_secs(60));
//! let view = dash.view("ind");
//! println!("{:#?}", view.regions);
//! ```

pub mod api;
pub mod backup;
pub mod dashboard;
pub mod format;
pub mod models;
pub mod refresh;
pub mod session;
pub mod synth;
pub mod view;

pub use api::{Client, FetchError};
pub use dashboard::Dashboard;
pub use models::{CountryRecord, Fetched, GlobalSnapshot, Origin, RegionRecord};
pub use refresh::RefreshScheduler;
pub use session::{SelectionPhase, SelectionState, Session};
pub use synth::RegionSynthesizer;
