//! Event-processing owner of the dashboard state.
//!
//! Fetches run on short-lived worker threads and report back over a channel;
//! results are applied to the [`Session`] only on the thread that owns the
//! `Dashboard` (in [`Dashboard::pump`] or [`Dashboard::wait`]), so the
//! session itself needs no locking.
use crate::api::Client;
use crate::backup::{backup_countries, backup_global};
use crate::models::{CountryRecord, Fetched, GlobalSnapshot, RegionRecord};
use crate::refresh::RefreshScheduler;
use crate::session::{RegionTicket, Session};
use crate::synth::RegionSynthesizer;
use crate::view::{self, DashboardView};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

const OFFLINE_REASON: &str = "offline mode";

/// Result of a background fetch. Global and country results carry the
/// sequence number of the refresh that started them.
#[derive(Debug)]
pub(crate) enum Event {
    Global {
        refresh: u64,
        fetched: Fetched<GlobalSnapshot>,
    },
    Countries {
        refresh: u64,
        fetched: Fetched<Vec<CountryRecord>>,
    },
    Regions {
        ticket: RegionTicket,
        fetched: Fetched<Vec<RegionRecord>>,
    },
}

pub struct Dashboard {
    /// `None` runs offline on the backup data.
    client: Option<Client>,
    synth: RegionSynthesizer,
    session: Session,
    scheduler: RefreshScheduler,
    sender: Sender<Event>,
    receiver: Receiver<Event>,
    in_flight: usize,
    /// Sequence number of the latest refresh started.
    refreshes: u64,
    /// Sequence numbers of the refreshes whose results are on screen.
    global_refresh: u64,
    countries_refresh: u64,
}

impl Dashboard {
    pub fn new(client: Client, synth: RegionSynthesizer) -> Self {
        Self::build(Some(client), synth)
    }

    /// Dashboard that never touches the network.
    pub fn offline(synth: RegionSynthesizer) -> Self {
        Self::build(None, synth)
    }

    fn build(client: Option<Client>, synth: RegionSynthesizer) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            client,
            synth,
            session: Session::new(),
            scheduler: RefreshScheduler::default(),
            sender,
            receiver,
            in_flight: 0,
            refreshes: 0,
            global_refresh: 0,
            countries_refresh: 0,
        }
    }

    pub fn with_scheduler(mut self, scheduler: RefreshScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// True while any fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> Event + Send + 'static,
    {
        self.in_flight += 1;
        let sender = self.sender.clone();
        thread::spawn(move || {
            let _ = sender.send(job());
        });
    }

    /// Re-fetch global and country data. Region data is left alone.
    ///
    /// Overlapping refreshes may finish out of order; a result older than the
    /// one already applied is dropped.
    pub fn refresh(&mut self) {
        self.refreshes += 1;
        let refresh = self.refreshes;
        log::info!("refreshing global and country data (#{refresh})");
        let client = self.client.clone();
        self.spawn(move || Event::Global {
            refresh,
            fetched: match &client {
                Some(c) => c.fetch_global(),
                None => Fetched::backup(backup_global(), OFFLINE_REASON),
            },
        });
        let client = self.client.clone();
        self.spawn(move || Event::Countries {
            refresh,
            fetched: match &client {
                Some(c) => c.fetch_countries(),
                None => Fetched::backup(backup_countries(), OFFLINE_REASON),
            },
        });
    }

    /// Refresh on demand and restart the scheduler's interval from `now`.
    pub fn refresh_now(&mut self, now: Instant) {
        self.scheduler.mark(now);
        self.refresh();
    }

    /// Refresh if the scheduler says one is due. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.scheduler.poll(now) {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Select a country and start loading its regions. Unknown names are
    /// ignored (`false`).
    pub fn select_country(&mut self, name: &str) -> bool {
        let Some(ticket) = self.session.select_country(name) else {
            log::debug!("ignoring selection of unknown country {name:?}");
            return false;
        };
        let client = self.client.clone();
        let mut synth = self.synth.fork();
        self.spawn(move || {
            let fetched = match &client {
                Some(c) => c.fetch_regions(&ticket.country, &mut synth),
                None => Fetched::synthesized(synth.synthesize(&ticket.country), None),
            };
            Event::Regions { ticket, fetched }
        });
        true
    }

    pub fn select_region(&mut self, name: &str) -> bool {
        self.session.select_region(name)
    }

    pub fn clear_selection(&mut self) {
        self.session.clear();
    }

    /// Apply one event from a worker. Returns `false` for results that were
    /// overtaken: regions for an old selection, or data from a refresh older
    /// than the one already shown.
    fn handle(&mut self, event: Event) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            Event::Global { refresh, fetched } => {
                if refresh < self.global_refresh {
                    log::debug!(
                        "discarding global data from refresh #{refresh}, #{} already applied",
                        self.global_refresh
                    );
                    return false;
                }
                self.global_refresh = refresh;
                self.session.set_global(fetched.data, fetched.origin);
                true
            }
            Event::Countries { refresh, fetched } => {
                if refresh < self.countries_refresh {
                    log::debug!(
                        "discarding countries from refresh #{refresh}, #{} already applied",
                        self.countries_refresh
                    );
                    return false;
                }
                self.countries_refresh = refresh;
                log::debug!("{} countries loaded", fetched.data.len());
                self.session.replace_countries(fetched.data, fetched.origin);
                true
            }
            Event::Regions { ticket, fetched } => {
                self.session
                    .apply_regions(&ticket, fetched.data, fetched.origin)
            }
        }
    }

    /// Apply every event that has already arrived without blocking.
    /// Returns how many were received.
    pub fn pump(&mut self) -> usize {
        let mut received = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.handle(event);
            received += 1;
        }
        received
    }

    /// Block until all outstanding fetches have reported or `timeout`
    /// elapses. Returns `true` if nothing is left in flight.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(left) {
                Ok(event) => {
                    self.handle(event);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.in_flight == 0
    }

    pub fn view(&self, query: &str) -> DashboardView {
        view::dashboard(&self.session, query)
    }
}
