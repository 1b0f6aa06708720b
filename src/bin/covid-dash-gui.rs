/*!
 * Desktop dashboard for covid-dash
 *
 * A cross-platform egui application providing:
 * - Worldwide totals with today's increments
 * - A searchable country list sorted by cases
 * - Country details with a state/province drill-down
 *
 * Data is refreshed every five minutes; all fetching happens on background threads.
 */

use covid_dash::view::{DashboardView, DetailView, StatKind, StatLine};
use covid_dash::{Client, Dashboard, RegionSynthesizer};
use eframe::egui;
use std::time::{Duration, Instant};

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("COVID-19 Tracker - covid-dash"),
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Tracker",
        options,
        Box::new(|_cc| Ok(Box::new(DashApp::new()))),
    )
}

/// Main application state
struct DashApp {
    dash: Dashboard,
    search: String,
}

/// A click collected while drawing, applied after the frame is laid out.
#[derive(Debug)]
enum Action {
    Refresh,
    SelectCountry(String),
    SelectRegion(String),
}

impl DashApp {
    fn new() -> Self {
        log::info!("COVID tracker starting");
        Self {
            dash: Dashboard::new(Client::default(), RegionSynthesizer::default()),
            search: String::new(),
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Refresh => self.dash.refresh_now(Instant::now()),
            Action::SelectCountry(name) => {
                self.dash.select_country(&name);
            }
            Action::SelectRegion(name) => {
                self.dash.select_region(&name);
            }
        }
    }
}

fn stat_color(kind: StatKind) -> egui::Color32 {
    match kind {
        StatKind::Cases => egui::Color32::from_rgb(66, 133, 244),
        StatKind::Active => egui::Color32::from_rgb(251, 188, 5),
        StatKind::Recovered => egui::Color32::from_rgb(52, 168, 83),
        StatKind::Deaths => egui::Color32::from_rgb(234, 67, 53),
        StatKind::Critical => egui::Color32::from_rgb(171, 71, 188),
        StatKind::Tests => egui::Color32::from_rgb(0, 172, 193),
    }
}

fn stat_card(ui: &mut egui::Ui, stat: &StatLine) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(stat.label);
            ui.label(
                egui::RichText::new(&stat.value)
                    .strong()
                    .size(18.0)
                    .color(stat_color(stat.kind)),
            );
            if let Some(delta) = &stat.delta {
                ui.small(format!("Today: {delta}"));
            }
        });
    });
}

fn stat_row(ui: &mut egui::Ui, stats: &[StatLine]) {
    ui.horizontal_wrapped(|ui| {
        for stat in stats {
            stat_card(ui, stat);
        }
    });
}

fn detail_panel(ui: &mut egui::Ui, detail: &DetailView) {
    ui.horizontal(|ui| {
        ui.heading(&detail.title);
        if let Some(flag) = &detail.flag_url {
            ui.hyperlink_to("flag", flag);
        }
    });
    stat_row(ui, &detail.stats);
    stat_row(ui, &detail.rates);
}

fn global_panel(ui: &mut egui::Ui, view: &DashboardView, last_updated: &str, loading: bool) -> Option<Action> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.heading("COVID-19 Global Statistics");
        ui.label(format!("Last updated: {last_updated}"));
        if ui.add_enabled(!loading, egui::Button::new("Refresh")).clicked() {
            action = Some(Action::Refresh);
        }
        if loading {
            ui.spinner();
        }
    });
    if let Some(notice) = &view.notice {
        ui.colored_label(egui::Color32::RED, notice);
    }
    if view.global.is_empty() {
        ui.label("Loading global data...");
    } else {
        stat_row(ui, &view.global);
    }
    action
}

fn countries_panel(ui: &mut egui::Ui, view: &DashboardView, search: &mut String) -> Option<Action> {
    let mut action = None;
    ui.heading("Countries");
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.text_edit_singleline(search)
            .on_hover_text("Filter countries by name (case-insensitive)");
    });
    ui.separator();
    if view.countries.is_empty() {
        ui.label("Loading countries...");
        return None;
    }
    egui::ScrollArea::vertical()
        .id_salt("countries")
        .show(ui, |ui| {
            for row in view.countries.iter().filter(|r| r.visible) {
                let text = format!("{}\n{}", row.name, row.cases);
                if ui.selectable_label(row.selected, text).clicked() {
                    action = Some(Action::SelectCountry(row.name.clone()));
                }
            }
        });
    action
}

fn selection_panel(ui: &mut egui::Ui, view: &DashboardView, regions_pending: bool) -> Option<Action> {
    let mut action = None;
    let Some(country) = &view.country else {
        ui.label("Select a country to view detailed statistics.");
        return None;
    };
    egui::ScrollArea::vertical()
        .id_salt("details")
        .show(ui, |ui| {
            detail_panel(ui, country);
            ui.add_space(12.0);

            if regions_pending {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading states/provinces...");
                });
            }

            if let Some(regions) = &view.regions {
                ui.heading(&regions.title);
                if regions.approximate {
                    ui.small("Approximate figures derived from national totals.");
                }
                ui.label("Click on any state/province to view detailed statistics");
                egui::Grid::new("regions")
                    .striped(true)
                    .num_columns(4)
                    .show(ui, |ui| {
                        for row in &regions.rows {
                            if ui.selectable_label(row.selected, &row.name).clicked() {
                                action = Some(Action::SelectRegion(row.name.clone()));
                            }
                            ui.label(&row.cases);
                            ui.colored_label(stat_color(StatKind::Deaths), &row.deaths);
                            ui.colored_label(stat_color(StatKind::Recovered), &row.recovered);
                            ui.end_row();
                        }
                    });
            }

            if let Some(region) = &view.region {
                ui.add_space(12.0);
                ui.separator();
                detail_panel(ui, region);
            }
        });
    action
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished fetches, then start a refresh if one is due
        self.dash.pump();
        self.dash.tick(Instant::now());

        let loading = self.dash.is_loading();
        if loading {
            ctx.request_repaint_after(Duration::from_millis(200));
        } else {
            ctx.request_repaint_after(
                self.dash
                    .scheduler()
                    .time_until_next(Instant::now())
                    .max(Duration::from_secs(1)),
            );
        }

        let view = self.dash.view(&self.search);
        let last_updated = self.dash.scheduler().last_updated_label();
        let regions_pending = self.dash.session().regions_pending();
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("global").show(ctx, |ui| {
            actions.extend(global_panel(ui, &view, &last_updated, loading));
        });

        egui::SidePanel::left("countries")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                actions.extend(countries_panel(ui, &view, &mut self.search));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            actions.extend(selection_panel(ui, &view, regions_pending));
        });

        for action in actions {
            self.apply(action);
        }
    }
}
