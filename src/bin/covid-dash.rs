use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use covid_dash::view::{CountryRow, DashboardView, DetailView, StatLine};
use covid_dash::{Client, Dashboard, RefreshScheduler, RegionSynthesizer};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    name = "covid-dash",
    version,
    about = "Global, per-country and per-region pandemic statistics from disease.sh"
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// API root (default: https://disease.sh/v3/covid-19)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Skip the network and show the built-in backup data.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,
    /// Seed for the region synthesizer (reproducible approximations).
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Give up waiting for the API after this many seconds.
    #[arg(long, global = true, default_value_t = 60)]
    timeout: u64,
    /// Print the view model as JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Worldwide totals.
    Global,
    /// Countries sorted by cases, optionally filtered.
    Countries(CountriesArgs),
    /// Details and regions of one country (and optionally one region).
    Country(CountryArgs),
    /// Re-fetch and print totals on a fixed interval.
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Case-insensitive substring filter on the country name.
    #[arg(short, long, default_value = "")]
    search: String,
    /// Show at most this many rows.
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct CountryArgs {
    /// Exact country name as listed by `countries` (e.g. "USA", "India").
    name: String,
    /// Exact region name to drill into.
    #[arg(short, long)]
    region: Option<String>,
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Seconds between refreshes (default 300).
    #[arg(long, default_value_t = 300)]
    interval: u64,
    /// Stop after this many refreshes (default: run forever).
    #[arg(long)]
    iterations: Option<u64>,
    /// Countries to list after the totals.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut dash = build_dashboard(&cli.source);
    let timeout = Duration::from_secs(cli.source.timeout);
    match cli.cmd {
        Command::Global => cmd_global(&mut dash, timeout, cli.source.json),
        Command::Countries(args) => cmd_countries(&mut dash, timeout, cli.source.json, args),
        Command::Country(args) => cmd_country(&mut dash, timeout, cli.source.json, args),
        Command::Watch(args) => cmd_watch(dash, timeout, args),
    }
}

fn build_dashboard(args: &SourceArgs) -> Dashboard {
    let synth = match args.seed {
        Some(seed) => RegionSynthesizer::with_seed(seed),
        None => RegionSynthesizer::default(),
    };
    if args.offline {
        return Dashboard::offline(synth);
    }
    let client = match &args.base_url {
        Some(url) => Client::new(url.as_str()),
        None => Client::default(),
    };
    Dashboard::new(client, synth)
}

fn load(dash: &mut Dashboard, timeout: Duration) -> Result<()> {
    dash.refresh();
    if !dash.wait(timeout) {
        bail!("timed out after {}s waiting for data", timeout.as_secs());
    }
    Ok(())
}

fn print_json(view: &DashboardView) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

fn print_notice(view: &DashboardView) {
    if let Some(notice) = &view.notice {
        eprintln!("note: {notice}");
    }
}

fn print_stats(lines: &[StatLine]) {
    for line in lines {
        match &line.delta {
            Some(delta) => println!("  {:<20} {:>16}  (today {delta})", line.label, line.value),
            None => println!("  {:<20} {:>16}", line.label, line.value),
        }
    }
}

fn print_detail(detail: &DetailView) {
    println!("{}", detail.title);
    print_stats(&detail.stats);
    print_stats(&detail.rates);
}

fn print_rows<'a>(rows: impl IntoIterator<Item = &'a CountryRow>) {
    for row in rows {
        let marker = if row.selected { '*' } else { ' ' };
        println!("{marker} {:<32} {}", row.name, row.cases);
    }
}

fn cmd_global(dash: &mut Dashboard, timeout: Duration, json: bool) -> Result<()> {
    load(dash, timeout)?;
    let view = dash.view("");
    if json {
        return print_json(&view);
    }
    print_notice(&view);
    println!("Global");
    print_stats(&view.global);
    Ok(())
}

fn cmd_countries(
    dash: &mut Dashboard,
    timeout: Duration,
    json: bool,
    args: CountriesArgs,
) -> Result<()> {
    load(dash, timeout)?;
    let mut view = dash.view(&args.search);
    view.countries.retain(|row| row.visible);
    if let Some(limit) = args.limit {
        view.countries.truncate(limit);
    }
    if json {
        return print_json(&view);
    }
    print_notice(&view);
    if view.countries.is_empty() {
        eprintln!("No countries match {:?}", args.search);
    }
    print_rows(&view.countries);
    Ok(())
}

fn cmd_country(dash: &mut Dashboard, timeout: Duration, json: bool, args: CountryArgs) -> Result<()> {
    load(dash, timeout)?;
    if !dash.select_country(&args.name) {
        bail!("unknown country: {} (see `covid-dash countries`)", args.name);
    }
    if !dash.wait(timeout) {
        bail!("timed out waiting for regions of {}", args.name);
    }
    if let Some(region) = &args.region
        && !dash.select_region(region)
    {
        bail!("unknown region {region:?} for {}", args.name);
    }
    let mut view = dash.view("");
    view.countries.clear();
    if json {
        return print_json(&view);
    }
    print_notice(&view);
    if let Some(detail) = &view.country {
        print_detail(detail);
    }
    match &view.regions {
        Some(regions) => {
            println!();
            println!("{}", regions.title);
            if regions.approximate {
                println!("  (approximate figures, not official sub-national data)");
            }
            for row in &regions.rows {
                let marker = if row.selected { '*' } else { ' ' };
                println!(
                    "{marker} {:<32} {:<22} {:<20} {}",
                    row.name, row.cases, row.deaths, row.recovered
                );
            }
        }
        None => println!("\nNo regional breakdown for {}", args.name),
    }
    if let Some(detail) = &view.region {
        println!();
        print_detail(detail);
    }
    Ok(())
}

fn cmd_watch(dash: Dashboard, timeout: Duration, args: WatchArgs) -> Result<()> {
    let interval = Duration::from_secs(args.interval.max(1));
    let mut dash = dash.with_scheduler(RefreshScheduler::new(interval));
    let mut done = 0u64;
    loop {
        if dash.tick(Instant::now()) {
            if !dash.wait(timeout) {
                log::warn!("refresh did not finish within {}s", timeout.as_secs());
            }
            let view = dash.view("");
            println!("Last updated: {}", dash.scheduler().last_updated_label());
            print_notice(&view);
            print_stats(&view.global);
            print_rows(view.countries.iter().take(args.top));
            println!();
            done += 1;
            if args.iterations.is_some_and(|n| done >= n) {
                return Ok(());
            }
        }
        std::thread::sleep(dash.scheduler().time_until_next(Instant::now()));
    }
}
