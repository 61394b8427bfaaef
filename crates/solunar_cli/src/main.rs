use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::json;
use solunar_ephem::{EphemerisPort, EventKind, Location, MeeusEphemeris};
use solunar_search::{
    Almanac, AlmanacConfig, DaySolunarRecord, SearchConfig, compute_almanac_parallel, format_utc,
    search_events,
};
use solunar_time::parse_timezone;

/// Minden, Louisiana.
const DEFAULT_LAT: f64 = 32.4619;
const DEFAULT_LON: f64 = -93.3486;
const DEFAULT_TZ: &str = "America/Chicago";

#[derive(Parser)]
#[command(name = "solunar", version, about = "Solunar almanac generator")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Options for the default `almanac` command
    #[command(flatten)]
    almanac: AlmanacArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the almanac for a run of local days (default)
    Almanac(AlmanacArgs),
    /// Show one local day's major and minor periods
    Day(DayArgs),
    /// List raw moon events over a UTC range
    Events(EventsArgs),
    /// Find the most recent new moon before an instant
    NewMoon {
        /// UTC instant (YYYY-MM-DDThh:mm:ssZ), default now
        #[arg(long, value_parser = parse_utc)]
        before: Option<DateTime<Utc>>,
    },
}

#[derive(Args, Clone)]
struct SiteArgs {
    /// Latitude in degrees, north positive
    #[arg(long, env = "SOLUNAR_LAT", default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude in degrees, east positive
    #[arg(long, env = "SOLUNAR_LON", default_value_t = DEFAULT_LON, allow_negative_numbers = true)]
    lon: f64,
    /// IANA timezone for local calendar days
    #[arg(long, env = "SOLUNAR_TZ", default_value = DEFAULT_TZ)]
    tz: String,
}

impl SiteArgs {
    fn resolve(&self) -> Result<(Location, Tz)> {
        let location = Location::new(self.lat, self.lon)
            .with_context(|| format!("bad location ({}, {})", self.lat, self.lon))?;
        let tz = parse_timezone(&self.tz)?;
        Ok((location, tz))
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Args, Clone)]
struct AlmanacArgs {
    #[command(flatten)]
    site: SiteArgs,
    /// Number of consecutive local days
    #[arg(long, env = "SOLUNAR_DAYS", default_value_t = 3)]
    days: u32,
    /// Output file for either format, or `-` for stdout
    #[arg(long, env = "SOLUNAR_OUTPUT", default_value = "solunar_data.json")]
    output: PathBuf,
    /// First local day (YYYY-MM-DD), default today in --tz
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Worker threads
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Args)]
struct DayArgs {
    #[command(flatten)]
    site: SiteArgs,
    /// Local day (YYYY-MM-DD), default today in --tz
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct EventsArgs {
    #[command(flatten)]
    site: SiteArgs,
    /// Range start (YYYY-MM-DDThh:mm:ssZ)
    #[arg(long, value_parser = parse_utc)]
    from: DateTime<Utc>,
    /// Range end (YYYY-MM-DDThh:mm:ssZ)
    #[arg(long, value_parser = parse_utc)]
    to: DateTime<Utc>,
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn parse_utc(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|e| format!("expected YYYY-MM-DDThh:mm:ssZ, got {s}: {e}"))
}

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let eph = MeeusEphemeris::default();

    match cli.command.unwrap_or(Commands::Almanac(cli.almanac)) {
        Commands::Almanac(args) => run_almanac(&eph, &args),
        Commands::Day(args) => run_day(&eph, &args),
        Commands::Events(args) => run_events(&eph, &args),
        Commands::NewMoon { before } => {
            let before = before.unwrap_or_else(Utc::now);
            let new_moon = eph
                .previous_new_moon(before)
                .context("new moon search failed")?;
            println!("{}", format_utc(new_moon));
            Ok(())
        }
    }
}

fn run_almanac(eph: &MeeusEphemeris, args: &AlmanacArgs) -> Result<()> {
    let (location, tz) = args.site.resolve()?;
    let mut config = AlmanacConfig::new(location, tz, args.days).with_threads(args.threads);
    if let Some(start) = args.start {
        config = config.with_first_date(start);
    }
    config.validate().context("invalid configuration")?;

    let almanac = compute_almanac_parallel(eph, &config, Utc::now())?;
    write_almanac(&almanac, &args.output, args.format, tz)
}

fn is_stdout(output: &Path) -> bool {
    output.as_os_str() == "-"
}

fn open_output(output: &Path) -> Result<Box<dyn Write>> {
    if is_stdout(output) {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file = File::create(output)
        .with_context(|| format!("cannot create {}", output.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn write_almanac(almanac: &Almanac, output: &Path, format: OutputFormat, tz: Tz) -> Result<()> {
    let mut out = open_output(output)?;
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, almanac)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for record in almanac.values() {
                write_record_text(&mut out, record, tz)?;
            }
        }
    }
    out.flush()?;
    if !is_stdout(output) {
        info!("wrote {} day(s) to {}", almanac.len(), output.display());
    }
    Ok(())
}

fn run_day(eph: &MeeusEphemeris, args: &DayArgs) -> Result<()> {
    let (location, tz) = args.site.resolve()?;
    let mut config = AlmanacConfig::new(location, tz, 1);
    if let Some(date) = args.date {
        config = config.with_first_date(date);
    }
    let almanac = compute_almanac_parallel(eph, &config, Utc::now())?;
    let Some(record) = almanac.values().next() else {
        bail!("no record computed");
    };
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => write_record_text(&mut io::stdout().lock(), record, tz)?,
    }
    Ok(())
}

fn run_events(eph: &MeeusEphemeris, args: &EventsArgs) -> Result<()> {
    let (location, tz) = args.site.resolve()?;
    if args.to <= args.from {
        bail!("--to must be after --from");
    }
    // Each pair of kinds recurs about twice per day.
    let days = u32::try_from((args.to - args.from).num_days()).context("range too long")?;
    let config = SearchConfig {
        max_iterations: days.saturating_add(2).saturating_mul(4),
        ..SearchConfig::default()
    };
    let stream = search_events(eph, &location, args.from, args.to, &config);
    let mut events = stream.events.clone();
    events.sort_by_key(|e| (e.at, e.kind));

    match args.format {
        OutputFormat::Json => {
            let list: Vec<_> = events
                .iter()
                .map(|e| {
                    json!({
                        "kind": e.kind.name(),
                        "period": period_class(e.kind),
                        "at": format_utc(e.at),
                    })
                })
                .collect();
            let doc = json!({
                "events": list,
                "exhausted": stream.exhausted,
                "abandoned": stream.abandoned.iter().map(|k| k.name()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            for e in &events {
                println!(
                    "{:<5} {:<14} {}  {}",
                    period_class(e.kind),
                    e.kind.name(),
                    format_utc(e.at),
                    e.at.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z")
                );
            }
            if stream.exhausted {
                eprintln!("warning: search budget exhausted, list may be incomplete");
            }
        }
    }
    Ok(())
}

/// Transits mark major periods, rises and sets minor ones.
fn period_class(kind: EventKind) -> &'static str {
    if kind.is_transit() { "major" } else { "minor" }
}

/// Local `HH:MM` span of `half_width` either side of `center`.
fn local_span(center: DateTime<Utc>, half_width: TimeDelta, tz: Tz) -> String {
    let fmt = |t: DateTime<Utc>| t.with_timezone(&tz).format("%H:%M").to_string();
    format!("{}-{}", fmt(center - half_width), fmt(center + half_width))
}

fn write_record_text(out: &mut impl Write, record: &DaySolunarRecord, tz: Tz) -> Result<()> {
    writeln!(out, "{}", record.date)?;
    for (i, t) in record.majors().into_iter().enumerate() {
        let span = t.map_or_else(|| "-".to_string(), |t| local_span(t, TimeDelta::hours(1), tz));
        writeln!(out, "  major {}  {span}", i + 1)?;
    }
    for (i, t) in record.minors().into_iter().enumerate() {
        let span = t.map_or_else(|| "-".to_string(), |t| local_span(t, TimeDelta::minutes(30), tz));
        writeln!(out, "  minor {}  {span}", i + 1)?;
    }
    let local = |t: Option<DateTime<Utc>>| {
        t.map_or_else(
            || "-".to_string(),
            |t| t.with_timezone(&tz).format("%H:%M").to_string(),
        )
    };
    writeln!(
        out,
        "  sunrise {}  sunset {}",
        local(record.sunrise_utc),
        local(record.sunset_utc)
    )?;
    writeln!(
        out,
        "  moon {:.1}% lit, age {:.1} d, {}",
        record.moon_illum, record.moon_age, record.moon_phase
    )?;
    writeln!(out, "  rating {} ({}/4)", record.rating, record.stars)?;
    Ok(())
}
