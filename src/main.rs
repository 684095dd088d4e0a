use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

// Use library instead of local modules
use cafe_ranker::{
    filter_cafe_like, round_meters, venues_from_payload,
    Config, Coordinate, RankingEngine, Venue, VenueSummary,
};

const USAGE: &str = "\
Usage:
  cafe-ranker distance <lat1> <lon1> <lat2> <lon2>
  cafe-ranker top <payload.json> <lat> <lon> [n] [--csv]
  cafe-ranker nearest <payload.json> <lat> <lon> [--csv]

<payload.json> is a saved nearby-search response (or a bare array of place records).";

fn main() -> Result<()> {
    // Logs go to stderr so --csv output stays clean; quieter default than the server
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let csv_output = take_flag(&mut args, "--csv");

    match args.first().map(String::as_str) {
        Some("distance") => run_distance(&args[1..]),
        Some("top") => run_top(&args[1..], csv_output),
        Some("nearest") => run_nearest(&args[1..], csv_output),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn run_distance(args: &[String]) -> Result<()> {
    let [lat1, lon1, lat2, lon2] = args else {
        bail!("distance needs exactly 4 arguments\n\n{}", USAGE);
    };

    let from = Coordinate::parse_named(("lat1", lat1.as_str()), ("lon1", lon1.as_str()))?;
    let to = Coordinate::parse_named(("lat2", lat2.as_str()), ("lon2", lon2.as_str()))?;
    let meters = from.distance_to(&to);

    println!("{:.2} m", round_meters(meters));
    Ok(())
}

fn run_top(args: &[String], csv_output: bool) -> Result<()> {
    let (payload, lat, lon, rest) = match args {
        [payload, lat, lon, rest @ ..] if rest.len() <= 1 => (payload, lat, lon, rest),
        _ => bail!("top needs <payload.json> <lat> <lon> [n]\n\n{}", USAGE),
    };

    let config = Config::load()?;
    let n = match rest.first() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid result count: {:?}", raw))?,
        None => config.top_n,
    };

    let origin = Coordinate::parse(lat, lon)?;
    let candidates = filter_cafe_like(&load_payload(Path::new(payload))?);

    let engine = RankingEngine::new(Arc::new(config.priority_registry()?));
    let ranked = engine.rank_top_n(origin, &candidates, n)?;

    let summaries: Vec<VenueSummary> = ranked.iter().map(|r| r.summary(true)).collect();
    print_summaries(&format!("☕ Top {} cafes", n), &summaries, csv_output)
}

fn run_nearest(args: &[String], csv_output: bool) -> Result<()> {
    let [payload, lat, lon] = args else {
        bail!("nearest needs <payload.json> <lat> <lon>\n\n{}", USAGE);
    };

    let config = Config::load()?;
    let origin = Coordinate::parse(lat, lon)?;
    let candidates = filter_cafe_like(&load_payload(Path::new(payload))?);

    let engine = RankingEngine::new(Arc::new(config.priority_registry()?));
    let nearest = engine.select_nearest_two_unique(origin, &candidates);

    let summaries: Vec<VenueSummary> = nearest.iter().map(|r| r.summary(false)).collect();
    print_summaries("📍 Nearest 2 cafes", &summaries, csv_output)
}

fn load_payload(path: &Path) -> Result<Vec<Venue>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file: {:?}", path))?;

    let payload: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse payload JSON: {:?}", path))?;

    Ok(venues_from_payload(&payload))
}

fn print_summaries(title: &str, summaries: &[VenueSummary], csv_output: bool) -> Result<()> {
    if csv_output {
        let mut writer = csv::Writer::from_writer(io::stdout());
        for summary in summaries {
            writer.serialize(summary)?;
        }
        writer.flush()?;
        return Ok(());
    }

    println!("{}", title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if summaries.is_empty() {
        println!("No cafes found nearby");
        return Ok(());
    }

    for (i, s) in summaries.iter().enumerate() {
        let star = if s.priority == Some(true) { " ⭐" } else { "" };
        println!("{}. {}{} - {:.2} m", i + 1, s.name, star, s.distance_meters);
        println!("   {}", s.address);
        println!("   {}", s.google_maps_link);
    }

    Ok(())
}
