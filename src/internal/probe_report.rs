#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::arithmetic_side_effects)]

//! Probe length report for `QuadraticMap`.
//!
//! Inserts random keys into maps built with each selected hash function, samples probe lengths
//! while the table grows, then removes every other key and samples again to show the cost of
//! tombstones. Results are printed and plotted.

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser, ValueEnum};
use plotters::prelude::*;
use quadmap::{
    HashFn, QuadraticMap,
    hash::{additive_hash, default_hash, positional_hash},
};
use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};
use tracing::{debug, info, level_filters::LevelFilter};

// Number of samples taken while inserting
const CHECKPOINTS: usize = 20;

const COLORS: [RGBColor; 3] = [
    RGBColor(220, 50, 50),  // Bright red
    RGBColor(50, 90, 220),  // Bright blue
    RGBColor(50, 180, 50),  // Bright green
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Hasher {
    /// Sum of character codes
    Additive,
    /// Sum of position-weighted character codes
    Positional,
    /// `std` SipHash with fixed keys
    Default,
}

impl Hasher {
    fn function(self) -> HashFn {
        match self {
            Self::Additive => additive_hash,
            Self::Positional => positional_hash,
            Self::Default => default_hash,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Positional => "positional",
            Self::Default => "default",
        }
    }
}

/// Measure quadratic probing behaviour under growth and removal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Requested initial capacity (rounded up to a prime)
    #[arg(long, default_value_t = 53)]
    capacity: usize,

    /// Number of random keys to insert
    #[arg(long, default_value_t = 10_000)]
    keys: usize,

    /// Length of each random key
    #[arg(long, default_value_t = 8)]
    key_length: usize,

    /// Seed for the key generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Hash functions to compare; all of them when omitted
    #[arg(long = "hasher", value_enum)]
    hashers: Vec<Hasher>,

    /// Directory receiving the PNG charts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip rendering charts
    #[arg(long)]
    no_plots: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    inserted: usize,
    live: usize,
    capacity: usize,
    load: f64,
    average_probes: f64,
    worst_probes: usize,
}

#[derive(Debug)]
struct Report {
    hasher: Hasher,
    growth: Vec<Checkpoint>,
    after_removal: Checkpoint,
    // Average probe length of lookups for removed keys
    missing_probes: f64,
}

fn configure_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(format!("quadmap={level},probe_report={level}"))
        .init();
}

fn random_keys(count: usize, length: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (&mut rng).sample_iter(Alphanumeric).take(length).map(char::from).collect())
        .collect()
}

/// Average and worst probe length over `keys`
fn probe_lengths(
    map: &QuadraticMap<usize>,
    keys: impl Iterator<Item = impl AsRef<str>>,
) -> (f64, usize) {
    let (total, worst, count) = keys.fold((0usize, 0usize, 0usize), |(total, worst, count), key| {
        let probes = map.probe_length(key.as_ref());
        (total + probes, worst.max(probes), count + 1)
    });

    if count == 0 { (0.0, worst) } else { (total as f64 / count as f64, worst) }
}

fn checkpoint(
    map: &QuadraticMap<usize>,
    inserted: usize,
    keys: impl Iterator<Item = impl AsRef<str>>,
) -> Checkpoint {
    let (average_probes, worst_probes) = probe_lengths(map, keys);
    Checkpoint {
        inserted,
        live: map.len(),
        capacity: map.capacity(),
        load: map.table_load(),
        average_probes,
        worst_probes,
    }
}

fn measure(hasher: Hasher, keys: &[String], capacity: usize) -> Report {
    let mut map = QuadraticMap::with_hasher(capacity, hasher.function());
    let interval = (keys.len() / CHECKPOINTS).max(1);
    let mut growth = Vec::with_capacity(CHECKPOINTS + 1);

    for (inserted, key) in (1..).zip(keys) {
        map.put(key.as_str(), inserted);
        if inserted % interval == 0 || inserted == keys.len() {
            growth.push(checkpoint(&map, inserted, keys.iter().take(inserted)));
        }
    }
    debug!(hasher = hasher.label(), capacity = map.capacity(), "Insertion finished.");

    for key in keys.iter().step_by(2) {
        map.remove(key);
    }

    let after_removal = checkpoint(&map, keys.len(), keys.iter().skip(1).step_by(2));
    let (missing_probes, _) = probe_lengths(&map, keys.iter().step_by(2));

    Report { hasher, growth, after_removal, missing_probes }
}

fn print_report(report: &Report) {
    println!("{} hash", report.hasher.label());
    println!(
        "  {:>8} {:>8} {:>9} {:>6} {:>10} {:>6}",
        "inserted", "live", "capacity", "load", "avg probes", "worst"
    );
    for point in report.growth.iter().chain(std::iter::once(&report.after_removal)) {
        println!(
            "  {:>8} {:>8} {:>9} {:>6.2} {:>10.2} {:>6}",
            point.inserted,
            point.live,
            point.capacity,
            point.load,
            point.average_probes,
            point.worst_probes
        );
    }
    println!(
        "  after removing every other key: avg probes for removed keys = {:.2}",
        report.missing_probes
    );
}

fn plot_growth(
    path: &Path,
    caption: &str,
    y_desc: &str,
    reports: &[Report],
    value: impl Fn(&Checkpoint) -> f64,
) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let points = || reports.iter().flat_map(|report| report.growth.iter());
    let max_x = points().map(|point| point.inserted).max().unwrap_or(0).max(1);
    let max_y = points().map(&value).fold(0.0, f64::max).max(1.0) * 1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..max_x, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (report, color) in reports.iter().zip(COLORS.iter().cycle()) {
        let line_style = ShapeStyle::from(color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(
                report.growth.iter().map(|point| (point.inserted, value(point))),
                line_style,
            ))?
            .label(report.hasher.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            report
                .growth
                .iter()
                .map(|point| Circle::new((point.inserted, value(point)), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let hashers =
        if args.hashers.is_empty() { Hasher::value_variants().to_vec() } else { args.hashers };

    info!(keys = args.keys, key_length = args.key_length, seed = args.seed, "Generating keys.");
    let keys = random_keys(args.keys, args.key_length, args.seed);

    let reports: Vec<Report> =
        hashers.into_iter().map(|hasher| measure(hasher, &keys, args.capacity)).collect();

    for report in &reports {
        print_report(report);
    }

    if args.no_plots {
        return Ok(());
    }

    fs::create_dir_all(&args.output_dir)?;
    let probes_path = args.output_dir.join("average_probe_length.png");
    let capacity_path = args.output_dir.join("capacity_growth.png");

    plot_growth(
        &probes_path,
        "Average Probe Length While Growing",
        "Average Probe Length (slots)",
        &reports,
        |point| point.average_probes,
    )?;
    plot_growth(&capacity_path, "Capacity Growth", "Buckets", &reports, |point| {
        point.capacity as f64
    })?;

    info!(
        probes = %probes_path.display(),
        capacity = %capacity_path.display(),
        "Generated plot images."
    );

    Ok(())
}
