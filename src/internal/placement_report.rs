//! Fills tables with random keys at increasing load and charts where the keys end up:
//! home bucket, probed bucket or overflow chain.

#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::Parser;
use plotters::prelude::*;
use quadchain::{Table, TableStats};
use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};
use tracing::{debug, info};

/// Placement report for the quadchain table
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of buckets in every table
    #[arg(long, default_value_t = 65_536)]
    buckets: usize,

    /// Number of load levels between 10% and 95%
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(2..))]
    steps: u16,

    /// Maximum key length; keys are between 1 and this many characters
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u16).range(1..))]
    key_len: u16,

    /// Seed for key generation
    #[arg(long, default_value_t = 2021)]
    seed: u64,

    /// Where to write the chart
    #[arg(long, default_value = "placement.png")]
    output: PathBuf,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long)]
    quiet: bool,
}

/// Placement statistics at one load level
#[derive(Debug)]
struct Sample {
    /// Keys inserted relative to the bucket count
    load: f64,
    /// Statistics after inserting
    stats: TableStats,
}

/// Series drawn in the chart
const SERIES: [&str; 3] = ["Home bucket", "Probed", "Chained"];

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.quiet);

    let steps = usize::from(cli.steps);
    let loads: Vec<f64> =
        (0..steps).map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((steps - 1) as f64)).collect();

    // Generate keys once so that every load level sees a prefix of the same sequence
    let most = loads.iter().map(|load| (cli.buckets as f64 * load) as usize).max().unwrap_or(0);
    let keys = random_keys(cli.seed, most, usize::from(cli.key_len));
    info!(buckets = cli.buckets, keys = keys.len(), "Generated keys.");

    let mut samples = Vec::with_capacity(loads.len());
    for load in loads {
        let count = (cli.buckets as f64 * load) as usize;
        let mut table = Table::with_capacity(cli.buckets)?;
        for key in keys.iter().take(count) {
            table.set(key.as_str(), ())?;
        }

        let stats = table.stats();
        debug!(load, ?stats, "Filled table.");
        println!(
            "load {:>5.2}: {:>8} keys, home {:>6.2}%, probed {:>6.2}%, chained {:>6.2}%, longest chain {}",
            load,
            stats.len,
            stats.home_percent(),
            stats.probed_percent(),
            stats.chained_percent(),
            stats.longest_chain,
        );
        samples.push(Sample { load, stats });
    }

    draw(&cli.output, &samples)?;
    info!(path = %cli.output.display(), "Wrote chart.");

    Ok(())
}

/// Generates `count` alphanumeric keys of 1 to `max_len` characters
fn random_keys(seed: u64, count: usize, max_len: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.random_range(1..=max_len);
            (&mut rng).sample_iter(Alphanumeric).take(len).map(char::from).collect()
        })
        .collect()
}

/// Renders one line per placement kind against the load level
fn draw(path: &Path, samples: &[Sample]) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(50, 180, 50), RGBColor(50, 90, 220), RGBColor(220, 50, 50)];
    let line_width = 2;
    let marker_size = 4;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Where keys land as the table fills up", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..100.0)?;

    chart
        .configure_mesh()
        .x_desc("Keys inserted / buckets")
        .y_desc("Share of stored keys (%)")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (series, name) in SERIES.iter().enumerate() {
        let color = colors.get(series).copied().unwrap_or(BLACK);
        let line_style = ShapeStyle::from(&color).stroke_width(line_width);
        let points: Vec<(f64, f64)> = samples
            .iter()
            .map(|sample| {
                let share = match series {
                    0 => sample.stats.home_percent(),
                    1 => sample.stats.probed_percent(),
                    _ => sample.stats.chained_percent(),
                };
                (sample.load, share)
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
        chart.draw_series(
            points.into_iter().map(|point| Circle::new(point, marker_size, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Installs a stderr subscriber; `-v` raises the level step by step, `-q` turns it off
fn configure_logging(verbose: u8, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;

    let mut level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if quiet {
        level = LevelFilter::OFF;
    }

    let filter = format!("off,quadchain={level},quadchain_report={level}");
    let format = fmt::format().with_target(false).compact();

    tracing_subscriber::fmt()
        .event_format(format)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
