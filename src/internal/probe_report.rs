#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

//! Measures how many bins `DoubleHashTable` lookups examine as the table fills, and plots
//! the averages and worst cases.

use std::{collections::HashSet, error::Error, ops::RangeInclusive};

use env_logger::Builder;
use log::{LevelFilter, info};
use plotters::prelude::*;
use primeprobe::{DoubleHashTable, TableError};
use rand::{Rng, distr::Alphanumeric};

/// Smallest number of keys measured
const MIN_KEYS: usize = 1_000;
/// Largest number of keys measured
const MAX_KEYS: usize = 100_000;
/// Number of key counts between `MIN_KEYS` and `MAX_KEYS`
const NUM_STEPS: usize = 10;
/// Keys looked up to measure misses
const MISS_SAMPLES: usize = 2_000;
/// Length of the generated keys
const KEY_LEN: RangeInclusive<usize> = 4..=12;

/// Lookup scenarios measured for each key count
const SERIES: [&str; 3] = ["Successful lookup", "Unsuccessful lookup", "Lookup after deletes"];

/// Probe statistics of one table size
#[derive(Debug)]
struct Measurement {
    /// Bins in the table once every key was inserted
    capacity: usize,
    /// Average probe length per scenario
    average: [f64; 3],
    /// Longest probe length per scenario
    worst: [usize; 3],
}

/// Installs an `env_logger` at info level, overridable through `RUST_LOG`
fn initialize_logger() {
    let mut builder = Builder::new();

    builder.filter_level(LevelFilter::Info).format_timestamp_millis().parse_default_env();

    // Avoid panicking if the logger was already initialized elsewhere.
    let _ = builder.try_init();
}

/// Generates `count` distinct random alphanumeric keys
fn unique_keys(rng: &mut impl Rng, count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);

    while keys.len() < count {
        let len = rng.random_range(KEY_LEN);
        let key: String = (0..len).map(|_| char::from(rng.sample::<u8, _>(Alphanumeric))).collect();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    keys
}

/// Average and maximum of a set of probe lengths
fn summarize(probes: &[usize]) -> (f64, usize) {
    let worst = probes.iter().copied().max().unwrap_or(0);
    if probes.is_empty() {
        return (0.0, worst);
    }
    (probes.iter().sum::<usize>() as f64 / probes.len() as f64, worst)
}

/// Loads a fresh table with `keys` and measures each lookup scenario
fn measure(keys: &[String], misses: &[String]) -> Result<Measurement, TableError> {
    let mut table = DoubleHashTable::new();
    for (value, key) in keys.iter().enumerate() {
        table.insert(key.as_str(), value)?;
    }
    let capacity = table.capacity();

    let hits: Vec<usize> = keys.iter().filter_map(|key| table.probe_length(key)).collect();
    let missed: Vec<usize> = misses.iter().filter_map(|key| table.probe_length(key)).collect();

    // Every other key becomes a tombstone that survivors have to probe past
    for key in keys.iter().step_by(2) {
        table.remove(key)?;
    }
    let survivors: Vec<usize> =
        keys.iter().skip(1).step_by(2).filter_map(|key| table.probe_length(key)).collect();

    let scenarios = [summarize(&hits), summarize(&missed), summarize(&survivors)];
    Ok(Measurement {
        capacity,
        average: scenarios.map(|(average, _)| average),
        worst: scenarios.map(|(_, worst)| worst),
    })
}

/// Draws one line per lookup scenario against the key counts
fn plot_series(
    path: &str,
    caption: &str,
    y_desc: &str,
    key_counts: &[usize],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50), // Bright red
        RGBColor(50, 90, 220), // Bright blue
        RGBColor(50, 180, 50), // Bright green
    ];

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flatten().copied().fold(1.0_f64, f64::max) * 1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..key_counts.len(), 0.0..max_y)?;

    let x_labels: Vec<String> = key_counts.iter().map(ToString::to_string).collect();

    chart
        .configure_mesh()
        .x_labels(key_counts.len())
        .x_label_formatter(&|x| x_labels.get(*x).cloned().unwrap_or_default())
        .x_desc("Number of Keys Inserted")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for ((name, points), color) in SERIES.iter().zip(series).zip(colors) {
        let line_style = ShapeStyle::from(&color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(points.iter().copied().enumerate(), line_style))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            points.iter().copied().enumerate().map(|point| Circle::new(point, 4, color.filled())),
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

/// Measures every key count, prints the summary and writes both charts
fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();

    let key_counts: Vec<usize> = (0..NUM_STEPS)
        .map(|i| MIN_KEYS + (MAX_KEYS - MIN_KEYS) * i / (NUM_STEPS - 1))
        .collect();

    // Misses are drawn from the same generator, so they never collide with stored keys
    let mut rng = rand::rng();
    let keys = unique_keys(&mut rng, MAX_KEYS + MISS_SAMPLES);
    let (stored, misses) = keys.split_at(MAX_KEYS);

    let mut averages: Vec<Vec<f64>> = vec![Vec::new(); SERIES.len()];
    let mut worst_cases: Vec<Vec<f64>> = vec![Vec::new(); SERIES.len()];

    for &n_keys in &key_counts {
        info!("Measuring a table holding {n_keys} keys");
        let measurement = measure(&stored[..n_keys], misses)?;

        for (scenario, &name) in SERIES.iter().enumerate() {
            averages[scenario].push(measurement.average[scenario]);
            worst_cases[scenario].push(measurement.worst[scenario] as f64);
            println!(
                "  {n_keys} keys / {} bins, {name}: Avg probes = {:.2}, Worst = {}",
                measurement.capacity, measurement.average[scenario], measurement.worst[scenario]
            );
        }
    }

    plot_series(
        "average_probes.png",
        "Average Probe Length by Lookup Scenario",
        "Average Lookup Time (probes)",
        &key_counts,
        &averages,
    )?;
    plot_series(
        "worst_case_probes.png",
        "Worst-Case Probe Length by Lookup Scenario",
        "Worst-Case Probe Complexity",
        &key_counts,
        &worst_cases,
    )?;

    println!("Generated plot images: average_probes.png, worst_case_probes.png");

    Ok(())
}
