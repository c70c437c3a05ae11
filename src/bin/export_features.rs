// src/bin/export_features.rs

use anyhow::{bail, Context};
use std::env;
use std::fs::File;
use std::io::BufWriter;

use btc_dashboard_backend::services::export::write_csv;
use btc_dashboard_backend::services::features::{Dataset, DEFAULT_ROLLING_WINDOW};
use btc_dashboard_backend::services::loader::load_ticks_from_path;

fn main() -> anyhow::Result<()> {
    // Usage: cargo run --bin export_features -- input.csv output.csv [window]
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input.csv> <output.csv> [rolling_window]", args[0]);
        std::process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let window = match args.get(3) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid rolling window '{}'", raw))?,
        None => DEFAULT_ROLLING_WINDOW,
    };
    if window == 0 {
        bail!("Rolling window must be at least 1");
    }

    println!("Loading {}...", input);
    let ticks = load_ticks_from_path(input).with_context(|| format!("Failed to load {}", input))?;
    let dataset = Dataset::from_ticks(&ticks, window);

    println!("Writing {} rows to {}...", dataset.len(), output);
    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    write_csv(dataset.rows(), BufWriter::new(file), true)?;

    let gaps = dataset.gaps();
    println!(
        "Done: {} rows, {} years, {} duplicate rows, {} gaps ({} missing points)",
        dataset.len(),
        dataset.years().len(),
        dataset.duplicate_rows(),
        gaps.gap_count,
        gaps.missing_points
    );

    Ok(())
}
