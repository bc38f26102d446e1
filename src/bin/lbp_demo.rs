use serde::Serialize;
use std::env;
use std::path::Path;
use tamper_detector::config::lbp::{load_config, LbpToolConfig};
use tamper_detector::image::io::{load_pixel_grid, write_json_file};
use tamper_detector::lbp::{chi_square_distance, compute_lbp};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: LbpToolConfig = load_config(Path::new(&config_path))?;

    let grid = load_pixel_grid(&config.input)?;
    let histogram = compute_lbp(&grid);

    let distance = match &config.compare {
        Some(path) => {
            let other = load_pixel_grid(path)?;
            Some(chi_square_distance(&histogram, &compute_lbp(&other)))
        }
        None => None,
    };

    let summary = LbpSummary {
        width: grid.w,
        height: grid.h,
        sampled_pixels: histogram.total(),
        chi_square_distance: distance,
        counts: histogram.bins().to_vec(),
    };
    write_json_file(&config.output.histogram_json, &summary)?;

    println!(
        "Histogram over {} interior pixels saved to {}",
        summary.sampled_pixels,
        config.output.histogram_json.display()
    );
    if let Some(distance) = distance {
        println!("Chi-square distance to comparison image: {distance:.6}");
    }

    Ok(())
}

fn usage() -> String {
    "Usage: lbp_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LbpSummary {
    width: usize,
    height: usize,
    sampled_pixels: u64,
    chi_square_distance: Option<f64>,
    counts: Vec<u32>,
}
