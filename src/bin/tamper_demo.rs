use serde::Serialize;
use std::env;
use std::path::Path;
use tamper_detector::config::analyze::{load_config, AnalyzeToolConfig};
use tamper_detector::image::io::{load_pixel_grid, save_mask, save_pixel_grid, write_json_file};
use tamper_detector::recover::PatchOutcome;
use tamper_detector::{AnalyzerParams, TamperAnalyzer, TimingBreakdown};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: AnalyzeToolConfig = load_config(Path::new(&config_path))?;

    let original = load_pixel_grid(&config.original)?;
    let tampered = load_pixel_grid(&config.tampered)?;

    let detect = config.detect.to_options();
    let params = AnalyzerParams {
        recover: config.recover.to_options(detect),
        skip_lbp: false,
    };
    let analyzer = TamperAnalyzer::new(params);
    let report = analyzer
        .analyze(&original, &tampered)
        .map_err(|e| format!("Analysis failed: {e}"))?;

    save_mask(&report.mask, &config.output.mask_image)?;
    save_pixel_grid(&report.recovered, &config.output.recovered_image)?;

    let summary = AnalysisSummary {
        width: original.w,
        height: original.h,
        channels: original.channels,
        tampered_percentage: report.percentage,
        tampered_pixels: report.mask.count_true(),
        lbp_distance: report.lbp_distance,
        patches: report.patches.clone(),
        timing: report.timing,
    };
    write_json_file(&config.output.report_json, &summary)?;

    println!(
        "Tampered: {:.2}% of {}x{} pixels",
        report.percentage, original.w, original.h
    );
    if let Some(distance) = report.lbp_distance {
        println!("LBP chi-square distance: {distance:.6}");
    }
    println!(
        "Saved mask to {}, recovered image to {}, report to {}",
        config.output.mask_image.display(),
        config.output.recovered_image.display(),
        config.output.report_json.display()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: tamper_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisSummary {
    width: usize,
    height: usize,
    channels: usize,
    tampered_percentage: f32,
    tampered_pixels: usize,
    lbp_distance: Option<f64>,
    patches: Vec<PatchOutcome>,
    timing: TimingBreakdown,
}
