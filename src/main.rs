use hough3d_finder::config::finder as finder_config;
use hough3d_finder::diagnostics::FinderReport;
use hough3d_finder::io::{load_events, save_hough_projection_png, write_json_file};
use hough3d_finder::TrackFinder;
use log::info;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = finder_config::load_config(Path::new(&config_path))?;

    let mut finder = TrackFinder::from_files(config.geometry.clone(), config.finder.clone())
        .map_err(|e| e.to_string())?;
    let events = load_events(&config.events)?;
    info!("processing {} events from {}", events.len(), config.events.display());

    let mut reports = Vec::with_capacity(events.len());
    for (index, hits) in events.iter().enumerate() {
        let report = finder.process_event(hits);
        print_text_summary(index, &report);
        reports.push(report);
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &reports)?;
        println!("\nJSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.hough_png {
        save_hough_projection_png(finder.space(), path)?;
        println!("Hough projection written to {}", path.display());
    }
    Ok(())
}

fn print_text_summary(index: usize, report: &FinderReport) {
    let c = &report.counters;
    println!(
        "event {index}: {} hits ({} voting), {} clusters, {} tracks, {:.3} ms",
        c.hits,
        c.deposited_hits,
        c.clusters,
        report.tracks.len(),
        report.timings.total_ms
    );
    for (i, track) in report.tracks.iter().enumerate() {
        println!(
            "  track {i}: curvature={:+.5} /cm  azimuth={:+.4} rad  cot(theta)={:+.4}  hits={:?}",
            track.curvature, track.azimuth, track.polar_slope, track.related_hits
        );
    }
}

fn usage() -> String {
    "Usage: hough3d-finder <config.json>".to_string()
}
