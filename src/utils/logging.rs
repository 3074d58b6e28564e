//! Logging helpers
//!
//! Subscriber setup plus the banner/summary lines of a run

use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Dataset, HandleCoverage, Track};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise info, or debug with `verbose`.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,speaker_scrape={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Speaker scraper starting");
    info!(
        "⚡ Modal {}ms | Close {}ms | Card list {}ms | Retries {}",
        config.modal_timeout_ms, config.modal_close_timeout_ms, config.card_list_timeout_ms, config.modal_retries
    );
    info!("📊 Tracks to scrape: {} (max {} at once)", config.tracks.len(), config.max_concurrent_tracks);
    for (i, track) in config.tracks.iter().enumerate() {
        info!("  {:2}. {:20} -> {}", i + 1, track.label(), track.path);
    }
    info!("{}", "=".repeat(60));
}

pub fn log_track_start(track: &Track, url: &str) {
    info!("\n[{}] {}", track.id, "─".repeat(30));
    info!("[{}] URL: {}", track.id, url);
}

pub fn log_track_complete(track: &Track, seen: usize, captured: usize, failed: usize, coverage: HandleCoverage) {
    info!(
        "[{}] ✓ {}/{} speakers | failed {} | X:{} IG:{} LI:{}",
        track.id, captured, seen, failed, coverage.with_x, coverage.with_instagram, coverage.with_linkedin
    );
}

/// Final statistics of the run
pub fn print_run_summary(dataset: &Dataset, configured_tracks: usize, elapsed: Duration) {
    let total = dataset.total_records();
    let coverage = dataset.coverage();
    let secs = elapsed.as_secs_f64();

    info!("\n{}", "=".repeat(60));
    info!("📊 FINAL SUMMARY");
    info!("Finished at: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
    info!("⏱  Time: {:.1}s ({:.1} minutes)", secs, secs / 60.0);
    if secs > 0.0 {
        info!("⚡ Speed: {:.1} speakers/second", total as f64 / secs);
    }
    info!("📊 Tracks: {}/{}", dataset.sections.len(), configured_tracks);
    info!("👥 Total speakers (deduplicated): {}", total);
    info!("🐦 X: {}/{} ({:.1}%)", coverage.with_x, total, percent(coverage.with_x, total));
    info!("📷 IG: {}/{} ({:.1}%)", coverage.with_instagram, total, percent(coverage.with_instagram, total));
    info!("💼 LI: {}/{} ({:.1}%)", coverage.with_linkedin, total, percent(coverage.with_linkedin, total));

    info!("\nBREAKDOWN BY TRACK:");
    info!("{}", "─".repeat(60));
    for section in &dataset.sections {
        let stats = &section.stats;
        let first = section.records.first().map(|r| truncate_text(&r.name, 30));
        info!(
            "{:20} | kept {:3}/{:3} | dup {:2} | failed {:2} | 1st: {}",
            section.track.label(),
            stats.kept,
            stats.seen,
            stats.duplicates,
            stats.failed,
            first.as_deref().unwrap_or("N/A")
        );
    }
    for unavailable in &dataset.unavailable {
        info!("{:20} | ❌ unavailable: {}", unavailable.track.label(), unavailable.reason);
    }
    info!("{}", "=".repeat(60));
}

fn percent(part: usize, total: usize) -> f64 {
    part as f64 / total.max(1) as f64 * 100.0
}

/// Shorten long text for log lines
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
