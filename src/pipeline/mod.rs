//! Pipeline orchestration
//!
//! Coordinates file discovery, parallel analysis, sequencing and export for
//! the command line tools. The HTTP service shares `BatchAnalyzer`.

pub mod batch;

pub use batch::{records, BatchAnalyzer, BatchSummary, UploadedFile};

use crate::config::{AnalyzeSettings, OrderSettings};
use crate::discovery::{self, DiscoveredFile};
use crate::error::{DjorderError, Result};
use crate::export;
use crate::mixing::{self, order_tracks, Sequence};
use crate::types::{Extracted, FileAnalysis, TrackDescriptor};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configure the Rayon thread pool
pub fn configure_thread_pool(num_threads: usize) -> Result<()> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(()) => {
            debug!("Configured thread pool with {} threads", num_threads);
        }
        Err(e) => {
            // If the pool is already initialized (e.g., in tests), that's OK
            if e.to_string().contains("already been initialized") {
                debug!("Thread pool already initialized, using existing pool");
            } else {
                return Err(DjorderError::ConfigError(format!(
                    "Failed to configure thread pool: {}",
                    e
                )));
            }
        }
    }
    Ok(())
}

/// Order a JSON track list file
///
/// Writes the ordered list to the output file, or stdout when none is set.
pub fn run_order(settings: &OrderSettings) -> Result<Sequence<TrackDescriptor>> {
    let tracks = export::read_tracks(&settings.input)?;
    info!("Ordering {} tracks from {}", tracks.len(), settings.input.display());

    let sequence = mixing::sequence(tracks)?;
    log_transitions(&sequence);

    match &settings.output {
        Some(path) => export::write_json(&sequence.tracks, path)?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &sequence.tracks).map_err(|e| {
                DjorderError::OutputError {
                    path: "<stdout>".into(),
                    reason: e.to_string(),
                }
            })?;
            writeln!(lock)?;
        }
    }

    Ok(sequence)
}

fn log_transitions(sequence: &Sequence<TrackDescriptor>) {
    for (pair, cost) in sequence.tracks.windows(2).zip(&sequence.transitions) {
        let delta = cost
            .tempo_delta
            .map(|d| format!("{:.1} BPM", d))
            .unwrap_or_else(|| "tempo unknown".to_string());
        info!(
            "{} -> {}: {:?} key (+{}), {} (+{})",
            pair[0].title, pair[1].title, cost.key, cost.key_penalty, delta, cost.tempo_penalty
        );
    }
    info!("Total transition cost: {:.1}", sequence.total_cost());
}

/// Analyze audio files on disk and write their records as JSON
pub fn run_analyze(settings: &AnalyzeSettings) -> Result<BatchSummary> {
    let pipeline_start = Instant::now();

    configure_thread_pool(settings.analysis.threads)?;

    // Phase 1: Discovery
    info!("Scanning for audio files...");
    let files = discovery::scan(&settings.input, settings.recursive)?;

    // Phase 2: Analysis
    let analyzer = BatchAnalyzer::from_settings(&settings.analysis);
    let analysis_start = Instant::now();
    let results = analyze_files(&analyzer, &files, settings.show_progress);
    info!(
        "Analysis completed in {:.2}s",
        analysis_start.elapsed().as_secs_f64()
    );

    let summary = BatchSummary::from_results(&results);
    let records = records(&results);

    // Phase 3: Export
    if settings.order {
        let tracks: Vec<TrackDescriptor> = records.into_iter().map(TrackDescriptor::from).collect();
        let ordered = order_tracks(tracks)?;
        export::write_json(&ordered, &settings.output)?;
    } else {
        export::write_json(&records, &settings.output)?;
    }

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Read and analyze files in parallel, keeping discovery order
fn analyze_files(
    analyzer: &BatchAnalyzer,
    files: &[DiscoveredFile],
    show_progress: bool,
) -> Vec<FileAnalysis> {
    let progress_bar = if show_progress && !files.is_empty() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let results: Vec<FileAnalysis> = files
        .par_iter()
        .map(|file| {
            let name = file.file_name();
            let result = match std::fs::read(&file.path) {
                Ok(bytes) => analyzer.analyze_one(&name, &bytes),
                Err(e) => {
                    warn!("Skipping {}: {}", file.path.display(), e);
                    FileAnalysis {
                        title: name.clone(),
                        features: Extracted::Failed(e.to_string()),
                        artwork: Extracted::Failed(e.to_string()),
                    }
                }
            };
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
                pb.set_message(name);
            }
            result
        })
        .collect();

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    results
}
