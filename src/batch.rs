//! Parallel batch parsing of plan files using rayon
//!
//! Reads many plan documents concurrently with progress reporting and
//! per-file error collection. Parsing itself is total, so only unreadable
//! files count as failures.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::models::WorkoutPlan;
use crate::parser::PlanParser;

/// File extensions scanned when parsing a directory
const PLAN_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Configuration for batch parse operations
#[derive(Debug, Clone)]
pub struct BatchParseConfig {
    /// Number of threads for parallel processing
    pub num_threads: Option<usize>,
    /// Show progress bar during parsing
    pub show_progress: bool,
    /// Continue processing when a file cannot be read
    pub continue_on_error: bool,
}

impl Default for BatchParseConfig {
    fn default() -> Self {
        Self {
            num_threads: None, // Use rayon default (number of CPUs)
            show_progress: true,
            continue_on_error: true,
        }
    }
}

/// Result of parsing a single file in batch context
#[derive(Debug, Clone)]
pub struct FileParseResult {
    /// Path to the file that was processed
    pub file_path: PathBuf,
    /// Parsed plan, if the file could be read
    pub plan: Option<WorkoutPlan>,
    /// Duration in milliseconds for this file
    pub duration_ms: u128,
    /// Whether the file was read and parsed
    pub success: bool,
    /// Error message if the file could not be read
    pub error: Option<String>,
}

/// Summary of a batch parse operation
#[derive(Debug, Clone)]
pub struct BatchParseSummary {
    /// Total files processed
    pub total_files: usize,
    /// Files successfully parsed
    pub successful_files: usize,
    /// Files with errors
    pub failed_files: usize,
    /// Total workout days across all parsed plans
    pub total_days: usize,
    /// Total duration in milliseconds
    pub total_duration_ms: u128,
    /// Per-file results
    pub results: Vec<FileParseResult>,
    /// Errors encountered
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchParseSummary {
    /// Get throughput (files per second)
    pub fn throughput_files_per_sec(&self) -> f64 {
        if self.total_duration_ms == 0 {
            return 0.0;
        }
        (self.successful_files as f64 / self.total_duration_ms as f64) * 1000.0
    }

    /// Get average time per file
    pub fn avg_time_per_file_ms(&self) -> f64 {
        if self.successful_files == 0 {
            return 0.0;
        }
        self.total_duration_ms as f64 / self.successful_files as f64
    }

    /// Check if every file was parsed
    pub fn is_fully_successful(&self) -> bool {
        self.failed_files == 0
    }

    /// Get human-readable summary
    pub fn to_string_pretty(&self) -> String {
        format!(
            "Batch Parse Summary\n  \
             Total Files: {}\n  \
             Successful: {}\n  \
             Failed: {}\n  \
             Workout Days: {}\n  \
             Total Time: {:.2}s\n  \
             Throughput: {:.2} files/sec\n  \
             Avg Time/File: {:.2}ms",
            self.total_files,
            self.successful_files,
            self.failed_files,
            self.total_days,
            self.total_duration_ms as f64 / 1000.0,
            self.throughput_files_per_sec(),
            self.avg_time_per_file_ms()
        )
    }

    fn empty() -> Self {
        Self {
            total_files: 0,
            successful_files: 0,
            failed_files: 0,
            total_days: 0,
            total_duration_ms: 0,
            results: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Batch plan parser
pub struct BatchParser {
    pub config: BatchParseConfig,
    days_per_week: Option<u8>,
}

impl BatchParser {
    /// Create new batch parser with default config
    pub fn new(days_per_week: Option<u8>) -> Self {
        Self::with_config(BatchParseConfig::default(), days_per_week)
    }

    /// Create with custom configuration
    pub fn with_config(config: BatchParseConfig, days_per_week: Option<u8>) -> Self {
        Self {
            config,
            days_per_week,
        }
    }

    /// Parse multiple files in parallel
    pub fn parse_files(
        &self,
        file_paths: &[PathBuf],
    ) -> Result<(Vec<WorkoutPlan>, BatchParseSummary)> {
        let start_time = std::time::Instant::now();

        info!("Starting batch parse of {} files", file_paths.len());

        let progress = if self.config.show_progress {
            Some(ProgressBar::new(file_paths.len() as u64))
        } else {
            None
        };

        if let Some(ref pb) = progress {
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                    .unwrap()
                    .progress_chars("#>-"),
            );
        }

        // Thread-safe shared state for result collection
        let results = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));

        if let Some(num_threads) = self.config.num_threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

            pool.install(|| self.process_files(file_paths, &progress, &results, &errors));
        } else {
            self.process_files(file_paths, &progress, &results, &errors);
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Complete");
        }

        let total_duration_ms = start_time.elapsed().as_millis();

        let mut results_vec = Arc::try_unwrap(results)
            .map(|m| m.lock().unwrap().clone())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone());
        let errors_vec = Arc::try_unwrap(errors)
            .map(|m| m.lock().unwrap().clone())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone());

        // Completion order is nondeterministic; restore input order
        results_vec.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        let (successful, failed) = results_vec.iter().fold(
            (0, 0),
            |(s, f), r| {
                if r.success {
                    (s + 1, f)
                } else {
                    (s, f + 1)
                }
            },
        );

        let plans: Vec<WorkoutPlan> = results_vec
            .iter()
            .filter_map(|r| r.plan.clone())
            .collect();
        let total_days = plans.iter().map(|p| p.weekly_schedule.len()).sum();

        let summary = BatchParseSummary {
            total_files: file_paths.len(),
            successful_files: successful,
            failed_files: failed,
            total_days,
            total_duration_ms,
            results: results_vec,
            errors: errors_vec,
        };

        info!("{}", summary.to_string_pretty());

        if !self.config.continue_on_error {
            if let Some((path, msg)) = summary.errors.first() {
                anyhow::bail!("Failed to read {}: {}", path.display(), msg);
            }
        }

        Ok((plans, summary))
    }

    /// Parse every plan file in a directory
    pub fn parse_directory(&self, dir_path: &Path) -> Result<(Vec<WorkoutPlan>, BatchParseSummary)> {
        debug!("Scanning directory for plan files: {:?}", dir_path);

        if !dir_path.is_dir() {
            anyhow::bail!("Path is not a directory: {}", dir_path.display());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir_path)? {
            let entry = entry?;
            let path = entry.path();

            let is_plan_file = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| PLAN_EXTENSIONS.contains(&e))
                .unwrap_or(false);
            if path.is_file() && is_plan_file {
                files.push(path);
            }
        }

        if files.is_empty() {
            warn!("No plan files found in directory: {}", dir_path.display());
            return Ok((Vec::new(), BatchParseSummary::empty()));
        }

        info!("Found {} plan files in directory", files.len());
        self.parse_files(&files)
    }

    fn process_files(
        &self,
        file_paths: &[PathBuf],
        progress: &Option<ProgressBar>,
        results: &Arc<Mutex<Vec<FileParseResult>>>,
        errors: &Arc<Mutex<Vec<(PathBuf, String)>>>,
    ) {
        file_paths.par_iter().for_each_with(
            (progress.clone(), results.clone(), errors.clone()),
            |(pb, res, err), file_path| {
                let file_start = std::time::Instant::now();

                match std::fs::read_to_string(file_path) {
                    Ok(raw_text) => {
                        let plan = PlanParser::parse(&raw_text, self.days_per_week);
                        let duration_ms = file_start.elapsed().as_millis();
                        debug!(
                            "Parsed {:?} ({} days, {:.2}ms)",
                            file_path,
                            plan.weekly_schedule.len(),
                            duration_ms
                        );

                        let result = FileParseResult {
                            file_path: file_path.clone(),
                            plan: Some(plan),
                            duration_ms,
                            success: true,
                            error: None,
                        };

                        if let Ok(mut r) = res.lock() {
                            r.push(result);
                        }
                    }
                    Err(e) => {
                        let duration_ms = file_start.elapsed().as_millis();
                        let error_msg = e.to_string();
                        warn!(
                            "Failed to read {:?}: {} ({:.2}ms)",
                            file_path, error_msg, duration_ms
                        );

                        let result = FileParseResult {
                            file_path: file_path.clone(),
                            plan: None,
                            duration_ms,
                            success: false,
                            error: Some(error_msg.clone()),
                        };

                        if let Ok(mut r) = res.lock() {
                            r.push(result);
                        }

                        if let Ok(mut e) = err.lock() {
                            e.push((file_path.clone(), error_msg));
                        }
                    }
                }

                if let Some(p) = pb {
                    p.inc(1);
                }
            },
        );
    }
}

impl Default for BatchParser {
    fn default() -> Self {
        Self::new(None)
    }
}
