// Geoaudit - transcript query verification
//
// Copyright (c) 2025 Geoaudit contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Batch verification of many transcripts against one spec table.
//!
//! Transcripts are independent, so a batch fans them out over the rayon
//! pool once it is large enough to be worth it. A transcript that cannot be
//! read is recorded as unreadable and the rest of the batch carries on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use geoaudit_cli::batch::{BatchConfig, BatchVerifier};
//! use geoaudit_core::VerifyOptions;
//! use geoaudit_csv::load_specs;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let specs = load_specs(&std::fs::read_to_string("expected.csv")?)?;
//! let verifier = BatchVerifier::new(specs, VerifyOptions::default(), BatchConfig::default());
//!
//! let files = vec![PathBuf::from("run1.log"), PathBuf::from("run2.log")];
//! let report = verifier.run(&files)?;
//!
//! for (path, summary) in report.summaries() {
//!     println!("{}: {:.1}% match", path.display(), summary.match_rate());
//! }
//! println!("{:.1} transcripts/s", report.throughput());
//! # Ok(())
//! # }
//! ```

use crate::commands::read_file;
use crate::error::CliError;
use colored::Colorize;
use geoaudit_core::{verify, SpecSet, Summary, VerifyOptions};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::debug;

/// Configuration for batch verification.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Minimum number of transcripts to trigger parallel verification.
    ///
    /// Default: 10
    pub parallel_threshold: usize,

    /// Maximum number of worker threads. `None` uses rayon's default pool.
    pub max_threads: Option<usize>,

    /// Print a progress line per transcript on stderr.
    pub verbose: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 10,
            max_threads: None,
            verbose: false,
        }
    }
}

/// Outcome of verifying one transcript file.
#[derive(Debug, Clone)]
pub struct TranscriptRun {
    pub path: PathBuf,
    /// The per-case summary, or why the transcript could not be read.
    pub result: Result<Summary, CliError>,
}

impl TranscriptRun {
    pub fn is_verified(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every transcript of a batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub runs: Vec<TranscriptRun>,
    /// Wall-clock time of the whole batch in milliseconds.
    pub elapsed_ms: u128,
}

impl BatchReport {
    pub fn new(runs: Vec<TranscriptRun>, elapsed_ms: u128) -> Self {
        Self { runs, elapsed_ms }
    }

    pub fn total_files(&self) -> usize {
        self.runs.len()
    }

    /// Number of transcripts that could not be read.
    pub fn failure_count(&self) -> usize {
        self.runs.iter().filter(|r| !r.is_verified()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.runs.iter().any(|r| !r.is_verified())
    }

    /// Verified transcripts with their summaries.
    pub fn summaries(&self) -> impl Iterator<Item = (&Path, &Summary)> {
        self.runs
            .iter()
            .filter_map(|r| r.result.as_ref().ok().map(|s| (r.path.as_path(), s)))
    }

    /// Transcripts that could not be read, with the reason.
    pub fn unreadable(&self) -> impl Iterator<Item = (&Path, &CliError)> {
        self.runs
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.path.as_path(), e)))
    }

    /// `(cases not matched, cases)` summed over every verified transcript.
    pub fn case_totals(&self) -> (usize, usize) {
        self.summaries().fold((0, 0), |(failed, total), (_, summary)| {
            (
                failed + summary.failures().count(),
                total + summary.totals.cases,
            )
        })
    }

    /// Transcripts per second, `0.0` when nothing was timed.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_ms == 0 {
            0.0
        } else {
            (self.total_files() as f64) / (self.elapsed_ms as f64 / 1000.0)
        }
    }
}

/// Counts finished transcripts across workers for the verbose progress lines.
#[derive(Debug)]
struct Progress {
    total: usize,
    processed: AtomicUsize,
    verbose: bool,
}

impl Progress {
    fn new(total: usize, verbose: bool) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            verbose,
        }
    }

    fn record(&self, run: &TranscriptRun) -> usize {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.verbose {
            match &run.result {
                Ok(summary) => eprintln!(
                    "{} [{}/{}] {} ({} cases)",
                    "✓".green().bold(),
                    processed,
                    self.total,
                    run.path.display(),
                    summary.totals.cases
                ),
                Err(e) => eprintln!(
                    "{} [{}/{}] {} - {}",
                    "✗".red().bold(),
                    processed,
                    self.total,
                    run.path.display(),
                    e
                ),
            }
        }
        processed
    }
}

/// Verifies transcript files against one shared spec table.
///
/// Batches smaller than `parallel_threshold` run serially; larger ones run
/// on the rayon pool. Cases within one transcript always run sequentially.
#[derive(Debug, Clone)]
pub struct BatchVerifier {
    specs: SpecSet,
    options: VerifyOptions,
    config: BatchConfig,
}

impl BatchVerifier {
    pub fn new(specs: SpecSet, options: VerifyOptions, config: BatchConfig) -> Self {
        Self {
            specs,
            options,
            config,
        }
    }

    /// Verify every file, keeping input order in the report.
    ///
    /// Unreadable transcripts are recorded in the report, never returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if a dedicated thread pool was requested through
    /// `max_threads` and could not be built.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchReport, CliError> {
        let start_time = Instant::now();
        let progress = Progress::new(files.len(), self.config.verbose);

        let runs = if files.len() < self.config.parallel_threshold {
            debug!("Batch: {} transcripts, serial", files.len());
            files.iter().map(|path| self.verify_one(path, &progress)).collect()
        } else if let Some(threads) = self.config.max_threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| CliError::invalid_input(format!("cannot start {} workers: {}", threads, e)))?;
            pool.install(|| self.verify_parallel(files, &progress))
        } else {
            self.verify_parallel(files, &progress)
        };

        Ok(BatchReport::new(runs, start_time.elapsed().as_millis()))
    }

    fn verify_parallel(&self, files: &[PathBuf], progress: &Progress) -> Vec<TranscriptRun> {
        debug!(
            "Batch: {} transcripts, {} workers",
            files.len(),
            rayon::current_num_threads()
        );
        files
            .par_iter()
            .map(|path| self.verify_one(path, progress))
            .collect()
    }

    fn verify_one(&self, path: &Path, progress: &Progress) -> TranscriptRun {
        let result = read_file(&path.to_string_lossy())
            .map(|transcript| verify(&self.specs, &transcript, &self.options));
        let run = TranscriptRun {
            path: path.to_path_buf(),
            result,
        };
        progress.record(&run);
        run
    }
}
