use crate::cli::Args;
use crate::constants::{
    DEFAULT_OUTPUT_DIR, DEFAULT_QUALITY, EXIT_FILE_FAILURES, EXIT_SUCCESS,
    PROGRESS_SPINNER_TEMPLATE,
};
use crate::encoder::{EncodeSettings, ImageCodec};
use crate::error::{OptimizeError, Result};
use crate::formats::TargetFormat;
use crate::logger;
use crate::paths::OutputLayout;
use crate::scanner::Scanner;
use crate::utils::{describe_size_change, format_file_size};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What to do when a single file cannot be optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and move on to the next file.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    FailFast,
}

/// Settings for one invocation. Nothing here changes once a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub root: PathBuf,
    pub output_name: String,
    pub quality: u8,
    pub target: TargetFormat,
    pub in_place: bool,
    pub failure_policy: FailurePolicy,
}

impl RunConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_name: DEFAULT_OUTPUT_DIR.to_string(),
            quality: DEFAULT_QUALITY,
            target: TargetFormat::Original,
            in_place: false,
            failure_policy: FailurePolicy::Continue,
        }
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn target(mut self, target: TargetFormat) -> Self {
        self.target = target;
        self
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            quality: self.quality,
            target: self.target,
        }
    }
}

impl From<&Args> for RunConfig {
    fn from(args: &Args) -> Self {
        let policy = if args.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        };

        RunConfig::new(&args.root)
            .output_name(&args.out)
            .quality(args.quality)
            .target(TargetFormat::from_webp_flag(args.webp))
            .in_place(args.in_place)
            .failure_policy(policy)
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub enum FileOutcome {
    Optimized {
        source: PathBuf,
        destination: PathBuf,
        original_size: u64,
        optimized_size: u64,
    },
    Failed {
        source: PathBuf,
        error: OptimizeError,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Optimized { source, .. } | FileOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Optimized { .. })
    }
}

/// Everything a finished run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<FileOutcome>,
    /// Set when [`FailurePolicy::FailFast`] cut the run short.
    pub aborted: bool,
}

impl RunReport {
    pub fn optimized_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.optimized_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &OptimizeError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { source, error } => Some((source.as_path(), error)),
            FileOutcome::Optimized { .. } => None,
        })
    }

    /// Total bytes before and after, over the successful files.
    pub fn total_sizes(&self) -> (u64, u64) {
        self.outcomes
            .iter()
            .fold((0, 0), |(before, after), outcome| match outcome {
                FileOutcome::Optimized {
                    original_size,
                    optimized_size,
                    ..
                } => (before + original_size, after + optimized_size),
                FileOutcome::Failed { .. } => (before, after),
            })
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed_count() > 0 {
            EXIT_FILE_FAILURES
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Drives scan -> map -> encode over a validated configuration.
pub struct Optimizer<C: ImageCodec> {
    codec: C,
    layout: OutputLayout,
    scanner: Scanner,
    settings: EncodeSettings,
    failure_policy: FailurePolicy,
}

impl<C: ImageCodec> Optimizer<C> {
    /// Validate `config` and check that `codec` can produce the requested
    /// target. Nothing is written to disk here.
    pub fn new(config: RunConfig, codec: C) -> Result<Self> {
        let root = crate::validation::resolve_root(&config.root)?;
        crate::validation::validate_output_choice(config.in_place, &config.output_name)?;
        crate::validation::validate_target(config.in_place, config.target)?;
        crate::validation::validate_quality(config.quality)?;
        codec.check_available(config.target)?;

        let layout = if config.in_place {
            OutputLayout::in_place(&root)
        } else {
            OutputLayout::mirrored(&root, &config.output_name)
        };

        let scanner = match layout.excluded_dir() {
            Some(dir) => Scanner::new(&root).exclude(dir),
            None => Scanner::new(&root),
        };

        Ok(Self {
            codec,
            layout,
            scanner,
            settings: config.encode_settings(),
            failure_policy: config.failure_policy,
        })
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Process every candidate once and report what happened.
    pub fn run(&self) -> RunReport {
        let start_time = Instant::now();
        let progress = progress_spinner();
        let mut report = RunReport::default();

        crate::verbose!(
            "Scanning {} -> {} ({} format, quality {})",
            self.layout.root().display(),
            self.layout.output_dir().display(),
            self.settings.target,
            self.settings.quality
        );

        for candidate in self.scanner.candidates() {
            let outcome = match candidate {
                Ok(source) => {
                    progress.set_message(source.display().to_string());
                    self.process_file(source)
                }
                Err(error) => FileOutcome::Failed {
                    source: walk_error_path(&error)
                        .unwrap_or_else(|| self.layout.root().to_path_buf()),
                    error,
                },
            };
            progress.inc(1);

            progress.suspend(|| log_outcome(&outcome));
            let stop = !outcome.is_success() && self.failure_policy == FailurePolicy::FailFast;
            report.outcomes.push(outcome);

            if stop {
                report.aborted = true;
                break;
            }
        }

        progress.finish_and_clear();
        print_summary(&report, start_time);
        report
    }

    /// Map, create parent directories, encode. One file, no shared state.
    pub fn process_file(&self, source: PathBuf) -> FileOutcome {
        match self.try_process_file(&source) {
            Ok((destination, original_size, optimized_size)) => FileOutcome::Optimized {
                source,
                destination,
                original_size,
                optimized_size,
            },
            Err(error) => FileOutcome::Failed { source, error },
        }
    }

    fn try_process_file(&self, source: &Path) -> Result<(PathBuf, u64, u64)> {
        let destination = self
            .layout
            .prepare_destination(source, self.settings.target)?;
        let original_size = fs::metadata(source)?.len();

        let written = self.codec.encode(source, &destination, &self.settings)?;
        let optimized_size = fs::metadata(&written)?.len();

        Ok((written, original_size, optimized_size))
    }
}

fn walk_error_path(error: &OptimizeError) -> Option<PathBuf> {
    match error {
        OptimizeError::Walk(walk) => walk.path().map(Path::to_path_buf),
        _ => None,
    }
}

fn progress_spinner() -> ProgressBar {
    if logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(PROGRESS_SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

fn log_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Optimized {
            source,
            destination,
            original_size,
            optimized_size,
        } => {
            crate::info!("{} -> {}", source.display(), destination.display());
            crate::verbose!("{}", describe_size_change(*original_size, *optimized_size));
        }
        FileOutcome::Failed { source, error } => {
            crate::error!("Failed to optimize {}: {}", source.display(), error);
        }
    }
}

fn print_summary(report: &RunReport, start_time: Instant) {
    if report.aborted {
        crate::error!("Stopping after the first failure (--fail-fast)");
    }

    crate::info!("Done. Optimized {} file(s).", report.optimized_count());

    let (before, after) = report.total_sizes();
    crate::verbose!(
        "Total: {} in {:.2?}",
        describe_size_change(before, after),
        start_time.elapsed()
    );
    crate::verbose!("Saved: {}", format_file_size(before.saturating_sub(after)));

    let failed = report.failed_count();
    if failed > 0 {
        crate::error!("{} file(s) failed.", failed);
    }
}
