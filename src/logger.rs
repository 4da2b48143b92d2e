use std::sync::atomic::{AtomicU8, Ordering};

/// How much the run prints. Errors are printed at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

impl Verbosity {
    /// `--quiet` wins over `--verbose`; clap already rejects the pair.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Verbosity::Quiet,
            2 => Verbosity::Verbose,
            _ => Verbosity::Normal,
        }
    }
}

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

pub fn set_verbosity(verbosity: Verbosity) {
    VERBOSITY.store(verbosity as u8, Ordering::Relaxed);
}

pub fn verbosity() -> Verbosity {
    Verbosity::from_u8(VERBOSITY.load(Ordering::Relaxed))
}

pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// True when a message logged at `level` should reach the terminal.
pub fn enabled(level: Verbosity) -> bool {
    verbosity() >= level
}

/// Progress and summary lines on stdout, hidden by `--quiet`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::logger::enabled($crate::logger::Verbosity::Normal) {
            println!($($arg)*);
        }
    };
}

/// Per-file sizes and totals on stdout, only with `--verbose`.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::enabled($crate::logger::Verbosity::Verbose) {
            println!("  {}", format!($($arg)*));
        }
    };
}

/// Failures on stderr. Never silenced.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("error: {}", format!($($arg)*));
    };
}
