pub mod cli;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod logger;
pub mod paths;
pub mod pipeline;
pub mod scanner;
pub mod utils;
pub mod validation;

pub use encoder::{EncodeSettings, ImageCodec, NativeCodec};
pub use error::{OptimizeError, Result};
pub use formats::{SourceFormat, TargetFormat};
pub use paths::{ensure_parent_dir, OutputLayout};
pub use pipeline::{FailurePolicy, FileOutcome, Optimizer, RunConfig, RunReport};
pub use scanner::{is_candidate, Scanner};
