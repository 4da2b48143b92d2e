pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_OUTPUT_DIR: &str = "optimized";

pub const DEFAULT_QUALITY: u8 = 82;
pub const MAX_QUALITY: u8 = 100;

/// Extensions (lowercase, without the dot) picked up by the scanner.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const WEBP_EXTENSION: &str = "webp";
/// libwebp effort level; 6 is the slowest and smallest.
pub const WEBP_METHOD: i32 = 6;

pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;
pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const HIGH_COMPRESSION_QUALITY_THRESHOLD: u8 = 70;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_MISSING_DEPENDENCY: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_FILE_FAILURES: u8 = 3;

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} [{pos}] {wide_msg}";
