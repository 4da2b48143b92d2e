use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_QUALITY, DEFAULT_ROOT};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-optimize",
    about = "Re-encode every JPEG and PNG under a directory, optionally as WebP",
    long_about = "img-optimize walks a directory tree, finds JPEG and PNG images and re-encodes each \
                  one at the given quality. Results go to a mirrored output directory under the root \
                  (default: ./optimized) or, with --in-place, over the originals.",
    version,
    after_help = "EXAMPLES:\n  \
    img-optimize ./site/static\n  \
    img-optimize ./photos --quality 75 --webp\n  \
    img-optimize ./assets --out compressed --fail-fast\n  \
    img-optimize ./assets --in-place"
)]
pub struct Args {
    #[arg(
        default_value = DEFAULT_ROOT,
        help = "Root directory to scan for images",
        long_help = "Root directory to scan for images. Every subdirectory is searched; \
                     .jpg, .jpeg and .png files are picked up regardless of case."
    )]
    pub root: PathBuf,

    #[arg(
        long,
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Output directory name, relative to the root",
        long_help = "Directory the optimized tree is written to, joined onto the root. \
                     Files already under it are never scanned as input. \
                     Cannot be changed together with --in-place."
    )]
    pub out: String,

    #[arg(
        short = 'Q',
        long,
        default_value_t = DEFAULT_QUALITY,
        help = "Encoder quality (0-100)",
        long_help = "Quality passed to the encoder. 1-95 is the useful range for JPEG and WebP. \
                     For PNG, which is lossless, >=90 uses Zopfli and >=70 a stronger deflate level."
    )]
    pub quality: u8,

    #[arg(long, help = "Write WebP files instead of re-encoding as JPEG/PNG")]
    pub webp: bool,

    #[arg(
        long,
        help = "Overwrite the original files",
        long_help = "Overwrite the original files instead of writing a mirrored tree. \
                     Cannot be combined with a custom --out or with --webp."
    )]
    pub in_place: bool,

    #[arg(long, help = "Stop at the first image that fails to optimize")]
    pub fail_fast: bool,

    #[arg(short, long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[arg(short, long, help = "Print size statistics for every file")]
    pub verbose: bool,
}
