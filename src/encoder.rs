use crate::constants::{
    HIGH_COMPRESSION_QUALITY_THRESHOLD, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL,
    OXIPNG_PRESET, WEBP_EXTENSION, ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
#[cfg(feature = "webp")]
use crate::constants::WEBP_METHOD;
use crate::error::{OptimizeError, Result};
use crate::formats::{SourceFormat, TargetFormat};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use mozjpeg::{ColorSpace, Compress};
use oxipng::{Deflaters, Options};
use std::fs::{self, Permissions};
use std::io::{Cursor, Write};
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Per-run encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub quality: u8,
    pub target: TargetFormat,
}

/// Decode + encode capability used by the pipeline.
///
/// The pipeline only talks to this trait, so tests can swap in a fake that
/// never touches a real codec.
pub trait ImageCodec {
    /// Fails with [`OptimizeError::MissingDependency`] if `target` cannot be
    /// produced by this codec.
    fn check_available(&self, target: TargetFormat) -> Result<()>;

    /// Re-encode `source` into `destination` and return the path written.
    ///
    /// The returned path differs from `destination` at most in its extension.
    fn encode(&self, source: &Path, destination: &Path, settings: &EncodeSettings)
        -> Result<PathBuf>;
}

/// Codec backed by `image` for decoding, `mozjpeg` for JPEG, `oxipng` for
/// PNG and libwebp for WebP.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCodec;

impl ImageCodec for NativeCodec {
    fn check_available(&self, target: TargetFormat) -> Result<()> {
        match target {
            TargetFormat::WebP if !cfg!(feature = "webp") => Err(
                OptimizeError::MissingDependency("WebP encoding".to_string()),
            ),
            _ => Ok(()),
        }
    }

    fn encode(
        &self,
        source: &Path,
        destination: &Path,
        settings: &EncodeSettings,
    ) -> Result<PathBuf> {
        let source_format = SourceFormat::from_path(source)?;
        let permissions = fs::metadata(source)?.permissions();

        // The decoded buffer lives only for this block.
        let (output_path, bytes) = {
            let img = decode_image(source)?;
            match settings.target {
                TargetFormat::WebP => (
                    destination.with_extension(WEBP_EXTENSION),
                    encode_webp(&img, settings.quality)?,
                ),
                TargetFormat::Original => {
                    let bytes = if source_format.is_jpeg_family() {
                        encode_jpeg(&img, settings.quality)?
                    } else {
                        encode_png(&img, settings.quality)?
                    };
                    (destination.to_path_buf(), bytes)
                }
            }
        };

        write_atomically(&output_path, &bytes, Some(permissions))?;
        Ok(output_path)
    }
}

/// Decodes by content, so a mislabelled file still opens.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img)
}

/// Progressive JPEG with optimized Huffman tables.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let (color_space, pixels) = if img.color() == ColorType::L8 {
        (ColorSpace::JCS_GRAYSCALE, img.to_luma8().into_raw())
    } else {
        (ColorSpace::JCS_RGB, img.to_rgb8().into_raw())
    };

    let mut compress = Compress::new(color_space);
    compress.set_size(img.width() as usize, img.height() as usize);
    compress.set_quality(f32::from(quality));
    compress.set_optimize_coding(true);
    compress.set_progressive_mode();

    let mut started = compress
        .start_compress(Vec::new())
        .map_err(|e| OptimizeError::JpegEncoding(e.to_string()))?;
    started
        .write_scanlines(&pixels)
        .map_err(|e| OptimizeError::JpegEncoding(e.to_string()))?;
    started
        .finish()
        .map_err(|e| OptimizeError::JpegEncoding(e.to_string()))
}

/// PNG re-encode followed by an oxipng pass. PNG is lossless, so quality only
/// picks how hard the deflater works.
pub fn encode_png(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    img.write_to(&mut Cursor::new(&mut raw), ImageFormat::Png)?;

    oxipng::optimize_from_memory(&raw, &png_options(quality))
        .map_err(|e| OptimizeError::PngOptimization(e.to_string()))
}

pub fn png_options(quality: u8) -> Options {
    let mut options = Options::from_preset(OXIPNG_PRESET);

    options.deflate = if quality >= ZOPFLI_QUALITY_THRESHOLD {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality >= HIGH_COMPRESSION_QUALITY_THRESHOLD {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };

    options
}

/// Lossy WebP at `quality`, always at the slowest method.
#[cfg(feature = "webp")]
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut config = libwebp_sys::WebPConfig::new().map_err(|_| {
        OptimizeError::WebPEncoding("failed to initialise encoder config".to_string())
    })?;
    config.quality = f32::from(quality);
    config.method = WEBP_METHOD;

    let (width, height) = (img.width(), img.height());
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
        let memory = encoder.encode_advanced(&config);
        memory.map(|memory| memory.to_vec())
    } else {
        let rgb = img.to_rgb8();
        let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
        let memory = encoder.encode_advanced(&config);
        memory.map(|memory| memory.to_vec())
    };

    encoded.map_err(|e| OptimizeError::WebPEncoding(format!("{:?}", e)))
}

#[cfg(not(feature = "webp"))]
pub fn encode_webp(_img: &DynamicImage, _quality: u8) -> Result<Vec<u8>> {
    Err(OptimizeError::MissingDependency("WebP encoding".to_string()))
}

/// Write `bytes` to a temporary file beside `path`, then rename it over
/// `path`. An interrupted run never leaves a half-written destination.
pub fn write_atomically(path: &Path, bytes: &[u8], permissions: Option<Permissions>) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| OptimizeError::Io(e.error))?;

    Ok(())
}
