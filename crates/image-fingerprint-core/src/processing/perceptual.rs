//! # Perceptual Hashing Module
//!
//! Produces a binary perceptual fingerprint for an image.
//!
//! ## Overview
//!
//! Perceptual hashing generates "fingerprints" that remain similar for visually similar images,
//! unlike cryptographic hashes where minor changes produce completely different outputs.
//!
//! The fingerprint is computed in five steps:
//!
//! 1. Downscale: resize to a fixed 64×64 grid with a configurable resampling filter
//! 2. Binarize: map each pixel to pure white or pure black around a 50% luminance cutoff
//! 3. Extract: read the white/black grid in row-major order as 4096 bits
//! 4. Pack: group the bits into bytes, first bit in the most significant position
//! 5. Encode: render each byte as two uppercase hex digits
//!
//! The result is always 1024 characters long.
//!
//! ## Luminance
//!
//! Luminance uses the ITU-R BT.709 weights: `0.2126*R + 0.7152*G + 0.0722*B`,
//! normalized to `[0, 1]`. Alpha is ignored.
//!
//! ## Hamming Distance Interpretation
//!
//! Similarity between two fingerprints is the number of differing bits out of 4096.
//! Identical images produced with the same filter always have distance 0; the
//! distance between a solid black and a solid white image is 4096.

use image::{imageops, DynamicImage, RgbaImage};
use std::fmt::Write;
use std::path::Path;

use super::types::{BinaryImage, Fingerprint, BLACK, FINGERPRINT_BITS, TARGET_SIZE, WHITE};
use crate::config::ResizeFilter;
use crate::error::{Error, Result};

/// Normalized luminance at or above which a pixel becomes white
const LUMINANCE_THRESHOLD: f32 = 0.5;

const _: () = assert!(FINGERPRINT_BITS % 8 == 0);

/// Computes fingerprints with a fixed resampling filter.
///
/// Holds no state besides the filter, so one hasher can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerceptualHasher {
    filter: ResizeFilter,
}

impl PerceptualHasher {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResizeFilter {
        self.filter
    }

    /// Compute the fingerprint of a decoded image.
    ///
    /// The caller's image is only read; all work happens on a private copy.
    pub fn compute_fingerprint(&self, img: &DynamicImage) -> Result<Fingerprint> {
        let binary = self.binarize_image(img)?;
        Ok(fingerprint_binary(&binary))
    }

    /// Downscale and binarize an image without hashing it
    pub fn binarize_image(&self, img: &DynamicImage) -> Result<BinaryImage> {
        ensure_not_empty(img.width(), img.height())?;
        let small = downscale(&img.to_rgba8(), self.filter);
        Ok(binarize(&small))
    }
}

/// Hash an already binarized image
pub fn fingerprint_binary(binary: &BinaryImage) -> Fingerprint {
    let bits = extract_bits(binary);
    Fingerprint::from_hex(encode_hex(&pack_bits(&bits)))
}

/// Compute a fingerprint using the default resampling filter
pub fn compute_fingerprint(img: &DynamicImage) -> Result<Fingerprint> {
    PerceptualHasher::default().compute_fingerprint(img)
}

/// Calculate a fingerprint from an image file
pub fn fingerprint_from_file<P: AsRef<Path>>(
    hasher: &PerceptualHasher,
    path: P,
) -> Result<Fingerprint> {
    let img = decode_file(path.as_ref())?;
    hasher.compute_fingerprint(&img)
}

/// Calculate a fingerprint from encoded image bytes held in memory
pub fn fingerprint_from_memory(hasher: &PerceptualHasher, bytes: &[u8]) -> Result<Fingerprint> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::InvalidImage(format!("Failed to decode image: {}", e)))?;
    hasher.compute_fingerprint(&img)
}

/// Decode an image file, mapping decoder failures to [`Error::InvalidImage`]
pub(crate) fn decode_file(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let reader = image::io::Reader::open(path)?.with_guessed_format()?;

    // Decoder I/O errors here mean truncated image data
    reader.decode().map_err(|e| match e {
        image::ImageError::Unsupported(u) => Error::UnsupportedFormat(u.to_string()),
        other => Error::InvalidImage(format!("{}: {}", path.display(), other)),
    })
}

fn ensure_not_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage(format!(
            "image has zero area ({}x{})",
            width, height
        )));
    }
    Ok(())
}

/// Resize to the fixed 64x64 grid
pub fn downscale(img: &RgbaImage, filter: ResizeFilter) -> RgbaImage {
    imageops::resize(img, TARGET_SIZE, TARGET_SIZE, filter.into())
}

/// Normalized BT.709 luminance of an RGB triple
#[inline]
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) / 255.0
}

/// Map every pixel to [`WHITE`] or [`BLACK`]
pub fn binarize(img: &RgbaImage) -> BinaryImage {
    let mut out = RgbaImage::new(img.width(), img.height());
    for (src, dst) in img.pixels().zip(out.pixels_mut()) {
        let [r, g, b, _] = src.0;
        *dst = if luminance(r, g, b) >= LUMINANCE_THRESHOLD {
            WHITE
        } else {
            BLACK
        };
    }
    BinaryImage::new(out)
}

/// Read the binary image row by row, `true` for white pixels
pub fn extract_bits(img: &BinaryImage) -> Vec<bool> {
    (0..img.height())
        .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
        .map(|(x, y)| img.is_white(x, y))
        .collect()
}

/// Pack bits into bytes, the first bit of each group of 8 landing in bit 7.
///
/// Trailing bits that do not fill a whole byte are dropped.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| {
            chunk.iter().enumerate().fold(0u8, |byte, (j, &bit)| {
                if bit {
                    byte | (1u8 << (7 - j))
                } else {
                    byte
                }
            })
        })
        .collect()
}

/// Render bytes as uppercase hex, two digits per byte
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(hex, "{:02X}", byte);
    }
    hex
}
