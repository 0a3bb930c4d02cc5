/// Fingerprint and binary image types
///
use image::{ImageFormat, Rgba, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Side length of the square grid every image is reduced to
pub const TARGET_SIZE: u32 = 64;

/// Number of bits in a fingerprint (one per pixel of the reduced grid)
pub const FINGERPRINT_BITS: usize = (TARGET_SIZE * TARGET_SIZE) as usize;

/// Number of hex characters in a fingerprint
pub const FINGERPRINT_LEN: usize = FINGERPRINT_BITS / 4;

/// Sentinel colour for pixels at or above the luminance threshold
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Sentinel colour for pixels below the luminance threshold
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A perceptual fingerprint: 4096 bits rendered as 1024 uppercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    /// The fingerprint as an uppercase hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of hex characters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Calculate the Hamming distance between two fingerprints
    ///
    /// Counts differing bits nibble by nibble. Characters past the end of the
    /// shorter fingerprint count as fully differing.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        let common: u32 = self
            .0
            .chars()
            .zip(other.0.chars())
            .map(|(a, b)| {
                let a = a.to_digit(16).unwrap_or(0);
                let b = b.to_digit(16).unwrap_or(0);
                (a ^ b).count_ones()
            })
            .sum();

        let extra = self.0.len().abs_diff(other.0.len()) as u32;
        common + extra * 4
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

/// A downscaled image in which every pixel is either [`WHITE`] or [`BLACK`]
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryImage(RgbaImage);

impl BinaryImage {
    pub(crate) fn new(image: RgbaImage) -> Self {
        Self(image)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Whether the pixel at (x, y) is exactly the white sentinel
    pub fn is_white(&self, x: u32, y: u32) -> bool {
        *self.0.get_pixel(x, y) == WHITE
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.0
    }

    /// Write the image as PNG, for inspecting what the hasher saw
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.0.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl From<BinaryImage> for RgbaImage {
    fn from(image: BinaryImage) -> Self {
        image.0
    }
}

/// Fingerprint of a single image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFingerprint {
    /// Path to the image file
    pub path: PathBuf,
    /// Perceptual fingerprint of the decoded image
    pub fingerprint: Fingerprint,
}

/// Outcome of fingerprinting a batch of images
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    /// Successfully fingerprinted images, in input order
    pub fingerprints: Vec<ImageFingerprint>,
    /// Images that could not be fingerprinted, in input order
    pub failed: Vec<PathBuf>,
}

impl ProcessingSummary {
    pub fn total(&self) -> usize {
        self.fingerprints.len() + self.failed.len()
    }
}
