//! Core functionality for computing perceptual fingerprints of images.
//!
//! This library provides:
//! - A pure perceptual hasher turning a decoded image into a 1024 character hex fingerprint
//! - Decoding helpers for files and in-memory buffers
//! - File discovery for images in directories
//! - Parallel fingerprinting of many images
//!
//! ```no_run
//! use image_fingerprint_core::{PerceptualHasher, ResizeFilter};
//!
//! let img = image::open("photo.jpg").unwrap();
//! let hasher = PerceptualHasher::new(ResizeFilter::CatmullRom);
//! let fingerprint = hasher.compute_fingerprint(&img).unwrap();
//! println!("Hash: {}", fingerprint);
//! ```

// -- External Dependencies --
use log::info;
use std::path::Path;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::{Config, LogLevel, ResizeFilter};
pub use error::{Error, Result};
pub use processing::{
    compute_fingerprint, fingerprint_from_file, fingerprint_from_memory, BinaryImage, Fingerprint,
    ImageFingerprint, PerceptualHasher, ProcessingSummary,
};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod discovery;
pub mod logging;
pub mod processing;
pub mod types;

/// Main entry point for fingerprinting files on disk
pub struct ImageFingerprinter {
    config: Config,
    hasher: PerceptualHasher,
}

impl ImageFingerprinter {
    /// Create a new ImageFingerprinter with the provided configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let hasher = PerceptualHasher::new(config.filter);
        Ok(Self { config, hasher })
    }

    pub fn hasher(&self) -> &PerceptualHasher {
        &self.hasher
    }

    /// Discover all images in the provided files and directories
    pub fn discover_images(&self, paths: &[impl AsRef<Path>]) -> Result<Vec<ImageFile>> {
        discovery::discover_images(paths, &self.config)
    }

    /// Fingerprint the given images in parallel
    pub fn process_images(&self, images: &[ImageFile]) -> Result<ProcessingSummary> {
        processing::process_images(images, &self.hasher, &self.config)
    }

    /// Discover and fingerprint every image under `paths`
    pub fn run(&self, paths: &[impl AsRef<Path>]) -> Result<ProcessingSummary> {
        info!("Discovering images...");
        let images = self.discover_images(paths)?;
        info!("Found {} images", images.len());

        self.process_images(&images)
    }
}
