//! Fingerprints many images in parallel.
//!
//! Each image is decoded and hashed on its own rayon task with its own working copy, so
//! nothing is shared between tasks besides the atomic counters feeding the progress bar.
//! A failing image is logged and recorded in the [`ProcessingSummary`]; it never aborts
//! the rest of the batch.

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::perceptual::{decode_file, fingerprint_binary, PerceptualHasher};
use super::types::{Fingerprint, ImageFingerprint, ProcessingSummary};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{log_file_error, log_hash_error};
use crate::types::ImageFile;

/// Suffix appended to the file name of a saved binarized image
const BINARIZED_SUFFIX: &str = "binary.png";

/// Fingerprint a single file, optionally saving the binarized intermediate to `binarized_out`.
///
/// A failed save is logged and does not affect the fingerprint.
pub fn process_single_image(
    path: &Path,
    hasher: &PerceptualHasher,
    binarized_out: Option<&Path>,
) -> Result<Fingerprint> {
    let img = decode_file(path)?;
    let binary = hasher.binarize_image(&img)?;

    if let Some(out) = binarized_out {
        match binary.save(out) {
            Ok(()) => debug!("Saved binarized image to '{}'", out.display()),
            Err(e) => log_file_error(out, "save_binarized", &e),
        }
    }

    Ok(fingerprint_binary(&binary))
}

/// Where the binarized copy of the `index`-th input is written inside `dir`.
///
/// The index keeps names unique when inputs share a file name.
pub fn binarized_output_path(dir: &Path, index: usize, source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{:04}_{}.{}", index, name, BINARIZED_SUFFIX))
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar.set_message("Computing fingerprints...");
    bar
}

/// Fingerprint every image in `images` on a dedicated thread pool.
///
/// Results keep the order of `images`.
pub fn process_images(
    images: &[ImageFile],
    hasher: &PerceptualHasher,
    config: &Config,
) -> Result<ProcessingSummary> {
    let start_time = Instant::now();
    let num_threads = config.effective_threads();

    if let Some(dir) = &config.binarized_dir {
        std::fs::create_dir_all(dir)?;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build thread pool: {}", e)))?;

    info!(
        "Fingerprinting {} images with {} threads ({} filter)",
        images.len(),
        num_threads,
        hasher.filter()
    );

    let bar = progress_bar(images.len(), config.show_progress);
    let failure_count = AtomicUsize::new(0);
    let binarized_dir = config.binarized_dir.as_deref();

    let results: Vec<(PathBuf, Option<Fingerprint>)> = pool.install(|| {
        images
            .par_iter()
            .enumerate()
            .map(|(index, image)| {
                let binarized_out =
                    binarized_dir.map(|dir| binarized_output_path(dir, index, &image.path));
                let outcome = match process_single_image(
                    &image.path,
                    hasher,
                    binarized_out.as_deref(),
                ) {
                    Ok(fingerprint) => {
                        info!("Hash: {} ({})", fingerprint, image.path.display());
                        Some(fingerprint)
                    }
                    Err(e) => {
                        log_hash_error(&image.path, &e);
                        failure_count.fetch_add(1, Ordering::Relaxed);
                        None
                    }
                };
                bar.inc(1);
                (image.path.clone(), outcome)
            })
            .collect()
    });

    let mut summary = ProcessingSummary::default();
    for (path, outcome) in results {
        match outcome {
            Some(fingerprint) => summary.fingerprints.push(ImageFingerprint { path, fingerprint }),
            None => summary.failed.push(path),
        }
    }

    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let ips = if elapsed_secs > 0.0 {
        summary.total() as f64 / elapsed_secs
    } else {
        0.0
    };
    bar.finish_with_message(format!("Completed! Processed at {:.1} images/sec", ips));

    info!(
        "Fingerprinted {} images, {} failed, in {:.2?}",
        summary.fingerprints.len(),
        failure_count.load(Ordering::Relaxed),
        start_time.elapsed()
    );

    Ok(summary)
}
