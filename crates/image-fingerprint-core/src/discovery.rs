use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::log_file_error;
use crate::types::{ImageFile, ImageFormat};

/// Discover images in the provided paths.
///
/// Each path may be a single image file or a directory to walk. Results keep the order of
/// `paths`; files inside a directory are sorted by name.
pub fn discover_images<P: AsRef<Path>>(paths: &[P], config: &Config) -> Result<Vec<ImageFile>> {
    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();

    paths
        .par_iter()
        .map(|path| discover_images_in_path(path, config))
        .collect::<Vec<Result<Vec<ImageFile>>>>()
        .into_iter()
        .try_fold(Vec::new(), |mut acc, result| {
            acc.extend(result?);
            Ok(acc)
        })
}

fn discover_images_in_path(path: &Path, config: &Config) -> Result<Vec<ImageFile>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Ok(discover_images_in_directory(path, config));
    }

    match get_image_format(path) {
        Some(format) if format.is_supported() => {
            let size = fs::metadata(path)?.len();
            Ok(vec![ImageFile {
                path: path.to_path_buf(),
                size,
                format,
            }])
        }
        _ => {
            // Skipped like unsupported files found while walking a directory
            let e = Error::UnsupportedFormat(path.display().to_string());
            log_file_error(path, "check_format", &e);
            Ok(Vec::new())
        }
    }
}

/// Discover images in a single, existing directory
fn discover_images_in_directory(directory: &Path, config: &Config) -> Vec<ImageFile> {
    let max_depth = config.max_depth.unwrap_or(usize::MAX);
    let mut image_files = Vec::new();

    for result in WalkDir::new(directory)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                // Log error but continue with other entries
                log_file_error(e.path().unwrap_or(directory), "walk", &e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let format = match get_image_format(path) {
            Some(format) if format.is_supported() => format,
            _ => continue,
        };

        match entry.metadata() {
            Ok(metadata) => image_files.push(ImageFile {
                path: path.to_path_buf(),
                size: metadata.len(),
                format,
            }),
            Err(e) => log_file_error(path, "metadata", &e),
        }
    }

    image_files
}

/// Get image format from file extension
fn get_image_format(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
}

// -- Tests --
