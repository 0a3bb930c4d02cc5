mod common;

use common::*;
use image::Rgba;
use image_fingerprint_core::processing::{FINGERPRINT_BITS, FINGERPRINT_LEN};
use image_fingerprint_core::{
    compute_fingerprint, fingerprint_from_file, fingerprint_from_memory, Error, PerceptualHasher,
    ResizeFilter,
};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_fingerprint_is_deterministic() {
    let img = scene(123, 77);
    let hasher = PerceptualHasher::default();

    let first = hasher.compute_fingerprint(&img).unwrap();
    for _ in 0..3 {
        assert_eq!(hasher.compute_fingerprint(&img).unwrap(), first);
    }
    assert_eq!(compute_fingerprint(&img).unwrap(), first);
}

#[test]
fn test_fingerprint_shape() {
    for filter in [
        ResizeFilter::Nearest,
        ResizeFilter::Triangle,
        ResizeFilter::CatmullRom,
        ResizeFilter::Gaussian,
        ResizeFilter::Lanczos3,
    ] {
        let fingerprint = PerceptualHasher::new(filter)
            .compute_fingerprint(&scene(90, 140))
            .unwrap();

        assert_eq!(fingerprint.len(), FINGERPRINT_LEN);
        assert!(fingerprint
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }
}

#[test]
fn test_input_image_is_not_modified() {
    let img = scene(50, 50);
    let before = img.clone();

    compute_fingerprint(&img).unwrap();

    assert_eq!(img.as_bytes(), before.as_bytes());
}

#[test]
fn test_upscaled_copy_matches() {
    let img = scene(100, 80);
    let doubled = upscale(&img, 2);

    let nearest = PerceptualHasher::new(ResizeFilter::Nearest);
    assert_eq!(
        nearest.compute_fingerprint(&img).unwrap(),
        nearest.compute_fingerprint(&doubled).unwrap()
    );

    let hasher = PerceptualHasher::default();
    let distance = hasher
        .compute_fingerprint(&img)
        .unwrap()
        .distance(&hasher.compute_fingerprint(&doubled).unwrap());
    assert!(
        distance <= (FINGERPRINT_BITS / 20) as u32,
        "distance {} too large",
        distance
    );
}

#[test]
fn test_blocky_image_survives_upscaling() {
    let img = checkerboard(64, 64, 8);
    let doubled = upscale(&img, 2);
    let hasher = PerceptualHasher::new(ResizeFilter::Triangle);

    let distance = hasher
        .compute_fingerprint(&img)
        .unwrap()
        .distance(&hasher.compute_fingerprint(&doubled).unwrap());
    assert!(distance <= 64, "distance {} too large", distance);
}

#[test]
fn test_solid_black_and_white_are_complements() {
    let black = compute_fingerprint(&solid_image(10, 10, BLACK_PIXEL)).unwrap();
    let white = compute_fingerprint(&solid_image(10, 10, WHITE_PIXEL)).unwrap();

    assert_eq!(black.as_str(), "00".repeat(FINGERPRINT_LEN / 2));
    assert_eq!(white.as_str(), "FF".repeat(FINGERPRINT_LEN / 2));
    assert_eq!(black.distance(&white), FINGERPRINT_BITS as u32);
}

#[test]
fn test_single_pixel_image() {
    let bright = compute_fingerprint(&solid_image(1, 1, Rgba([200, 200, 200, 255]))).unwrap();
    assert_eq!(bright.as_str(), "FF".repeat(FINGERPRINT_LEN / 2));

    let dark = compute_fingerprint(&solid_image(1, 1, Rgba([20, 40, 60, 255]))).unwrap();
    assert_eq!(dark.as_str(), "00".repeat(FINGERPRINT_LEN / 2));
}

#[test]
fn test_different_images_are_far_apart() {
    let hasher = PerceptualHasher::default();
    let a = hasher.compute_fingerprint(&checkerboard(64, 64, 8)).unwrap();
    let b = hasher.compute_fingerprint(&checkerboard(64, 64, 16)).unwrap();

    assert_ne!(a, b);
    assert!(a.distance(&b) > 1000);
}

#[test]
fn test_zero_sized_image_is_invalid() {
    let result = compute_fingerprint(&solid_image(0, 5, WHITE_PIXEL));
    assert!(matches!(result, Err(Error::InvalidImage(_))));

    let result = compute_fingerprint(&solid_image(5, 0, WHITE_PIXEL));
    assert!(matches!(result, Err(Error::InvalidImage(_))));
}

#[test]
fn test_fingerprint_from_memory() {
    let img = scene(60, 40);
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();

    let hasher = PerceptualHasher::default();
    assert_eq!(
        fingerprint_from_memory(&hasher, &bytes).unwrap(),
        hasher.compute_fingerprint(&img).unwrap()
    );

    let garbage = b"definitely not an image";
    assert!(matches!(
        fingerprint_from_memory(&hasher, garbage),
        Err(Error::InvalidImage(_))
    ));
}

#[test]
fn test_fingerprint_from_file() {
    let dir = tempdir().unwrap();
    let img = scene(70, 70);
    let path = write_png(dir.path(), "scene", &img);

    let hasher = PerceptualHasher::default();
    assert_eq!(
        fingerprint_from_file(&hasher, &path).unwrap(),
        hasher.compute_fingerprint(&img).unwrap()
    );

    let corrupt = dir.path().join("corrupt.png");
    std::fs::write(&corrupt, b"\x89PNG\r\n\x1a\nnot really").unwrap();
    assert!(matches!(
        fingerprint_from_file(&hasher, &corrupt),
        Err(Error::InvalidImage(_))
    ));

    assert!(matches!(
        fingerprint_from_file(&hasher, dir.path().join("missing.png")),
        Err(Error::FileNotFound(_))
    ));
}

#[test]
fn test_concurrent_hashing() {
    let img = Arc::new(scene(200, 150));
    let expected = compute_fingerprint(&img).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let img = Arc::clone(&img);
            std::thread::spawn(move || compute_fingerprint(&img).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
