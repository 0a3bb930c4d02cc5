#![allow(dead_code)]

use image::{imageops, DynamicImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

pub const WHITE_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A single-colour image
pub fn solid_image(width: u32, height: u32, pixel: Rgba<u8>) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel))
}

/// A black and white checkerboard made of `cell`-sized squares
pub fn checkerboard(width: u32, height: u32, cell: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            WHITE_PIXEL
        } else {
            BLACK_PIXEL
        }
    }))
}

/// A smooth diagonal grey ramp with a bright disc in the middle
pub fn scene(width: u32, height: u32) -> DynamicImage {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = width.min(height) as f32 / 4.0;
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        if dx * dx + dy * dy <= radius * radius {
            return Rgba([250, 240, 230, 255]);
        }
        let v = ((x + y) * 255 / (width + height)) as u8;
        Rgba([v, v / 2, 255 - v, 255])
    }))
}

/// Scale an image up by an integer factor with nearest-neighbour sampling
pub fn upscale(img: &DynamicImage, factor: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(imageops::resize(
        &img.to_rgba8(),
        img.width() * factor,
        img.height() * factor,
        imageops::FilterType::Nearest,
    ))
}

/// Save an image as PNG inside `dir`
pub fn write_png(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(format!("{}.png", name));
    img.save(&path).unwrap();
    path
}
