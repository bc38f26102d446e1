//! I/O helpers for the demo binaries.
//!
//! - `load_pixel_grid`: read a PNG/JPEG/etc. into a normalized [`PixelGrid`].
//! - `save_pixel_grid`: write a grid back out as PNG.
//! - `save_mask`: write a detection mask as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! The core algorithms never call into this module; it exists so the tools
//! under `src/bin/` stay thin.
use super::PixelGrid;
use crate::detect::DetectionMask;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk. Grayscale files stay single-channel; everything
/// else is converted to RGB.
pub fn load_pixel_grid(path: &Path) -> Result<PixelGrid, String> {
    let img =
        image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let grid = match img {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = (gray.width() as usize, gray.height() as usize);
            PixelGrid::from_bytes(w, h, 1, &gray.into_raw())
        }
        other => {
            let rgb = other.into_rgb8();
            let (w, h) = (rgb.width() as usize, rgb.height() as usize);
            PixelGrid::from_bytes(w, h, 3, &rgb.into_raw())
        }
    };
    grid.map_err(|e| format!("Failed to convert {}: {e}", path.display()))
}

/// Save a pixel grid as PNG, clamping samples into [0, 255].
pub fn save_pixel_grid(grid: &PixelGrid, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (w, h) = (grid.w as u32, grid.h as u32);
    let quantize = |v: f32| (v * 255.0).clamp(0.0, 255.0) as u8;
    let result = match grid.channels {
        1 => {
            let mut out = GrayImage::new(w, h);
            for y in 0..grid.h {
                for x in 0..grid.w {
                    out.put_pixel(x as u32, y as u32, Luma([quantize(grid.sample(x, y, 0))]));
                }
            }
            out.save(path)
        }
        3 => {
            let mut out = RgbImage::new(w, h);
            for y in 0..grid.h {
                for x in 0..grid.w {
                    let px = grid.pixel(x, y);
                    out.put_pixel(
                        x as u32,
                        y as u32,
                        Rgb([quantize(px[0]), quantize(px[1]), quantize(px[2])]),
                    );
                }
            }
            out.save(path)
        }
        4 => {
            let mut out = RgbaImage::new(w, h);
            for y in 0..grid.h {
                for x in 0..grid.w {
                    let px = grid.pixel(x, y);
                    out.put_pixel(
                        x as u32,
                        y as u32,
                        Rgba([
                            quantize(px[0]),
                            quantize(px[1]),
                            quantize(px[2]),
                            quantize(px[3]),
                        ]),
                    );
                }
            }
            out.save(path)
        }
        other => return Err(format!("Cannot encode {other}-channel grid")),
    };
    result.map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a detection mask as a PNG with tampered pixels in white.
pub fn save_mask(mask: &DetectionMask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.w as u32, mask.h as u32);
    for y in 0..mask.h {
        for x in 0..mask.w {
            let v = if mask.get(x, y) { 255u8 } else { 0u8 };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
