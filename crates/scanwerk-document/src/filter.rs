// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cosmetic filter and rotation pipeline for rectified card rasters. Operates
// on RGBA buffers using the `image` and `imageproc` crates.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{self, Interpolation};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::FilterKind;
use tracing::{debug, info, instrument};

/// Adjustment pipeline over a single rectified card raster.
///
/// Each method consumes `self` and returns a new adjuster wrapping the
/// transformed raster, enabling chaining:
///
/// ```ignore
/// let png = CardAdjuster::from_raster(card)
///     .grayscale()
///     .brightness(10)
///     .rotate(90.0)
///     .to_png_bytes()?;
/// ```
pub struct CardAdjuster {
    image: RgbaImage,
}

impl CardAdjuster {
    // -- Construction ---------------------------------------------------------

    /// Wrap an already-decoded RGBA raster.
    pub fn from_raster(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode a raster from encoded bytes (PNG, JPEG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(data)
            .map_err(|err| ScanwerkError::ImageError(format!("failed to decode image: {err}")))?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "image decoded from bytes"
        );
        Ok(Self {
            image: decoded.to_rgba8(),
        })
    }

    /// Load a raster from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let decoded = image::open(path.as_ref()).map_err(|err| {
            ScanwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self {
            image: decoded.to_rgba8(),
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the working raster.
    pub fn as_raster(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the adjuster and return the raster.
    pub fn into_raster(self) -> RgbaImage {
        self.image
    }

    // -- Filters (consume self, return new Self) -------------------------------

    /// Apply a filter described by its serialisable descriptor.
    pub fn apply(self, filter: &FilterKind) -> Self {
        match *filter {
            FilterKind::Grayscale => self.grayscale(),
            FilterKind::Monochrome => self.monochrome(),
            FilterKind::Brightness(delta) => self.brightness(delta),
            FilterKind::Contrast(factor) => self.contrast(factor),
        }
    }

    /// Convert to grayscale, preserving the alpha channel.
    #[instrument(skip(self))]
    pub fn grayscale(mut self) -> Self {
        info!("converting to grayscale");
        for pixel in self.image.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            let l = luma(r, g, b);
            *pixel = Rgba([l, l, l, a]);
        }
        self
    }

    /// Reduce to black and white using Otsu's histogram threshold.
    ///
    /// The threshold is computed over the luma of opaque pixels, then every
    /// pixel darker than it becomes black and every other pixel white. Alpha
    /// is preserved, so transparent borders from rectification stay
    /// transparent.
    #[instrument(skip(self))]
    pub fn monochrome(mut self) -> Self {
        let mut histogram = [0u64; 256];
        let mut total: u64 = 0;
        for pixel in self.image.pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            if a > 0 {
                histogram[luma(r, g, b) as usize] += 1;
                total += 1;
            }
        }

        let threshold = otsu_threshold(&histogram, total);
        info!(threshold, "applying monochrome filter");

        for pixel in self.image.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            let value = if luma(r, g, b) < threshold { 0u8 } else { 255u8 };
            *pixel = Rgba([value, value, value, a]);
        }
        self
    }

    /// Adjust brightness by `delta` (clamped to [-255, 255]).
    #[instrument(skip(self), fields(delta))]
    pub fn brightness(self, delta: i32) -> Self {
        let delta = delta.clamp(-255, 255);
        info!(delta, "adjusting brightness");
        self.map_rgb(|channel| (channel as i32 + delta).clamp(0, 255) as u8)
    }

    /// Adjust contrast by `factor` about the channel midpoint. Values above
    /// 1.0 increase contrast, below 1.0 decrease it; 1.0 is a no-op.
    #[instrument(skip(self), fields(factor))]
    pub fn contrast(self, factor: f32) -> Self {
        info!(factor, "adjusting contrast");
        self.map_rgb(|channel| {
            (factor * (channel as f32 - 128.0) + 128.0).clamp(0.0, 255.0) as u8
        })
    }

    /// Apply a per-channel mapping to R, G and B, leaving alpha untouched.
    fn map_rgb(mut self, f: impl Fn(u8) -> u8) -> Self {
        for pixel in self.image.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            *pixel = Rgba([f(r), f(g), f(b), a]);
        }
        self
    }

    // -- Rotation -------------------------------------------------------------

    /// Rotate the raster clockwise by an angle in degrees.
    ///
    /// Multiples of 90 take a lossless fast path. Other angles go through
    /// `imageproc`'s centre rotation with bilinear interpolation and a
    /// transparent fill, keeping the canvas size unchanged.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        info!(normalised, "rotating raster");

        if normalised.abs() < 0.01 || (normalised - 360.0).abs() < 0.01 {
            return self;
        }
        if (normalised - 90.0).abs() < 0.01 {
            return Self {
                image: image::imageops::rotate90(&self.image),
            };
        }
        if (normalised - 180.0).abs() < 0.01 {
            return Self {
                image: image::imageops::rotate180(&self.image),
            };
        }
        if (normalised - 270.0).abs() < 0.01 {
            return Self {
                image: image::imageops::rotate270(&self.image),
            };
        }

        let rotated = geometric_transformations::rotate_about_center(
            &self.image,
            normalised.to_radians(),
            Interpolation::Bilinear,
            Rgba([0u8, 0, 0, 0]),
        );
        Self { image: rotated }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the raster as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| ScanwerkError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode the raster as JPEG bytes with the given quality (1-100).
    ///
    /// JPEG has no alpha channel; transparent pixels are flattened to white.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut flattened = self.image.clone();
        for pixel in flattened.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            if a < 255 {
                let blend = |c: u8| -> u8 {
                    let alpha = a as u32;
                    ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
                };
                *pixel = Rgba([blend(r), blend(g), blend(b), 255]);
            }
        }

        let mut buffer = Vec::new();
        let rgb = DynamicImage::ImageRgba8(flattened).to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| ScanwerkError::ImageError(format!("JPEG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Write the raster to a file; format inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            ScanwerkError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Rec. 601 luma of an RGB triple.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8
}

/// Otsu threshold over a 256-bin luma histogram.
///
/// Picks the split that maximises the between-class variance of the dark and
/// light pixel populations.
fn otsu_threshold(histogram: &[u64; 256], total: u64) -> u8 {
    if total == 0 {
        return 128;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut sum_dark = 0.0f64;
    let mut weight_dark: u64 = 0;
    let mut best_threshold: u8 = 0;
    let mut best_variance = 0.0f64;

    for (value, &count) in histogram.iter().enumerate() {
        weight_dark += count;
        if weight_dark == 0 {
            continue;
        }
        let weight_light = total - weight_dark;
        if weight_light == 0 {
            break;
        }

        sum_dark += value as f64 * count as f64;
        let mean_dark = sum_dark / weight_dark as f64;
        let mean_light = (sum_total - sum_dark) / weight_light as f64;

        let variance =
            weight_dark as f64 * weight_light as f64 * (mean_dark - mean_light).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_threshold = value as u8;
        }
    }

    best_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn grayscale_equalises_channels_and_keeps_alpha() {
        let out = CardAdjuster::from_raster(solid(4, 4, [200, 50, 10, 180]))
            .grayscale()
            .into_raster();

        let Rgba([r, g, b, a]) = *out.get_pixel(2, 2);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 180);
    }

    #[test]
    fn brightness_clamps_at_channel_bounds() {
        let bright = CardAdjuster::from_raster(solid(2, 2, [250, 128, 5, 255]))
            .brightness(20)
            .into_raster();
        assert_eq!(*bright.get_pixel(0, 0), Rgba([255, 148, 25, 255]));

        let dark = CardAdjuster::from_raster(solid(2, 2, [250, 128, 5, 255]))
            .brightness(-20)
            .into_raster();
        assert_eq!(*dark.get_pixel(0, 0), Rgba([230, 108, 0, 255]));
    }

    #[test]
    fn brightness_delta_is_clamped() {
        let out = CardAdjuster::from_raster(solid(2, 2, [100, 100, 100, 255]))
            .brightness(9999)
            .into_raster();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn unit_contrast_is_a_no_op() {
        let source = solid(3, 3, [90, 160, 220, 255]);
        let out = CardAdjuster::from_raster(source.clone())
            .contrast(1.0)
            .into_raster();
        assert_eq!(out.as_raw(), source.as_raw());
    }

    #[test]
    fn monochrome_splits_a_bimodal_image() {
        // Left half dark, right half light.
        let img = RgbaImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgba([40, 40, 40, 255])
            } else {
                Rgba([210, 210, 210, 255])
            }
        });

        let out = CardAdjuster::from_raster(img).monochrome().into_raster();
        assert_eq!(*out.get_pixel(1, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(8, 5), Rgba([255, 255, 255, 255]));
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn quarter_rotation_swaps_dimensions() {
        let out = CardAdjuster::from_raster(solid(6, 3, [1, 2, 3, 255]))
            .rotate(90.0)
            .into_raster();
        assert_eq!(out.dimensions(), (3, 6));
    }

    #[test]
    fn full_turn_is_identity() {
        let source = RgbaImage::from_fn(5, 4, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let out = CardAdjuster::from_raster(source.clone())
            .rotate(360.0)
            .into_raster();
        assert_eq!(out.as_raw(), source.as_raw());
    }

    #[test]
    fn apply_dispatches_by_descriptor() {
        let via_apply = CardAdjuster::from_raster(solid(2, 2, [10, 20, 30, 255]))
            .apply(&FilterKind::Brightness(50))
            .into_raster();
        let direct = CardAdjuster::from_raster(solid(2, 2, [10, 20, 30, 255]))
            .brightness(50)
            .into_raster();
        assert_eq!(via_apply.as_raw(), direct.as_raw());
    }

    #[test]
    fn png_bytes_decode_back_to_same_raster() {
        let source = RgbaImage::from_fn(7, 5, |x, y| Rgba([x as u8 * 9, y as u8 * 13, 77, 255]));
        let bytes = CardAdjuster::from_raster(source.clone())
            .to_png_bytes()
            .expect("encode");

        let decoded = CardAdjuster::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded.as_raster().as_raw(), source.as_raw());
    }

    #[test]
    fn save_writes_a_decodable_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("card.png");

        CardAdjuster::from_raster(solid(4, 4, [9, 8, 7, 255]))
            .save(&path)
            .expect("save");

        let reloaded = CardAdjuster::open(&path).expect("open");
        assert_eq!(reloaded.width(), 4);
        assert_eq!(reloaded.height(), 4);
    }
}
