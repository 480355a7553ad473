// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — resamples a user-marked document quadrilateral
// into a flat rectangular raster through the inverse projective transform.

use image::RgbaImage;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::CornerSet;
use tracing::{debug, info, instrument};

use crate::geometry::homography::ProjectiveTransform;

/// Flattens a marked document quadrilateral into an axis-aligned raster.
pub struct PerspectiveRectifier;

impl PerspectiveRectifier {
    /// Target rectangle size `(width, height)` for a corner set.
    ///
    /// Width is the longer of the top and bottom sides, height the longer of
    /// the left and right sides, so no source content is compressed away on
    /// the shorter side of each opposing pair.
    pub fn target_dimensions(corners: &CornerSet) -> (f64, f64) {
        let top = corners.top_left().distance(&corners.top_right());
        let bottom = corners.bottom_left().distance(&corners.bottom_right());
        let left = corners.top_left().distance(&corners.bottom_left());
        let right = corners.top_right().distance(&corners.bottom_right());
        (top.max(bottom), left.max(right))
    }

    /// Rectify `source` through the quadrilateral marked by `corners`.
    ///
    /// Derives the destination-to-source projective transform and fills a
    /// freshly allocated output raster by nearest-neighbour lookup. Output
    /// pixels whose source position falls outside the raster (or cannot be
    /// computed because the corner geometry is numerically singular) stay
    /// transparent; only a target rectangle that collapses below one pixel is
    /// reported as an error.
    #[instrument(skip(source), fields(src_w = source.width(), src_h = source.height()))]
    pub fn rectify(source: &RgbaImage, corners: &CornerSet) -> Result<RgbaImage> {
        let (target_w, target_h) = Self::target_dimensions(corners);

        // Coincident corners collapse the target below one pixel. Collinear
        // but distinct corners still have positive side lengths and pass this
        // check; the collapsed mapping then yields smeared or blank content
        // rather than an error.
        if !(target_w.round() >= 1.0) || !(target_h.round() >= 1.0) {
            return Err(ScanwerkError::DegenerateGeometry {
                width: target_w,
                height: target_h,
            });
        }

        // Solve for the mapping that sends destination coordinates back into
        // the source, so resampling pulls a value for every output pixel
        // instead of pushing source pixels and leaving gaps.
        let dest_rect = CornerSet::axis_aligned(target_w, target_h);
        let inverse = ProjectiveTransform::from_correspondences(&dest_rect, corners);

        let out_w = target_w.round() as u32;
        let out_h = target_h.round() as u32;
        let (src_w, src_h) = (source.width() as f64, source.height() as f64);

        info!(out_w, out_h, "rectifying document");

        let mut output = RgbaImage::new(out_w, out_h);
        let mut skipped: u64 = 0;

        for y in 0..out_h {
            for x in 0..out_w {
                let p = inverse.apply(x as f64, y as f64);
                if !p.x.is_finite() || !p.y.is_finite() {
                    skipped += 1;
                    continue;
                }

                let sx = p.x.round();
                let sy = p.y.round();
                if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
                    // Outside the source raster: leave the pixel transparent.
                    skipped += 1;
                    continue;
                }

                output.put_pixel(x, y, *source.get_pixel(sx as u32, sy as u32));
            }
        }

        debug!(skipped, "resampling complete");
        Ok(output)
    }
}
