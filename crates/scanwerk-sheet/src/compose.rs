// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card-sheet composition — scales rectified documents to a physical width and
// places them on a fixed printable page raster.
//
// The numeric contract here (pixels-per-centimetre constant, page raster
// size, placement fractions) is load-bearing for output compatibility and
// must not drift.

use image::{Rgba, RgbaImage};
use scanwerk_core::PX_PER_CM;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::SheetFormat;
use scanwerk_document::RectifiedDocument;
use tracing::{debug, info, instrument};

/// Corner radius of the rounded cutout applied to each placed card, in page
/// pixels.
pub const CARD_CORNER_RADIUS_PX: u32 = 30;

/// Composes one or two rectified documents onto a printable sheet.
pub struct SheetComposer {
    /// Physical card width on the printed page, in centimetres.
    card_width_cm: f64,
    format: SheetFormat,
}

impl SheetComposer {
    /// Create a composer for an A4 portrait sheet.
    pub fn new(card_width_cm: f64) -> Result<Self> {
        Self::with_format(card_width_cm, SheetFormat::A4Portrait)
    }

    /// Create a composer for an explicit sheet format.
    pub fn with_format(card_width_cm: f64, format: SheetFormat) -> Result<Self> {
        let (page_w, _) = format.dimensions_px();
        let width_px = card_width_cm * PX_PER_CM;
        if !width_px.is_finite() || width_px.round() < 1.0 || width_px.round() > page_w as f64 {
            return Err(ScanwerkError::InvalidCardWidth(card_width_cm));
        }
        Ok(Self {
            card_width_cm,
            format,
        })
    }

    /// The configured card width converted to page pixels.
    pub fn card_width_px(&self) -> u32 {
        (self.card_width_cm * PX_PER_CM).round() as u32
    }

    /// Compose the given gallery documents onto a fresh page raster.
    ///
    /// A single card is centred at the page's vertical midpoint; two cards
    /// sit at one third and two thirds of page height. Cards are scaled to
    /// the configured physical width with aspect ratio preserved, drawn with
    /// rounded corners, and alpha-composited over the white page.
    pub fn compose(&self, cards: &[&RectifiedDocument]) -> Result<RgbaImage> {
        let rasters: Vec<&RgbaImage> = cards.iter().map(|d| &d.raster).collect();
        self.compose_rasters(&rasters)
    }

    /// Compose bare card rasters; see [`Self::compose`].
    #[instrument(skip(self, cards), fields(count = cards.len()))]
    pub fn compose_rasters(&self, cards: &[&RgbaImage]) -> Result<RgbaImage> {
        if cards.is_empty() || cards.len() > 2 {
            return Err(ScanwerkError::InvalidCardCount(cards.len()));
        }

        let (page_w, page_h) = self.format.dimensions_px();
        let mut page = RgbaImage::from_pixel(page_w, page_h, Rgba([255, 255, 255, 255]));

        let centres: Vec<u32> = if cards.len() == 1 {
            vec![page_h / 2]
        } else {
            vec![page_h / 3, 2 * page_h / 3]
        };

        info!(
            cards = cards.len(),
            card_width_px = self.card_width_px(),
            "composing sheet"
        );

        for (raster, &centre_y) in cards.iter().zip(centres.iter()) {
            self.place_card(&mut page, raster, centre_y)?;
        }

        Ok(page)
    }

    /// Scale a card raster to the configured width and draw it centred
    /// horizontally with its vertical midpoint at `centre_y`.
    fn place_card(&self, page: &mut RgbaImage, raster: &RgbaImage, centre_y: u32) -> Result<()> {
        let (src_w, src_h) = raster.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(ScanwerkError::ImageError(
                "cannot place an empty card raster".into(),
            ));
        }

        let target_w = self.card_width_px();
        let target_h = ((target_w as f64) * (src_h as f64) / (src_w as f64))
            .round()
            .max(1.0) as u32;
        let scaled = image::imageops::resize(
            raster,
            target_w,
            target_h,
            image::imageops::FilterType::Lanczos3,
        );

        let (page_w, page_h) = page.dimensions();
        let left = page_w.saturating_sub(target_w) / 2;
        let top = centre_y.saturating_sub(target_h / 2);

        debug!(target_w, target_h, left, top, "placing card");

        for y in 0..target_h {
            let py = top + y;
            if py >= page_h {
                break;
            }
            for x in 0..target_w {
                let px = left + x;
                if px >= page_w {
                    break;
                }
                if !inside_rounded_rect(x, y, target_w, target_h, CARD_CORNER_RADIUS_PX) {
                    continue;
                }
                blend_over(page.get_pixel_mut(px, py), *scaled.get_pixel(x, y));
            }
        }

        Ok(())
    }
}

/// Whether the pixel at (x, y) of a w×h card lies inside the card's rounded
/// outline. Pixels in a corner square must fall within the quarter-circle of
/// the given radius.
fn inside_rounded_rect(x: u32, y: u32, w: u32, h: u32, radius: u32) -> bool {
    let r = radius.min(w / 2).min(h / 2) as f64;
    if r <= 0.0 {
        return true;
    }

    let xf = x as f64 + 0.5;
    let yf = y as f64 + 0.5;

    let cx = if xf < r {
        r
    } else if xf > w as f64 - r {
        w as f64 - r
    } else {
        return true;
    };
    let cy = if yf < r {
        r
    } else if yf > h as f64 - r {
        h as f64 - r
    } else {
        return true;
    };

    let dx = xf - cx;
    let dy = yf - cy;
    dx * dx + dy * dy <= r * r
}

/// Source-over composite of `src` onto an opaque page pixel.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let alpha = src.0[3] as u32;
    if alpha == 255 {
        *dst = src;
        return;
    }
    if alpha == 0 {
        return;
    }
    for i in 0..3 {
        let s = src.0[i] as u32;
        let d = dst.0[i] as u32;
        dst.0[i] = ((s * alpha + d * (255 - alpha)) / 255) as u8;
    }
    dst.0[3] = 255;
}
