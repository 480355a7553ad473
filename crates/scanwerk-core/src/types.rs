// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk document scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point in a single pixel coordinate space.
///
/// Whether the coordinates live in source-image space or destination-canvas
/// space is determined by context; the two spaces must never be mixed without
/// an explicit transform between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Four ordered corner points marking a document boundary.
///
/// The order is fixed and semantically meaningful: top-left, top-right,
/// bottom-right, bottom-left. A caller that supplies corners in a different
/// order gets a mirrored or rotated rectification — the order is used
/// positionally and never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerSet([Point; 4]);

impl CornerSet {
    /// Build a corner set from points in {TL, TR, BR, BL} order.
    pub fn new(corners: [Point; 4]) -> Self {
        Self(corners)
    }

    /// The axis-aligned rectangle `[(0,0), (w,0), (w,h), (0,h)]`.
    pub fn axis_aligned(width: f64, height: f64) -> Self {
        Self([
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ])
    }

    pub fn top_left(&self) -> Point {
        self.0[0]
    }

    pub fn top_right(&self) -> Point {
        self.0[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.0[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.0[3]
    }

    /// All four corners in {TL, TR, BR, BL} order.
    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }
}

/// Unique identifier for a gallery document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cosmetic adjustment applied to a rectified document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Luma conversion, alpha preserved.
    Grayscale,
    /// Black-and-white via Otsu's threshold.
    Monochrome,
    /// Per-channel brightness offset, clamped to [-255, 255].
    Brightness(i32),
    /// Per-channel contrast scale about the midpoint; 1.0 is a no-op.
    Contrast(f32),
}

/// Metadata carried alongside a rectified document raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: DocumentId,
    /// The source-space corner set the raster was rectified from.
    pub corners: CornerSet,
    /// Accumulated rotation applied after rectification, in degrees.
    pub rotation_degrees: f32,
    /// Last cosmetic filter applied, if any.
    pub filter: Option<FilterKind>,
    /// SHA-256 hash of the source raster bytes.
    pub source_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentMeta {
    pub fn new(corners: CornerSet, source_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            corners,
            rotation_degrees: 0.0,
            filter: None,
            source_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Printable sheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetFormat {
    /// A4 portrait rasterised at 300 DPI.
    A4Portrait,
}

impl SheetFormat {
    /// Page raster dimensions in pixels (width, height).
    pub fn dimensions_px(&self) -> (u32, u32) {
        match self {
            // 210x297 mm at 300 DPI. The exact pixel values are part of the
            // output contract and must not be recomputed from rounded DPI.
            Self::A4Portrait => (2480, 3508),
        }
    }
}

/// Pixels per centimetre on a composed sheet (300 DPI assumption).
///
/// Part of the output contract: card widths given in centimetres convert to
/// sheet pixels through this exact constant.
pub const PX_PER_CM: f64 = 118.11;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn axis_aligned_corner_order() {
        let rect = CornerSet::axis_aligned(200.0, 100.0);
        assert_eq!(rect.top_left(), Point::new(0.0, 0.0));
        assert_eq!(rect.top_right(), Point::new(200.0, 0.0));
        assert_eq!(rect.bottom_right(), Point::new(200.0, 100.0));
        assert_eq!(rect.bottom_left(), Point::new(0.0, 100.0));
    }

    #[test]
    fn corner_set_serde_roundtrip() {
        let corners = CornerSet::new([
            Point::new(100.0, 100.0),
            Point::new(700.0, 120.0),
            Point::new(680.0, 580.0),
            Point::new(120.0, 560.0),
        ]);
        let json = serde_json::to_string(&corners).expect("serialize");
        let back: CornerSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, corners);
    }

    #[test]
    fn a4_page_raster_size() {
        assert_eq!(SheetFormat::A4Portrait.dimensions_px(), (2480, 3508));
    }
}
