// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document — Document processing for the Scanwerk scanner.
//
// Provides the geometric perspective-correction engine (linear solver,
// projective transform, inverse-mapping rectifier), a cosmetic filter and
// rotation pipeline, and the in-memory gallery of rectified documents.

pub mod filter;
pub mod gallery;
pub mod geometry;
pub mod scan;

// Re-export the primary types so callers can use `scanwerk_document::PerspectiveRectifier` etc.
pub use filter::CardAdjuster;
pub use gallery::{RectifiedDocument, ScanGallery};
pub use geometry::homography::ProjectiveTransform;
pub use scan::rectify::PerspectiveRectifier;
