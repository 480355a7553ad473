// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Numeric geometry — dense linear solving and projective transforms.

pub mod homography;
pub mod linear;

pub use homography::ProjectiveTransform;
