// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — perspective rectification of user-marked documents.

pub mod rectify;

pub use rectify::PerspectiveRectifier;
