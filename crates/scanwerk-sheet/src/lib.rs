// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-sheet — Printable card-sheet composition.
//
// Places one or two rectified documents onto a fixed A4-at-300-DPI page
// raster at a user-chosen physical card width, ready for image export.

pub mod compose;

pub use compose::{CARD_CORNER_RADIUS_PX, SheetComposer};
