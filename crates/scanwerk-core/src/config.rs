// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::{FilterKind, SheetFormat};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Default physical card width for sheet composition, in centimetres.
    /// 8.56 cm is the ID-1 card standard (85.6 mm).
    pub default_card_width_cm: f64,
    /// Sheet format for composed output.
    pub sheet_format: SheetFormat,
    /// Filter applied automatically to freshly rectified documents, if any.
    pub default_filter: Option<FilterKind>,
    /// Quality used when encoding JPEG output (1-100).
    pub jpeg_quality: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_card_width_cm: 8.56,
            sheet_format: SheetFormat::A4Portrait,
            default_filter: None,
            jpeg_quality: 90,
        }
    }
}
