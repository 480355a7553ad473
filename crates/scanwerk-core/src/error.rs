// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

use crate::types::DocumentId;

/// Top-level error type for all Scanwerk operations.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Geometry errors --
    #[error("degenerate corner geometry: target rectangle {width}x{height} is below one pixel")]
    DegenerateGeometry { width: f64, height: f64 },

    #[error("invalid corner set: {0}")]
    InvalidCorners(String),

    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Sheet composition errors --
    #[error("sheet composition takes one or two cards, got {0}")]
    InvalidCardCount(usize),

    #[error("card width {0} cm does not fit the sheet")]
    InvalidCardWidth(f64),

    // -- Gallery --
    #[error("document not found in gallery: {0}")]
    DocumentNotFound(DocumentId),

    // -- I/O / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
