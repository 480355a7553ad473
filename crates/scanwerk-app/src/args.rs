// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and corner-string parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{CornerSet, FilterKind, Point};

/// Scanwerk command-line interface.
#[derive(Parser, Debug)]
#[command(name = "scanwerk", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rectify a marked document quadrilateral into a flat raster.
    Rectify {
        /// Input photo containing the document.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Corner points as "x,y x,y x,y x,y" in TL TR BR BL order.
        #[arg(long, value_name = "CORNERS")]
        corners: String,

        /// Output image path; format inferred from the extension.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Cosmetic filter applied after rectification.
        #[arg(long, value_name = "NAME")]
        filter: Option<FilterArg>,

        /// Brightness offset (-255 to 255).
        #[arg(long, value_name = "DELTA")]
        brightness: Option<i32>,

        /// Contrast factor (1.0 leaves the image unchanged).
        #[arg(long, value_name = "FACTOR")]
        contrast: Option<f32>,

        /// Clockwise rotation in degrees.
        #[arg(long, value_name = "DEGREES")]
        rotate: Option<f32>,
    },

    /// Compose one or two card images onto a printable A4 sheet.
    Sheet {
        /// Card image path; pass twice to place two cards.
        #[arg(long = "card", value_name = "FILE")]
        cards: Vec<PathBuf>,

        /// Physical card width on the sheet, in centimetres.
        #[arg(long, value_name = "CM")]
        card_width_cm: Option<f64>,

        /// Output image path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
}

/// Filters selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilterArg {
    Grayscale,
    Monochrome,
}

impl From<FilterArg> for FilterKind {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Grayscale => FilterKind::Grayscale,
            FilterArg::Monochrome => FilterKind::Monochrome,
        }
    }
}

/// Parse a corner string of the form `"x,y x,y x,y x,y"` (TL TR BR BL).
pub fn parse_corners(raw: &str) -> Result<CornerSet> {
    let mut points = Vec::with_capacity(4);

    for token in raw.split_whitespace() {
        let (x, y) = token.split_once(',').ok_or_else(|| {
            ScanwerkError::InvalidCorners(format!("expected an x,y pair, got '{token}'"))
        })?;
        let x: f64 = x.trim().parse().map_err(|_| {
            ScanwerkError::InvalidCorners(format!("bad x coordinate '{x}' in '{token}'"))
        })?;
        let y: f64 = y.trim().parse().map_err(|_| {
            ScanwerkError::InvalidCorners(format!("bad y coordinate '{y}' in '{token}'"))
        })?;
        points.push(Point::new(x, y));
    }

    let corners: [Point; 4] = points.try_into().map_err(|v: Vec<Point>| {
        ScanwerkError::InvalidCorners(format!("expected 4 corner points, got {}", v.len()))
    })?;
    Ok(CornerSet::new(corners))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_corner_pairs() {
        let corners = parse_corners("100,100 700,120 680,580 120,560").expect("parse");
        assert_eq!(corners.top_left(), Point::new(100.0, 100.0));
        assert_eq!(corners.bottom_left(), Point::new(120.0, 560.0));
    }

    #[test]
    fn accepts_fractional_coordinates() {
        let corners = parse_corners("0.5,1.25 10,0 10,8 0,8").expect("parse");
        assert_eq!(corners.top_left(), Point::new(0.5, 1.25));
    }

    #[test]
    fn rejects_wrong_point_count() {
        let err = parse_corners("1,1 2,2 3,3").unwrap_err();
        assert!(matches!(err, ScanwerkError::InvalidCorners(_)));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_corners("1;1 2,2 3,3 4,4").is_err());
        assert!(parse_corners("a,1 2,2 3,3 4,4").is_err());
    }
}
