// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — document rectification and card-sheet composition CLI.
//
// Entry point. Initialises logging, then dispatches to the rectification or
// sheet-composition flow.

mod args;

use std::path::{Path, PathBuf};

use clap::Parser;
use image::RgbaImage;
use tracing::info;

use scanwerk_core::ScanConfig;
use scanwerk_core::error::Result;
use scanwerk_document::{CardAdjuster, PerspectiveRectifier};
use scanwerk_sheet::SheetComposer;

use args::{Args, Command, FilterArg};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Args::parse().command {
        Command::Rectify {
            input,
            corners,
            output,
            filter,
            brightness,
            contrast,
            rotate,
        } => run_rectify(
            &input, &corners, &output, filter, brightness, contrast, rotate,
        ),
        Command::Sheet {
            cards,
            card_width_cm,
            output,
        } => run_sheet(&cards, card_width_cm, &output),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_rectify(
    input: &Path,
    corner_arg: &str,
    output: &Path,
    filter: Option<FilterArg>,
    brightness: Option<i32>,
    contrast: Option<f32>,
    rotate: Option<f32>,
) -> Result<()> {
    let corners = args::parse_corners(corner_arg)?;
    let source = CardAdjuster::open(input)?.into_raster();

    let rectified = PerspectiveRectifier::rectify(&source, &corners)?;
    info!(
        width = rectified.width(),
        height = rectified.height(),
        "document rectified"
    );

    let mut adjuster = CardAdjuster::from_raster(rectified);
    if let Some(filter) = filter {
        adjuster = adjuster.apply(&filter.into());
    }
    if let Some(delta) = brightness {
        adjuster = adjuster.brightness(delta);
    }
    if let Some(factor) = contrast {
        adjuster = adjuster.contrast(factor);
    }
    if let Some(degrees) = rotate {
        adjuster = adjuster.rotate(degrees);
    }

    adjuster.save(output)?;
    info!(output = %output.display(), "rectified document written");
    Ok(())
}

fn run_sheet(cards: &[PathBuf], card_width_cm: Option<f64>, output: &Path) -> Result<()> {
    let config = ScanConfig::default();
    let width_cm = card_width_cm.unwrap_or(config.default_card_width_cm);
    let composer = SheetComposer::new(width_cm)?;

    let mut rasters: Vec<RgbaImage> = Vec::with_capacity(cards.len());
    for path in cards {
        rasters.push(CardAdjuster::open(path)?.into_raster());
    }
    let refs: Vec<&RgbaImage> = rasters.iter().collect();

    let page = composer.compose_rasters(&refs)?;
    CardAdjuster::from_raster(page).save(output)?;
    info!(
        cards = cards.len(),
        width_cm,
        output = %output.display(),
        "sheet written"
    );
    Ok(())
}
