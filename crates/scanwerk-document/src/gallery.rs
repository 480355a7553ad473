// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory gallery of rectified documents.
//
// The gallery holds the session's corrected scans together with their
// provenance metadata (corner set used, source hash, timestamps). It does not
// persist anything; serialising or storing the collection is the embedding
// application's concern.

use chrono::Utc;
use image::RgbaImage;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{CornerSet, DocumentId, DocumentMeta, FilterKind};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::filter::CardAdjuster;
use crate::scan::rectify::PerspectiveRectifier;

/// A corrected document raster plus its metadata.
#[derive(Debug, Clone)]
pub struct RectifiedDocument {
    pub meta: DocumentMeta,
    pub raster: RgbaImage,
}

/// Session store of rectified documents.
#[derive(Debug, Default)]
pub struct ScanGallery {
    documents: Vec<RectifiedDocument>,
}

impl ScanGallery {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Creation / recrop ----------------------------------------------------

    /// Rectify `source` through `corners` and add the result to the gallery.
    ///
    /// Returns the id of the new document. The source raster is hashed so the
    /// document's provenance survives later edits.
    #[instrument(skip(self, source), fields(src_w = source.width(), src_h = source.height()))]
    pub fn add_scan(&mut self, source: &RgbaImage, corners: CornerSet) -> Result<DocumentId> {
        let raster = PerspectiveRectifier::rectify(source, &corners)?;
        let meta = DocumentMeta::new(corners, hash_raster(source));
        let id = meta.id;

        info!(%id, out_w = raster.width(), out_h = raster.height(), "document added to gallery");
        self.documents.push(RectifiedDocument { meta, raster });
        Ok(id)
    }

    /// Re-run rectification for an existing document with adjusted corners.
    ///
    /// Replaces the raster and the stored corner set but keeps the document's
    /// identity. Any previously applied filter is baked into the old raster
    /// and therefore discarded along with it.
    #[instrument(skip(self, source))]
    pub fn recrop(
        &mut self,
        id: DocumentId,
        source: &RgbaImage,
        corners: CornerSet,
    ) -> Result<()> {
        let raster = PerspectiveRectifier::rectify(source, &corners)?;
        let doc = self.document_mut(id)?;

        doc.raster = raster;
        doc.meta.corners = corners;
        doc.meta.filter = None;
        doc.meta.rotation_degrees = 0.0;
        doc.meta.updated_at = Utc::now();

        debug!(%id, "document recropped");
        Ok(())
    }

    // -- Edits ----------------------------------------------------------------

    /// Apply a cosmetic filter to a stored document.
    #[instrument(skip(self))]
    pub fn apply_filter(&mut self, id: DocumentId, filter: FilterKind) -> Result<()> {
        let doc = self.document_mut(id)?;

        let raster = std::mem::replace(&mut doc.raster, RgbaImage::new(0, 0));
        doc.raster = CardAdjuster::from_raster(raster).apply(&filter).into_raster();
        doc.meta.filter = Some(filter);
        doc.meta.updated_at = Utc::now();

        debug!(%id, ?filter, "filter applied");
        Ok(())
    }

    /// Rotate a stored document clockwise by `degrees`.
    #[instrument(skip(self))]
    pub fn rotate(&mut self, id: DocumentId, degrees: f32) -> Result<()> {
        let doc = self.document_mut(id)?;

        let raster = std::mem::replace(&mut doc.raster, RgbaImage::new(0, 0));
        doc.raster = CardAdjuster::from_raster(raster).rotate(degrees).into_raster();
        doc.meta.rotation_degrees = (doc.meta.rotation_degrees + degrees).rem_euclid(360.0);
        doc.meta.updated_at = Utc::now();

        debug!(%id, degrees, total = doc.meta.rotation_degrees, "document rotated");
        Ok(())
    }

    // -- Access ---------------------------------------------------------------

    pub fn get(&self, id: DocumentId) -> Option<&RectifiedDocument> {
        self.documents.iter().find(|d| d.meta.id == id)
    }

    /// Remove a document, returning it to the caller.
    pub fn remove(&mut self, id: DocumentId) -> Result<RectifiedDocument> {
        let index = self
            .documents
            .iter()
            .position(|d| d.meta.id == id)
            .ok_or(ScanwerkError::DocumentNotFound(id))?;
        info!(%id, "document removed from gallery");
        Ok(self.documents.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RectifiedDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn document_mut(&mut self, id: DocumentId) -> Result<&mut RectifiedDocument> {
        self.documents
            .iter_mut()
            .find(|d| d.meta.id == id)
            .ok_or(ScanwerkError::DocumentNotFound(id))
    }
}

/// SHA-256 over dimensions and raw pixel bytes, hex-encoded.
fn hash_raster(image: &RgbaImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(image.as_raw());
    hex::encode(hasher.finalize())
}
