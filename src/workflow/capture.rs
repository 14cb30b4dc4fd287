use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::draft::{DraftError, Evidence, ReportDraft};
use crate::geo::{GeoError, Locator};
use crate::imaging::{self, CompressionProfile, EncodedImage, ImagingError};
use crate::model::Category;
use crate::triage::TriageGate;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("select a category before taking a photo")]
    NoCategory,

    #[error(transparent)]
    Imaging(#[from] ImagingError),

    /// The gate judged the photo not to show the declared category
    #[error("photo rejected: {summary}")]
    Rejected { summary: String },

    #[error(transparent)]
    Location(#[from] GeoError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Photo → compress → gate → geolocation.
///
/// Each step must succeed before the next runs; only a photo that clears
/// every step becomes `Evidence`.
#[derive(Clone)]
pub struct CapturePipeline {
    gate: TriageGate,
    locator: Arc<dyn Locator>,
}

impl CapturePipeline {
    pub fn new(gate: TriageGate, locator: Arc<dyn Locator>) -> Self {
        Self { gate, locator }
    }

    /// Capture from the file picker into the draft.
    ///
    /// `Ok(false)` means the picker was cancelled and the draft is untouched.
    /// Any failure leaves the draft without a photo.
    pub async fn capture_file(
        &self,
        draft: &mut ReportDraft,
        path: Option<PathBuf>,
    ) -> Result<bool, CaptureError> {
        let category = draft.category().ok_or(CaptureError::NoCategory)?;
        let Some(path) = path else {
            return Ok(false);
        };
        draft.clear_evidence();
        let Some(image) =
            imaging::compress_file(Some(path), CompressionProfile::Evidence).await?
        else {
            return Ok(false);
        };
        self.capture_encoded(draft, image, category).await?;
        Ok(true)
    }

    /// Capture raw camera bytes into the draft.
    ///
    /// The previous photo is dropped before the new one is decoded.
    pub async fn capture_bytes(
        &self,
        draft: &mut ReportDraft,
        bytes: Vec<u8>,
    ) -> Result<(), CaptureError> {
        let category = draft.category().ok_or(CaptureError::NoCategory)?;
        draft.clear_evidence();
        let image = imaging::compress_in_background(bytes, CompressionProfile::Evidence).await?;
        self.capture_encoded(draft, image, category).await
    }

    async fn capture_encoded(
        &self,
        draft: &mut ReportDraft,
        image: EncodedImage,
        category: Category,
    ) -> Result<(), CaptureError> {
        let evidence = self.verify(image, category).await?;
        draft.attach(evidence)?;
        Ok(())
    }

    /// Run an already compressed photo through the gate and the locator
    #[instrument(skip(self, image), fields(category = %category))]
    pub async fn verify(
        &self,
        image: EncodedImage,
        category: Category,
    ) -> Result<Evidence, CaptureError> {
        let verdict = self.gate.assess(&image, category).await;
        if !verdict.is_match() {
            info!(summary = %verdict.result.summary, "photo rejected by gate");
            return Err(CaptureError::Rejected {
                summary: verdict.result.summary,
            });
        }

        let location = self.locator.locate().await.map_err(|e| {
            warn!(error = %e, "geolocation failed, photo not verified");
            e
        })?;
        if !location.is_valid() {
            warn!(?location, "locator returned an invalid position");
            return Err(GeoError::OutOfRange(location).into());
        }

        let degraded = verdict.is_degraded();
        info!(
            priority = %verdict.result.priority,
            degraded,
            location = %location.label(),
            "photo verified"
        );
        Ok(Evidence {
            image,
            location,
            category,
            priority: verdict.result.priority,
            summary: verdict.result.summary,
            degraded,
        })
    }
}
