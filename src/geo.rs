//! Geolocation contract
//!
//! The device position is captured once per photo. There is no default
//! coordinate: a denied or failed lookup is an error the caller must surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Both components finite and within range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Four-decimal label used by the report preview
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("location access denied; GPS is required for reporting")]
    Denied,

    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("location out of range: {0:?}")]
    OutOfRange(Coordinates),
}

/// Source of the device position
#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeoError>;
}
