use thiserror::Error;
use tracing::{info, warn};

use crate::models::restaurant::Coordinate;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("permission to read the position was denied")]
    PermissionDenied,

    #[error("no position source is available")]
    Unsupported,
}

/// One-shot position lookup.
#[allow(async_fn_in_trait)]
pub trait Geolocator {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// Position source built from configuration: a fixed coordinate, or nothing.
#[derive(Clone, Copy, Debug)]
pub enum ConfiguredGeolocator {
    Fixed(Coordinate),
    Unavailable,
}

impl ConfiguredGeolocator {
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (Some(lat), Some(long)) => ConfiguredGeolocator::Fixed(Coordinate::new(lat, long)),
            _ => ConfiguredGeolocator::Unavailable,
        }
    }
}

impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        match self {
            ConfiguredGeolocator::Fixed(coordinate) => Ok(*coordinate),
            ConfiguredGeolocator::Unavailable => Err(GeolocationError::Unsupported),
        }
    }
}

/// Never fails: a missing position is a valid, degraded state.
pub async fn locate<G: Geolocator>(geolocator: &G) -> Option<Coordinate> {
    match geolocator.current_position().await {
        Ok(coordinate) => {
            info!(lat = coordinate.lat, long = coordinate.long, "Using current position");
            Some(coordinate)
        }
        Err(e) => {
            warn!("Continuing without a position due to: {}", e);
            None
        }
    }
}
