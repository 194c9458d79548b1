//! Geofenced map pin.
//!
//! The page's map widget reverse-geocodes the pin and posts the result here.
//! A pin counts only if both the subdivision code and the country code match
//! the configured region exactly.

use redtape_common::{LocationView, RedTapeError};
use serde::Deserialize;

use crate::config::RegionConfig;

/// Pin drop as reported by the map widget
#[derive(Debug, Clone, Deserialize)]
pub struct PinDrop {
    pub lat: f64,
    pub lng: f64,
    /// Display address from the geocoder
    #[serde(default)]
    pub address: String,
    /// e.g. "CA-ON"
    #[serde(default)]
    pub region_code: Option<String>,
    /// e.g. "ca"
    #[serde(default)]
    pub country_code: Option<String>,
}

impl PinDrop {
    pub fn validate(&self) -> Result<(), RedTapeError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(RedTapeError::InvalidInput(format!("latitude out of range: {}", self.lat)));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(RedTapeError::InvalidInput(format!("longitude out of range: {}", self.lng)));
        }
        Ok(())
    }
}

/// The region a pin must land in
#[derive(Debug, Clone)]
pub struct RequiredRegion {
    region_code: String,
    country_code: String,
    label: String,
}

impl RequiredRegion {
    pub fn new(region_code: impl Into<String>, country_code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            country_code: country_code.into(),
            label: label.into(),
        }
    }

    pub fn contains(&self, pin: &PinDrop) -> bool {
        pin.region_code.as_deref() == Some(self.region_code.as_str())
            && pin.country_code.as_deref() == Some(self.country_code.as_str())
    }

    /// Judge a pin, producing what the page shows next to the map
    pub fn judge(&self, pin: &PinDrop) -> LocationView {
        LocationView {
            address: pin.address.clone(),
            lat: pin.lat,
            lng: pin.lng,
            valid: self.contains(pin),
            required_region: self.label.clone(),
        }
    }
}

impl From<&RegionConfig> for RequiredRegion {
    fn from(config: &RegionConfig) -> Self {
        Self::new(&config.region_code, &config.country_code, &config.label)
    }
}
