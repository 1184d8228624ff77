use serde::{Deserialize, Serialize};

/// Valid latitude range in WGS84 degrees.
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range in WGS84 degrees.
pub const LNG_RANGE: (f64, f64) = (-180.0, 180.0);

/// WGS84 coordinate in degrees.
///
/// Field order follows the `lat`/`lng` naming used by the places backend.
/// Map-facing geometry uses `[lng, lat]` order, see [`LatLng::to_lng_lat`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from a GeoJSON-ordered `[lng, lat]` pair.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (LAT_RANGE.0..=LAT_RANGE.1).contains(&self.lat)
            && (LNG_RANGE.0..=LNG_RANGE.1).contains(&self.lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
