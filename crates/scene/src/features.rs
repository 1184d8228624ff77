//! GeoJSON-shaped point features handed to the clustering map layer.
//!
//! Clustering itself happens in the rendering collaborator. This module only
//! builds the point source and decodes the features it reports back on tap.

use foundation::LatLng;
use serde::{Deserialize, Serialize};

use crate::place::Place;

/// Default cluster radius in screen pixels.
pub const DEFAULT_CLUSTER_RADIUS_PX: u32 = 50;
/// Zoom level above which points are never clustered.
pub const DEFAULT_CLUSTER_MAX_ZOOM: u8 = 14;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    pub radius: u32,
    pub max_zoom: u8,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_CLUSTER_RADIUS_PX,
            max_zoom: DEFAULT_CLUSTER_MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[lng, lat]` order.
    Point { coordinates: [f64; 2] },
}

/// Properties attached by the map layer to an aggregated point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProperties {
    pub cluster: bool,
    pub cluster_id: u64,
    pub point_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureProperties {
    // Tried first: a place record never carries `cluster`/`point_count`.
    Cluster(ClusterProperties),
    Place(Box<Place>),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "type")]
    pub kind: FeatureTag,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl GeoFeature {
    pub fn coordinate(&self) -> LatLng {
        match &self.geometry {
            Geometry::Point { coordinates } => LatLng::from_lng_lat(*coordinates),
        }
    }

    pub fn as_place(&self) -> Option<&Place> {
        match &self.properties {
            FeatureProperties::Place(p) => Some(&**p),
            FeatureProperties::Cluster(_) => None,
        }
    }

    /// Cluster properties, if the map layer marked this feature as an aggregate.
    pub fn as_cluster(&self) -> Option<&ClusterProperties> {
        match &self.properties {
            FeatureProperties::Cluster(c) if c.cluster => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionTag,
    pub features: Vec<GeoFeature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Wraps a place as a point feature carrying the place as its properties.
pub fn to_point_feature(place: &Place) -> GeoFeature {
    GeoFeature {
        kind: FeatureTag::Feature,
        geometry: Geometry::Point {
            coordinates: place.coordinate().to_lng_lat(),
        },
        properties: FeatureProperties::Place(Box::new(place.clone())),
    }
}

pub fn feature_collection<'a, I>(places: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a Place>,
{
    FeatureCollection {
        kind: CollectionTag::FeatureCollection,
        features: places.into_iter().map(to_point_feature).collect(),
    }
}

/// Clustered point source as consumed by the map layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapSource {
    pub shape: FeatureCollection,
    pub cluster: ClusterConfig,
}
