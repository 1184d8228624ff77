use foundation::LatLng;

use crate::features::GeoFeature;
use crate::place::Place;

/// A tap as reported by the map layer: the pressed coordinate (if resolved)
/// and whatever rendered features sit under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapEvent {
    pub coordinate: Option<LatLng>,
    pub features: Vec<GeoFeature>,
}

impl TapEvent {
    pub fn background(coordinate: Option<LatLng>) -> Self {
        Self {
            coordinate,
            features: Vec::new(),
        }
    }

    pub fn on_features(features: Vec<GeoFeature>) -> Self {
        let coordinate = features.first().map(GeoFeature::coordinate);
        Self {
            coordinate,
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapTarget {
    Place(Place),
    Cluster { coordinate: LatLng, point_count: u32 },
    Background(Option<LatLng>),
}

/// Resolves a tap to exactly one target.
///
/// Ordering contract:
/// - A hit on any rendered feature wins over the map background; the
///   background handler never fires for the same gesture.
/// - Among hits, the first feature reported by the map layer wins.
pub fn dispatch_tap(event: TapEvent) -> TapTarget {
    let Some(feature) = event.features.into_iter().next() else {
        return TapTarget::Background(event.coordinate);
    };
    if let Some(cluster) = feature.as_cluster() {
        return TapTarget::Cluster {
            coordinate: feature.coordinate(),
            point_count: cluster.point_count,
        };
    }
    match feature.as_place() {
        Some(place) => TapTarget::Place(place.clone()),
        // Cluster-shaped properties with `cluster: false` carry no place;
        // treat the hit as a plain press at the feature's position.
        None => TapTarget::Background(Some(feature.coordinate())),
    }
}
