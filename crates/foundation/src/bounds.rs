use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A bounding box was requested for zero points.
    EmptyInput,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::EmptyInput => write!(f, "cannot bound an empty set of points"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Geographic bounding box given by its north-east and south-west corners.
///
/// Padding is expressed in degrees, so framing stays independent of zoom.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub ne: LatLng,
    pub sw: LatLng,
}

impl GeoBounds {
    pub fn new(ne: LatLng, sw: LatLng) -> Self {
        Self { ne, sw }
    }

    /// Degenerate box around a single point.
    pub fn point(p: LatLng) -> Self {
        Self { ne: p, sw: p }
    }

    /// Grows the box to include `p`.
    pub fn extend(&mut self, p: LatLng) {
        self.ne.lat = self.ne.lat.max(p.lat);
        self.ne.lng = self.ne.lng.max(p.lng);
        self.sw.lat = self.sw.lat.min(p.lat);
        self.sw.lng = self.sw.lng.min(p.lng);
    }

    /// Returns a copy with each corner pushed outward by `degrees`.
    pub fn padded(self, degrees: f64) -> Self {
        Self {
            ne: LatLng::new(self.ne.lat + degrees, self.ne.lng + degrees),
            sw: LatLng::new(self.sw.lat - degrees, self.sw.lng - degrees),
        }
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat <= self.ne.lat && p.lat >= self.sw.lat && p.lng <= self.ne.lng && p.lng >= self.sw.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.ne.lat + self.sw.lat) / 2.0,
            (self.ne.lng + self.sw.lng) / 2.0,
        )
    }
}

/// Min/max box over `points`, expanded outward by `padding_degrees`.
///
/// Fails on empty input; callers frame a single point with a center command
/// instead of a degenerate box.
pub fn bounding_box_of<I>(points: I, padding_degrees: f64) -> Result<GeoBounds, GeometryError>
where
    I: IntoIterator<Item = LatLng>,
{
    let mut iter = points.into_iter();
    let first = iter.next().ok_or(GeometryError::EmptyInput)?;
    let mut bounds = GeoBounds::point(first);
    for p in iter {
        bounds.extend(p);
    }
    Ok(bounds.padded(padding_degrees))
}

/// Screen-space padding in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeInsets {
    pub fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeInsets, GeometryError, bounding_box_of};
    use crate::geo::LatLng;

    fn assert_close(a: f64, b: f64) {
        let diff = (a - b).abs();
        assert!(diff <= 1e-12, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn empty_input_is_an_error() {
        let got = bounding_box_of(Vec::<LatLng>::new(), 0.01);
        assert_eq!(got, Err(GeometryError::EmptyInput));
    }

    #[test]
    fn box_is_min_max_plus_padding() {
        let pts = vec![
            LatLng::new(45.80, 15.96),
            LatLng::new(45.81, 15.99),
            LatLng::new(45.79, 15.97),
        ];
        let b = bounding_box_of(pts, 0.01).unwrap();
        assert_close(b.ne.lat, 45.82);
        assert_close(b.ne.lng, 16.00);
        assert_close(b.sw.lat, 45.78);
        assert_close(b.sw.lng, 15.95);
    }

    #[test]
    fn every_point_sits_inside_the_padding() {
        let sets: Vec<Vec<LatLng>> = vec![
            vec![LatLng::new(0.0, 0.0)],
            vec![LatLng::new(-33.9, 151.2), LatLng::new(51.5, -0.12)],
            (0..25)
                .map(|i| LatLng::new(-60.0 + i as f64 * 4.7, 170.0 - i as f64 * 13.1))
                .collect(),
        ];
        let pad = 0.01;
        for pts in sets {
            let b = bounding_box_of(pts.iter().copied(), pad).unwrap();
            for p in &pts {
                assert!(b.ne.lat >= p.lat + pad - 1e-12);
                assert!(b.ne.lng >= p.lng + pad - 1e-12);
                assert!(b.sw.lat <= p.lat - pad + 1e-12);
                assert!(b.sw.lng <= p.lng - pad + 1e-12);
                assert!(b.contains(*p));
            }
        }
    }

    #[test]
    fn single_point_box_is_centered_on_it() {
        let p = LatLng::new(10.0, 20.0);
        let b = bounding_box_of([p], 0.5).unwrap();
        assert_eq!(b.center(), p);
        assert_eq!(EdgeInsets::uniform(50.0).left, 50.0);
    }
}
