//! Camera planning for a selected boundary
//!
//! [`plan`] decides how the map should frame a boundary: a large outline is
//! fitted with symmetric vertical padding so its edges are not clipped, a
//! small one gets an animated fly-to, and a candidate without an outline is
//! flown to as a point. The planner holds no map state; the caller passes the
//! viewport height and the map's current projection.

use crate::models::{BoundaryCandidate, BoundingBox};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Zoom used when flying to a bare point
pub const POINT_ZOOM: f64 = 10.0;

/// Share of the viewport height reserved above and below a fitted boundary
pub const PADDING_RATIO: f64 = 0.1;

/// Latitude limit of the Web Mercator projection
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Camera action for the map
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum ViewFitPlan {
    /// Fit the box exactly, keeping `vertical_padding` pixels above and below
    FitBounds {
        bounds: BoundingBox,
        vertical_padding: f64,
    },
    /// Animated flight to the box
    FlyToBounds { bounds: BoundingBox },
    /// Animated flight to a point at a fixed zoom
    FlyToPoint {
        latitude: f64,
        longitude: f64,
        zoom: f64,
    },
}

impl ViewFitPlan {
    /// The whole-world view shown at startup and after a clear
    #[must_use]
    pub fn world() -> Self {
        ViewFitPlan::FlyToPoint {
            latitude: 20.0,
            longitude: 0.0,
            zoom: 2.0,
        }
    }

    #[must_use]
    pub fn point(latitude: f64, longitude: f64) -> Self {
        ViewFitPlan::FlyToPoint {
            latitude,
            longitude,
            zoom: POINT_ZOOM,
        }
    }
}

/// Maps geographic coordinates to container pixels under the map's current
/// zoom and pan
pub trait Projection {
    /// Container pixel `(x, y)` of the coordinate; `y` grows downwards
    fn to_container_point(&self, latitude: f64, longitude: f64) -> (f64, f64);
}

/// Spherical Web Mercator, as used by slippy-map tile layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebMercator {
    pub zoom: f64,
    pub tile_size: f64,
    /// World pixel shown at the container's top-left corner
    pub origin_x: f64,
    pub origin_y: f64,
}

impl WebMercator {
    #[must_use]
    pub fn at_zoom(zoom: f64) -> Self {
        Self {
            zoom,
            tile_size: 256.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    fn scale(&self) -> f64 {
        self.tile_size * self.zoom.exp2()
    }

    /// World pixel of a coordinate at the current zoom
    #[must_use]
    pub fn world_point(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let scale = self.scale();
        let lat = latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let sin = lat.to_radians().sin();
        let x = (longitude + 180.0) / 360.0 * scale;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale;
        (x, y)
    }
}

impl Projection for WebMercator {
    fn to_container_point(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let (x, y) = self.world_point(latitude, longitude);
        (x - self.origin_x, y - self.origin_y)
    }
}

/// Viewport state reported by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub height_px: f64,
    pub projection: WebMercator,
}

impl Viewport {
    #[must_use]
    pub fn new(height_px: f64, zoom: f64) -> Self {
        Self {
            height_px,
            projection: WebMercator::at_zoom(zoom),
        }
    }
}

/// On-screen height in pixels the box occupies under `projection`
pub fn projected_height(bounds: &BoundingBox, projection: &impl Projection) -> f64 {
    let (north, west) = bounds.north_west();
    let (south, east) = bounds.south_east();
    let (_, top) = projection.to_container_point(north, west);
    let (_, bottom) = projection.to_container_point(south, east);
    (bottom - top).abs()
}

/// Decide how to frame `boundary` in a viewport `viewport_height_px` tall.
///
/// Heights up to and including `viewport_height_px - 2 * pad` fly to the
/// bounds; anything taller is fitted with `pad` pixels of vertical padding,
/// where `pad = viewport_height_px * 0.1`.
pub fn plan(
    boundary: &BoundaryCandidate,
    viewport_height_px: f64,
    projection: &impl Projection,
) -> ViewFitPlan {
    if boundary.geometry.is_none() {
        return ViewFitPlan::point(boundary.latitude, boundary.longitude);
    }

    let bounds = boundary.frame_box();
    let pad = viewport_height_px * PADDING_RATIO;
    let height = projected_height(&bounds, projection);

    if height > viewport_height_px - 2.0 * pad {
        ViewFitPlan::FitBounds {
            bounds,
            vertical_padding: pad,
        }
    } else {
        ViewFitPlan::FlyToBounds { bounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundaryGeometry;
    use rstest::rstest;

    /// Linear test projection: `pixels_per_degree` pixels per degree of latitude
    struct Linear {
        pixels_per_degree: f64,
    }

    impl Projection for Linear {
        fn to_container_point(&self, latitude: f64, longitude: f64) -> (f64, f64) {
            (longitude * self.pixels_per_degree, -latitude * self.pixels_per_degree)
        }
    }

    fn square(south: f64, north: f64) -> BoundaryCandidate {
        BoundaryCandidate {
            id: "7".to_string(),
            display_name: "Testland".to_string(),
            latitude: (south + north) / 2.0,
            longitude: 1.0,
            bounding_box: BoundingBox::new(south, north, 0.0, 2.0),
            geometry: Some(BoundaryGeometry::Polygon(vec![vec![
                [0.0, south],
                [2.0, south],
                [2.0, north],
                [0.0, north],
                [0.0, south],
            ]])),
        }
    }

    #[test]
    fn test_no_geometry_flies_to_point() {
        let mut boundary = square(2.0, 10.0);
        boundary.geometry = None;

        let plan = plan(&boundary, 1000.0, &Linear { pixels_per_degree: 100.0 });
        assert_eq!(
            plan,
            ViewFitPlan::FlyToPoint {
                latitude: 6.0,
                longitude: 1.0,
                zoom: 10.0
            }
        );
    }

    // viewport 1000 px, pad 100 px: anything over 800 px is fitted
    #[rstest]
    #[case::exactly_at_threshold(2.0, 10.0, false)]
    #[case::just_below_threshold(2.0, 9.99, false)]
    #[case::just_above_threshold(2.0, 10.01, true)]
    #[case::far_above_threshold(-40.0, 40.0, true)]
    fn test_threshold(#[case] south: f64, #[case] north: f64, #[case] fits: bool) {
        let boundary = square(south, north);
        let result = plan(&boundary, 1000.0, &Linear { pixels_per_degree: 100.0 });

        let expected_bounds = BoundingBox::new(south, north, 0.0, 2.0);
        if fits {
            assert_eq!(
                result,
                ViewFitPlan::FitBounds {
                    bounds: expected_bounds,
                    vertical_padding: 100.0
                }
            );
        } else {
            assert_eq!(
                result,
                ViewFitPlan::FlyToBounds {
                    bounds: expected_bounds
                }
            );
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        let boundary = square(45.0, 55.0);
        let projection = WebMercator::at_zoom(5.0);
        let first = plan(&boundary, 900.0, &projection);
        for _ in 0..10 {
            assert_eq!(plan(&boundary, 900.0, &projection), first);
        }
    }

    #[test]
    fn test_web_mercator_equator_and_center() {
        let projection = WebMercator::at_zoom(0.0);
        let (x, y) = projection.world_point(0.0, 0.0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_does_not_change_projected_height() {
        let bounds = BoundingBox::new(47.0, 55.0, 6.0, 15.0);
        let still = WebMercator::at_zoom(6.0);
        let panned = WebMercator {
            origin_x: 4000.0,
            origin_y: 2500.0,
            ..still
        };
        let a = projected_height(&bounds, &still);
        let b = projected_height(&bounds, &panned);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_zooming_in_switches_to_fit_bounds() {
        // a country-sized outline flies at world zoom but must be fitted up close
        let boundary = square(47.0, 55.0);
        assert!(matches!(
            plan(&boundary, 800.0, &WebMercator::at_zoom(2.0)),
            ViewFitPlan::FlyToBounds { .. }
        ));
        assert!(matches!(
            plan(&boundary, 800.0, &WebMercator::at_zoom(8.0)),
            ViewFitPlan::FitBounds { .. }
        ));
    }
}
