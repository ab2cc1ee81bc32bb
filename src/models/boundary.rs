//! Administrative boundary candidates returned by forward geocoding

use serde::{Deserialize, Serialize};

/// Lat/lon box in the provider's `[south, north, west, east]` order
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// North-west corner as `(lat, lon)`
    #[must_use]
    pub fn north_west(&self) -> (f64, f64) {
        (self.north, self.west)
    }

    /// South-east corner as `(lat, lon)`
    #[must_use]
    pub fn south_east(&self) -> (f64, f64) {
        (self.south, self.east)
    }

    /// The four edges in `[south, north, west, east]` order
    #[must_use]
    pub fn as_array(&self) -> [f64; 4] {
        [self.south, self.north, self.west, self.east]
    }

    fn extend(&mut self, lat: f64, lon: f64) {
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
        self.west = self.west.min(lon);
        self.east = self.east.max(lon);
    }
}

/// Boundary outline in GeoJSON layout; positions are `[lon, lat]`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum BoundaryGeometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl BoundaryGeometry {
    /// Parse a GeoJSON geometry object, keeping only polygonal shapes.
    ///
    /// Nominatim returns a `Point` for boundaries without an outline; those
    /// (and anything else that is not a polygon) yield `None`.
    #[must_use]
    pub fn from_geojson(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    fn positions(&self) -> Box<dyn Iterator<Item = &[f64; 2]> + '_> {
        match self {
            BoundaryGeometry::Polygon(rings) => Box::new(rings.iter().flatten()),
            BoundaryGeometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten())
            }
        }
    }

    /// Lat/lon extent of every ring, or `None` for an empty outline
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut positions = self.positions();
        let [lon, lat] = *positions.next()?;
        let mut bounds = BoundingBox::new(lat, lat, lon, lon);
        for [lon, lat] in positions {
            bounds.extend(*lat, *lon);
        }
        Some(bounds)
    }
}

/// One administrative-boundary search result
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BoundaryCandidate {
    /// Provider identifier (Nominatim `place_id`)
    pub id: String,
    /// Full display name, e.g. "Bavaria, Germany"
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bounding_box: BoundingBox,
    pub geometry: Option<BoundaryGeometry>,
}

impl BoundaryCandidate {
    /// Leading segment of the display name ("Bavaria" for "Bavaria, Germany")
    #[must_use]
    pub fn place_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .map_or(self.display_name.as_str(), str::trim)
    }

    /// Box the map should frame: the outline's own extent when there is one,
    /// the provider's bounding box otherwise
    #[must_use]
    pub fn frame_box(&self) -> BoundingBox {
        self.geometry
            .as_ref()
            .and_then(BoundaryGeometry::bounds)
            .unwrap_or(self.bounding_box)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
