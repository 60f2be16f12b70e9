//! Neighborhood disposal points and the mini-map projection.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// What a disposal point accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum PointKind {
    Recyclable,
    Bulky,
    Clothing,
    General,
}

impl PointKind {
    pub const fn label(self) -> &'static str {
        match self {
            PointKind::Recyclable => "Recyclables",
            PointKind::Bulky => "Bulky waste",
            PointKind::Clothing => "Clothing",
            PointKind::General => "General waste",
        }
    }

    /// Marker color on the map and in the legend.
    pub const fn hex(self) -> &'static str {
        match self {
            PointKind::Recyclable => "#4CAF50",
            PointKind::Bulky => "#9C27B0",
            PointKind::Clothing => "#FF9800",
            PointKind::General => "#FF5722",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One fixed point of interest near the mock location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisposalPoint {
    pub name: &'static str,
    pub kind: PointKind,
    pub coords: Coordinates,
    pub items: &'static [&'static str],
    pub phone: &'static str,
}

const DISPOSAL_POINTS: [DisposalPoint; 4] = [
    DisposalPoint {
        name: "Yeoksam-dong recycling station",
        kind: PointKind::Recyclable,
        coords: Coordinates {
            lat: 37.5006,
            lon: 127.0366,
        },
        items: &["Plastics", "Cans", "Bottles"],
        phone: "02-1234-5678",
    },
    DisposalPoint {
        name: "Gangnam-gu bulky waste center",
        kind: PointKind::Bulky,
        coords: Coordinates {
            lat: 37.4979,
            lon: 127.0276,
        },
        items: &["Furniture", "Appliances", "Mattresses"],
        phone: "02-2345-6789",
    },
    DisposalPoint {
        name: "Yeoksam-dong clothing bin",
        kind: PointKind::Clothing,
        coords: Coordinates {
            lat: 37.5026,
            lon: 127.0386,
        },
        items: &["Clothing", "Shoes", "Bags"],
        phone: "02-3456-7890",
    },
    DisposalPoint {
        name: "Yeoksam-dong general waste site",
        kind: PointKind::General,
        coords: Coordinates {
            lat: 37.4996,
            lon: 127.0356,
        },
        items: &["General waste", "Food waste"],
        phone: "02-4567-8901",
    },
];

/// The fixed set of nearby disposal points.
pub fn disposal_points() -> &'static [DisposalPoint] {
    &DISPOSAL_POINTS
}

/// Bounding box used to place markers on the mini-map panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl MapBounds {
    /// Bounds enclosing all given coordinates, padded so markers stay off
    /// the panel edge.
    pub fn around<'a>(coords: impl IntoIterator<Item = &'a Coordinates>) -> Self {
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;

        for c in coords {
            min_lat = min_lat.min(c.lat);
            max_lat = max_lat.max(c.lat);
            min_lon = min_lon.min(c.lon);
            max_lon = max_lon.max(c.lon);
        }

        let lat_pad = ((max_lat - min_lat) * 0.15).max(1e-4);
        let lon_pad = ((max_lon - min_lon) * 0.15).max(1e-4);

        Self {
            min_lat: min_lat - lat_pad,
            max_lat: max_lat + lat_pad,
            min_lon: min_lon - lon_pad,
            max_lon: max_lon + lon_pad,
        }
    }

    /// Projects a coordinate into normalized panel space, x rightward and
    /// y downward with north at the top, both clamped to 0..=1.
    pub fn project(&self, c: Coordinates) -> (f32, f32) {
        let x = (c.lon - self.min_lon) / (self.max_lon - self.min_lon);
        let y = 1.0 - (c.lat - self.min_lat) / (self.max_lat - self.min_lat);
        (x.clamp(0.0, 1.0) as f32, y.clamp(0.0, 1.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_fixed_points_with_items_and_phones() {
        let points = disposal_points();
        assert_eq!(points.len(), 4);
        for p in points {
            assert!(!p.items.is_empty());
            assert!(!p.phone.is_empty());
        }
    }

    #[test]
    fn projection_keeps_markers_inside_the_panel() {
        let bounds = MapBounds::around(disposal_points().iter().map(|p| &p.coords));

        for p in disposal_points() {
            let (x, y) = bounds.project(p.coords);
            assert!((0.0..=1.0).contains(&x), "x out of range: {x}");
            assert!((0.0..=1.0).contains(&y), "y out of range: {y}");
            // Padding keeps markers off the exact edge.
            assert!(x > 0.0 && x < 1.0);
            assert!(y > 0.0 && y < 1.0);
        }
    }

    #[test]
    fn projection_points_north_up() {
        let bounds = MapBounds {
            min_lat: 0.0,
            max_lat: 1.0,
            min_lon: 0.0,
            max_lon: 1.0,
        };

        // Northern-most coordinate lands at the top of the panel.
        let (_, y_north) = bounds.project(Coordinates { lat: 1.0, lon: 0.5 });
        let (_, y_south) = bounds.project(Coordinates { lat: 0.0, lon: 0.5 });
        assert!(y_north < y_south);
        assert_eq!(y_north, 0.0);
        assert_eq!(y_south, 1.0);

        // Out-of-bounds input clamps instead of escaping the panel.
        let (x, _) = bounds.project(Coordinates { lat: 0.5, lon: 2.0 });
        assert_eq!(x, 1.0);
    }
}
