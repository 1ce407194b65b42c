//! Spherical geodesy helpers.
//!
//! Distances use the haversine formula on a sphere with the same mean radius
//! the map library uses for its Earth CRS, so measurements match what the
//! map would report for the same pair of points.

use crate::model::LatLng;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
pub fn haversine_distance(a: LatLng, b: LatLng, radius_m: f64) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    radius_m * c
}

/// Arithmetic midpoint in degrees, used to anchor segment labels.
///
/// Good enough for label placement on short segments; not a geodesic midpoint.
pub fn midpoint(a: LatLng, b: LatLng) -> LatLng {
    LatLng::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}

/// Format a distance in meters with a fixed number of decimals.
pub fn format_distance(meters: f64, decimals: usize) -> String {
    format!("{meters:.decimals$} m")
}

/// Axis-aligned lat/lng bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Degenerate bounds around a single point.
    pub fn of_point(p: LatLng) -> Self {
        Self {
            south_west: p,
            north_east: p,
        }
    }

    /// Bounds enclosing every point, or `None` when `points` is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::of_point(first), |b, p| b.extend(*p)))
    }

    /// Bounds of a circle, expanding the center by the radius along both axes.
    pub fn of_circle(center: LatLng, radius_m: f64, earth_radius_m: f64) -> Self {
        let dlat = (radius_m / earth_radius_m).to_degrees();
        let cos_lat = center.lat.to_radians().cos();
        let dlng = if cos_lat.abs() < f64::EPSILON {
            180.0
        } else {
            dlat / cos_lat
        };
        Self {
            south_west: LatLng::new(center.lat - dlat, center.lng - dlng),
            north_east: LatLng::new(center.lat + dlat, center.lng + dlng),
        }
    }

    #[must_use]
    pub fn extend(self, p: LatLng) -> Self {
        Self {
            south_west: LatLng::new(self.south_west.lat.min(p.lat), self.south_west.lng.min(p.lng)),
            north_east: LatLng::new(self.north_east.lat.max(p.lat), self.north_east.lng.max(p.lng)),
        }
    }

    pub fn center(&self) -> LatLng {
        midpoint(self.south_west, self.north_east)
    }
}
