//! Message types exchanged by the route guide RPCs.
//!
//! Coordinates are fixed-point integers in units of 1e-7 degrees. No range
//! validation is performed; any pair of 32-bit integers is a valid point.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scale between fixed-point coordinates and degrees.
pub const COORD_FACTOR: f64 = 1e7;

/// A latitude/longitude pair in 1e-7 degree units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub latitude: i32,
    #[serde(default)]
    pub longitude: i32,
}

impl Point {
    pub const fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in degrees.
    pub fn latitude_degrees(&self) -> f64 {
        f64::from(self.latitude) / COORD_FACTOR
    }

    /// Longitude in degrees.
    pub fn longitude_degrees(&self) -> f64 {
        f64::from(self.longitude) / COORD_FACTOR
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.7}, {:.7})",
            self.latitude_degrees(),
            self.longitude_degrees()
        )
    }
}

/// An axis-aligned region given by two opposite corners in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(default)]
    pub lo: Point,
    #[serde(default)]
    pub hi: Point,
}

impl Rectangle {
    pub const fn new(lo: Point, hi: Point) -> Self {
        Self { lo, hi }
    }

    /// Rectangle spanning every representable coordinate.
    pub const fn everywhere() -> Self {
        Self {
            lo: Point::new(i32::MIN, i32::MIN),
            hi: Point::new(i32::MAX, i32::MAX),
        }
    }

    /// Reorder the corners so `lo` holds the per-axis minimum and `hi` the maximum.
    pub fn normalized(&self) -> Self {
        Self {
            lo: Point::new(
                self.lo.latitude.min(self.hi.latitude),
                self.lo.longitude.min(self.hi.longitude),
            ),
            hi: Point::new(
                self.lo.latitude.max(self.hi.latitude),
                self.lo.longitude.max(self.hi.longitude),
            ),
        }
    }
}

/// A named location. An empty name means nothing is known at that point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Point,
}

impl Feature {
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// Placeholder returned when no feature exists at `location`.
    pub fn unnamed(location: Point) -> Self {
        Self {
            name: String::new(),
            location,
        }
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A message left at a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNote {
    #[serde(default)]
    pub location: Point,
    #[serde(default)]
    pub message: String,
}

impl RouteNote {
    pub fn new(location: Point, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// Statistics about a recorded route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub point_count: u32,
    pub feature_count: u32,
    pub distance_meters: u64,
    pub elapsed_seconds: u64,
}

impl RouteSummary {
    /// Count one received point with `features_here` features at it and a
    /// leg of `leg_meters` from the previous point. Totals saturate.
    pub fn add_point(&mut self, features_here: usize, leg_meters: u32) {
        let features_here = u32::try_from(features_here).unwrap_or(u32::MAX);
        self.point_count = self.point_count.saturating_add(1);
        self.feature_count = self.feature_count.saturating_add(features_here);
        self.distance_meters = self.distance_meters.saturating_add(u64::from(leg_meters));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_is_order_independent() {
        let a = Point::new(10, -20);
        let b = Point::new(-5, 30);

        let forward = Rectangle::new(a, b).normalized();
        let backward = Rectangle::new(b, a).normalized();

        assert_eq!(forward, backward);
        assert_eq!(forward.lo, Point::new(-5, -20));
        assert_eq!(forward.hi, Point::new(10, 30));
    }

    #[test]
    fn test_normalized_is_idempotent() {
        let rect = Rectangle::new(Point::new(7, 7), Point::new(-7, -7));
        assert_eq!(rect.normalized(), rect.normalized().normalized());
    }

    #[test]
    fn test_route_summary_add_point() {
        let mut summary = RouteSummary::default();
        summary.add_point(2, 0);
        summary.add_point(0, 150);

        assert_eq!(summary.point_count, 2);
        assert_eq!(summary.feature_count, 2);
        assert_eq!(summary.distance_meters, 150);
    }

    #[test]
    fn test_route_summary_saturates() {
        let mut summary = RouteSummary {
            point_count: u32::MAX,
            feature_count: u32::MAX - 1,
            distance_meters: u64::MAX - 10,
            elapsed_seconds: 0,
        };
        summary.add_point(usize::MAX, u32::MAX);

        assert_eq!(summary.point_count, u32::MAX);
        assert_eq!(summary.feature_count, u32::MAX);
        assert_eq!(summary.distance_meters, u64::MAX);
    }

    #[test]
    fn test_feature_json_accepts_missing_name() {
        let feature: Feature =
            serde_json::from_str(r#"{"location": {"latitude": 1, "longitude": 2}}"#).unwrap();
        assert_eq!(feature, Feature::unnamed(Point::new(1, 2)));
        assert!(!feature.is_named());
    }

    #[test]
    fn test_point_display_in_degrees() {
        let point = Point::new(409146138, -746188906);
        assert_eq!(point.to_string(), "(40.9146138, -74.6188906)");
    }
}
