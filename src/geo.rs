//! Geometry helpers over fixed-point coordinates.

use crate::models::{Point, Rectangle};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Check whether `point` lies inside `rect`, boundaries included.
///
/// The rectangle corners may be given in any order.
pub fn contains_point(rect: &Rectangle, point: &Point) -> bool {
    let bounds = rect.normalized();
    let (left, right) = (bounds.lo.longitude, bounds.hi.longitude);
    let (bottom, top) = (bounds.lo.latitude, bounds.hi.latitude);

    (left..=right).contains(&point.longitude) && (bottom..=top).contains(&point.latitude)
}

/// Great-circle distance between two points in whole meters.
///
/// Uses the haversine formula; the result is truncated, not rounded.
pub fn distance_meters(p1: &Point, p2: &Point) -> u32 {
    let lat1 = p1.latitude_degrees().to_radians();
    let lat2 = p2.latitude_degrees().to_radians();
    let lng1 = p1.longitude_degrees().to_radians();
    let lng2 = p2.longitude_degrees().to_radians();

    let half_dlat = ((lat2 - lat1) / 2.0).sin();
    let half_dlng = ((lng2 - lng1) / 2.0).sin();

    let a = half_dlat * half_dlat + lat1.cos() * lat2.cos() * half_dlng * half_dlng;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_METERS * c) as u32
}
