//! Route statistics derived from recorded points

use serde::Serialize;

use super::activity::average_speed_kmh;
use super::point::Point;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Aggregate figures for a recorded track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackSummary {
    pub point_count: usize,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub average_speed_kmh: f64,
}

/// Great-circle distance in meters between two coordinates
pub fn haversine_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Summarize points in recording order, whatever order they arrive in
pub fn summarize(points: &[Point]) -> TrackSummary {
    let mut ordered: Vec<&Point> = points.iter().collect();
    ordered.sort_by_key(|p| p.recorded_at);

    let distance_meters = ordered
        .windows(2)
        .map(|pair| {
            haversine_distance(
                (pair[0].latitude, pair[0].longitude),
                (pair[1].latitude, pair[1].longitude),
            )
        })
        .sum::<f64>();

    let duration_seconds = match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) => {
            (last.recorded_at - first.recorded_at).num_milliseconds() as f64 / 1000.0
        }
        _ => 0.0,
    };

    TrackSummary {
        point_count: ordered.len(),
        distance_meters,
        duration_seconds,
        average_speed_kmh: average_speed_kmh(distance_meters, duration_seconds),
    }
}
