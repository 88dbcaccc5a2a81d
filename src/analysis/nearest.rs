/// Nearest-post selection.
///
/// All posts sit within one city, so planar Euclidean distance over
/// lat/lng is accurate enough — at that scale the error against geodesic
/// distance is negligible and not worth the extra math.

use crate::model::PostSummary;

/// Returns the post closest to `(lat, lon)`, or `None` for an empty list.
///
/// Ties resolve to the earliest list entry (stable minimum). The result
/// is always a member of the input slice, never a synthesized value.
pub fn find_nearest(posts: &[PostSummary], lat: f64, lon: f64) -> Option<&PostSummary> {
    posts.iter().min_by(|a, b| {
        let da = distance(lat, lon, a.lat, a.lng);
        let db = distance(lat, lon, b.lat, b.lng);
        // Coordinates come from upstream JSON numbers; NaN would only
        // appear on corrupt data, in which case ordering it last keeps
        // the selection deterministic.
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Greater)
    })
}

fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    ((lat1 - lat2).powi(2) + (lon1 - lon2).powi(2)).sqrt()
}
