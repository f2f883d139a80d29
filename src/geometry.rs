//! Geometry primitives: point-in-polygon, shoelace area, and distance.
//!
//! Rings are ordered vertex sequences whose first and last points
//! coincide. The containment and area functions tolerate open rings by
//! closing them implicitly, but callers that require the closed-ring
//! invariant should check [`ring_is_closed`] first.

use glam::DVec2;

/// Number of distinct points in a vertex list (exact equality).
pub fn distinct_vertices(points: &[DVec2]) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|&(i, p)| !points[..i].contains(p))
        .count()
}

/// A valid shape ring: at least 3 unique vertices plus the repeated
/// closing point. Repeated interior vertices do not count toward the
/// minimum, so a back-and-forth line can never pass as a ring.
pub fn ring_is_closed(ring: &[DVec2]) -> bool {
    ring.len() >= 4
        && ring.first() == ring.last()
        && distinct_vertices(&ring[..ring.len() - 1]) >= 3
}

/// Crossing-number point-in-polygon test.
///
/// Casts a ray toward +x and toggles the inside flag at every edge whose
/// y-span straddles `p.y` and whose x-intersection at that height lies
/// right of `p`. Behavior is undefined for rings with fewer than 3
/// unique vertices.
pub fn point_in_ring(p: DVec2, ring: &[DVec2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_at_y = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_at_y {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shoelace polygon area: `|Σ(x_i·y_{i+1} − x_{i+1}·y_i)| / 2`.
///
/// Orientation-independent thanks to the absolute value. Degenerate
/// rings (fewer than 3 vertices) have zero area.
pub fn ring_area(ring: &[DVec2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}
