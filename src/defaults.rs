//! Fixed engine constants (all in canvas pixels)

/// Side length of a grid cell. One lattice is shared by classification
/// sampling, region segmentation, and hover lookup.
pub const CELL_SIZE_PX: f64 = 10.0;

/// Radius around a polygon's first vertex within which a committed point
/// closes the ring instead of extending it.
pub const SNAP_RADIUS_PX: f64 = 10.0;
