// UTM central scale factor
pub(crate) const UTM_K0: f64 = 9996.0 / 10_000.;
// UPS central scale factor
pub(crate) const UPS_K0: f64 = 994.0 / 1000.;

/// False easting of every UTM zone
pub(crate) const UTM_FALSE_EASTING: f64 = 500_000.;
/// False northing added to southern-hemisphere UTM northings
pub const NORTHING_OFFSET: f64 = 10_000_000.;
/// UPS false origin, applied to both easting and northing
pub(crate) const UPS_FALSE_ORIGIN: f64 = 2_000_000.;

/// Side of a 100km grid square
pub(crate) const BLOCK_SIZE: i64 = 100_000;
/// Column letters repeat after this many grid squares
pub(crate) const GRID_COL_PERIOD: i64 = 8;
/// Row letters repeat after this many grid squares
pub(crate) const GRID_ROW_PERIOD: i64 = 20;

// Largest easting/northing accepted for a UTM or UPS coordinate
pub(crate) const MAX_EASTING: f64 = 3_200_000.;
pub(crate) const MAX_NORTHING: f64 = 10_000_000.;

// Latitude limits of the UTM grid
pub(crate) const UTM_MIN_LAT: f64 = -80.;
pub(crate) const UTM_MAX_LAT: f64 = 84.;
// UTM and UPS each extend half a degree into the other's area
pub(crate) const SEAM_OVERLAP: f64 = 0.5;

/// Earth radius used for bounding-box span estimates
pub(crate) const SPAN_EARTH_RADIUS_M: f64 = 6_371_000.;
