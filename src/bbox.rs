use std::fmt::Display;

use crate::{
    Error,
    constants::SPAN_EARTH_RADIUS_M,
    latlon::LatLon,
    precision::CoordinatePrecision,
    utility::GeoMath,
};

/// Where a box midpoint sitting on a pole or on ±180° is moved to.
const MAX_MID_LAT: f64 = 89.9;
const MAX_MID_LON: f64 = 179.9;

/// A latitude/longitude box in degrees.
///
/// `east < west` describes a box that crosses the antimeridian.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    pub(crate) fn new_unchecked(north: f64, south: f64, east: f64, west: f64) -> BoundingBox {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Tries to create a bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if a latitude is outside `[-90, 90]`, a
    /// longitude is outside `[-180, 180]`, or `north < south`.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(37.0, 31.0, -108.0, -114.0).unwrap();
    /// assert_eq!(bbox.to_string(), "37.0 31.0 -108.0 -114.0");
    ///
    /// // Crosses the antimeridian
    /// assert!(BoundingBox::new(28.0, 28.0, -179.9, 179.9).is_ok());
    ///
    /// assert!(BoundingBox::new(30.0, 31.0, -108.0, -114.0).is_err());
    /// assert!(BoundingBox::new(91.0, 31.0, -108.0, -114.0).is_err());
    /// ```
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<BoundingBox, Error> {
        for lat in [north, south] {
            if !(-90_f64..=90_f64).contains(&lat) {
                return Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")));
            }
        }
        for lon in [east, west] {
            if !(-180_f64..=180_f64).contains(&lon) {
                return Err(Error::InvalidCoord(format!("Longitude {lon} outside of valid range [-180, 180].")));
            }
        }
        if north < south {
            return Err(Error::InvalidCoord(format!("North edge {north} is south of south edge {south}.")));
        }

        Ok(BoundingBox::new_unchecked(north, south, east, west))
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Whether `point` falls inside the box, edges included.
    pub fn contains(&self, point: &LatLon) -> bool {
        let lon = point.longitude();
        let in_lon = if self.east < self.west {
            lon >= self.west || lon <= self.east
        } else {
            (self.west..=self.east).contains(&lon)
        };

        in_lon && (self.south..=self.north).contains(&point.latitude())
    }

    /// Centre of the box. A centre exactly on a pole or on ±180° is pulled in
    /// to ±89.9 or ±179.9; anything inside those is left alone.
    ///
    /// A box whose edges both lie beyond ±90° longitude but whose average is
    /// exactly 0 straddles the antimeridian, and is centred on 180.
    pub(crate) fn midpoint(&self) -> LatLon {
        let lat = pull_in((self.north + self.south) / 2., 90., MAX_MID_LAT);
        let mut lon = pull_in((self.east + self.west) / 2., 180., MAX_MID_LON);

        let far_side = |l: f64| !(-90_f64..=90_f64).contains(&l);
        if lon.is_zero() && far_side(self.east) && far_side(self.west) {
            lon = 180.;
        }

        LatLon::new(lat, lon)
    }

    /// Larger of the north-south and east-west great-circle extents, in meters.
    pub(crate) fn span_meters(&self) -> f64 {
        let phi1 = self.north.to_radians();
        let phi2 = self.south.to_radians();
        let dphi = (self.south - self.north).to_radians();
        let dlambda = (self.west - self.east).to_radians();

        let central_angle = |h: f64| 2. * h.sqrt().atan2((1. - h).sqrt());

        let height = SPAN_EARTH_RADIUS_M * central_angle((dphi / 2.).sin().powi(2));
        let width = SPAN_EARTH_RADIUS_M * central_angle(phi1.cos() * phi2.cos() * (dlambda / 2.).sin().powi(2));

        height.max(width)
    }

    /// Finest precision whose cells are still at least as large as the box.
    pub(crate) fn precision(&self) -> CoordinatePrecision {
        precision_for_span(self.span_meters())
    }
}

/// Moves `value` to `±inner` when it reaches `±edge`.
fn pull_in(value: f64, edge: f64, inner: f64) -> f64 {
    if value >= edge {
        inner
    } else if value <= -edge {
        -inner
    } else {
        value
    }
}

/// Precision whose cell size covers a span of `meters`.
pub(crate) fn precision_for_span(meters: f64) -> CoordinatePrecision {
    match meters {
        m if m > 100_000. => CoordinatePrecision::SixByEightDegrees,
        m if m > 10_000. => CoordinatePrecision::OneHundredKilometers,
        m if m > 1_000. => CoordinatePrecision::TenKilometers,
        m if m > 100. => CoordinatePrecision::OneKilometer,
        m if m > 10. => CoordinatePrecision::OneHundredMeters,
        m if m > 1. => CoordinatePrecision::TenMeters,
        _ => CoordinatePrecision::OneMeter,
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        write!(f, "{}", buf.format(self.north))?;
        for edge in [self.south, self.east, self.west] {
            write!(f, " {}", buf.format(edge))?;
        }
        Ok(())
    }
}
