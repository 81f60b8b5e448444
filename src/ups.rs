use std::{fmt::Display, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Error, ParseCoord, ThisOrThat,
    constants::UPS_FALSE_ORIGIN,
    latlon::LatLon,
    precision::CoordinatePrecision,
    translator::Translator,
    utility::GeoMath,
    utm::{self, Hemisphere, zonespec},
    utmups,
};

/// Bands of the two polar caps: A and B in the south, Y and Z in the north.
pub(crate) const UPS_BANDS: &str = "ABYZ";

/// A Universal Polar Stereographic coordinate.
///
/// Easting and northing include the 2,000,000m false origin. The band tells
/// both the pole and which side of the 0°/180° meridian line the point is on.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpsCoordinate {
    latitude_band: char,
    easting: f64,
    northing: f64,
    precision: CoordinatePrecision,
}

impl UpsCoordinate {
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the band is not A, B, Y or Z and
    /// [`Error::InvalidCoord`] when easting or northing are out of range.
    ///
    /// ```
    /// use usngconv::{Hemisphere, UpsCoordinate};
    ///
    /// let coord = UpsCoordinate::create('b', 2_029_070.0, 2_554_696.0).unwrap();
    /// assert_eq!(coord.hemisphere(), Hemisphere::South);
    /// assert_eq!(coord.to_string(), "B 2029070mE 2554696mN");
    ///
    /// let latlon = coord.to_latlon();
    /// assert!((latlon.latitude() + 85.0).abs() < 1e-4);
    /// assert!((latlon.longitude() - 3.0).abs() < 1e-4);
    ///
    /// assert!(UpsCoordinate::create('C', 2_000_000.0, 2_000_000.0).is_err());
    /// ```
    pub fn create(latitude_band: char, easting: f64, northing: f64) -> Result<UpsCoordinate, Error> {
        let latitude_band = latitude_band.to_ascii_uppercase();
        if !UPS_BANDS.contains(latitude_band) {
            return Err(Error::InvalidFormat(format!("{latitude_band} is not a UPS latitude band.")));
        }

        utm::check_easting_northing(easting, northing)?;

        Ok(UpsCoordinate::new(
            latitude_band,
            easting,
            northing,
            CoordinatePrecision::for_meters(easting, northing),
        ))
    }

    pub(crate) fn new(latitude_band: char, easting: f64, northing: f64, precision: CoordinatePrecision) -> UpsCoordinate {
        Self {
            latitude_band,
            easting,
            northing,
            precision,
        }
    }

    /// Band for a point on the given cap: the eastern half (easting at or past
    /// the false origin) is B or Z.
    pub(crate) fn band_for(hemisphere: Hemisphere, easting: f64) -> char {
        let east = easting >= UPS_FALSE_ORIGIN;
        match hemisphere {
            Hemisphere::North => east.ternary('Z', 'Y'),
            Hemisphere::South => east.ternary('B', 'A'),
        }
    }

    pub fn latitude_band(&self) -> char {
        self.latitude_band
    }

    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from_ups_band(self.latitude_band)
    }

    pub fn is_north(&self) -> bool {
        self.hemisphere().is_north()
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn precision(&self) -> CoordinatePrecision {
        self.precision
    }

    pub fn parse_str(value: &str) -> Result<UpsCoordinate, Error> {
        UpsCoordinate::parse_coord(value)
    }

    /// Converts to lat/lon on the NAD83 ellipsoid.
    pub fn to_latlon(&self) -> LatLon {
        Translator::default().ups_to_latlon(self)
    }
}

impl PartialEq for UpsCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude_band == other.latitude_band
            && self.easting.eps_eq(other.easting)
            && self.northing.eps_eq(other.northing)
    }
}

impl ParseCoord for UpsCoordinate {
    /// Parses `"{band} {easting}[mE] {northing}[mN]"`. A zone, if written,
    /// must be 0.
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let fields = utmups::parse_fields(value)?;
        if fields.zone.is_some_and(|zone| zone != zonespec::UPS) {
            return Err(Error::InvalidFormat(format!("{value:?} has a UTM zone")));
        }
        let Some(band) = fields.latitude_band else {
            return Err(Error::InvalidFormat(format!("{value:?} has no UPS latitude band")));
        };

        let coord = UpsCoordinate::create(band, fields.easting, fields.northing)?;
        utm::resolve_hemisphere(Some(coord.hemisphere()), fields.hemisphere)?;

        Ok(coord)
    }
}

impl FromStr for UpsCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpsCoordinate::parse_coord(s)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Display for UpsCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}mE {}mN",
            self.latitude_band,
            self.precision.format_meters(self.easting.trunc() as i64),
            self.precision.format_meters(self.northing.trunc() as i64),
        )
    }
}
