use std::{fmt::Display, str::FromStr};

use crate::{
    Error, ParseCoord,
    precision::CoordinatePrecision,
    translator::Translator,
    usng::UsngCoordinate,
    utility::GeoMath,
    utm::UtmCoordinate,
    utmups::UtmUps,
};

/// Mean radius of Earth in meters
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;

/// A geodetic latitude/longitude point in decimal degrees. Can be converted
/// to/from [`UtmCoordinate`], [`UtmUps`] and [`UsngCoordinate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
}

impl LatLon {
    /// Internal-only constructor that doesn't check the bounds of lat/lon
    pub(crate) fn new(lat: f64, lon: f64) -> LatLon {
        Self {
            latitude: lat,
            longitude: lon,
        }
    }

    /// Tries to create a latitude/longitude point from a lat/lon pair. First checks if the
    /// values are valid:
    /// * Latitude must be in range [-90,90]
    /// * Longitude must be in range [-180,360]
    ///
    /// Longitudes of 180 and above are wrapped into [-180, 180).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if either latitude or longitude are invalid.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// assert_eq!(coord.latitude(), 40.748333);
    /// assert_eq!(coord.longitude(), -73.985278);
    ///
    /// let wrapped = LatLon::create(10.0, 270.0).unwrap();
    /// assert_eq!(wrapped.longitude(), -90.0);
    ///
    /// assert!(LatLon::create(100.0, 0.0).is_err());
    /// assert!(LatLon::create(0.0, -200.0).is_err());
    /// ```
    pub fn create(lat: f64, lon: f64) -> Result<LatLon, Error> {
        if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")))
        } else if !(-180_f64..=360_f64).contains(&lon) {
            Err(Error::InvalidCoord(format!("Longitude {lon} outside of valid range [-180, 360].")))
        } else {
            Ok(LatLon::new(lat, lon.wrap_longitude()))
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns whether the current point is in the northern hemisphere.
    ///
    /// ```
    /// use usngconv::LatLon;
    ///
    /// assert!(LatLon::create(40.748333, -73.985278).unwrap().is_north());
    /// assert!(!LatLon::create(-40.748333, -73.985278).unwrap().is_north());
    /// ```
    pub fn is_north(&self) -> bool {
        self.latitude.is_sign_positive()
    }

    /// Returns the distance in meters between two [`LatLon`] points
    /// using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
    /// Uses the [mean radius of the Earth](https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius)
    /// in the calculation: `6371.0088`
    pub fn haversine(&self, other: &LatLon) -> f64 {
        let lat1_r = self.latitude.to_radians();
        let lat2_r = other.latitude.to_radians();

        2.0 * EARTH_MEAN_RADIUS_M * (
            ((other.latitude - self.latitude).to_radians() / 2.0).sin().powi(2) +
            lat1_r.cos() * lat2_r.cos() *
            ((other.longitude - self.longitude).to_radians() / 2.0).sin().powi(2)
        ).sqrt().asin()
    }

    pub fn parse_str(value: &str) -> Result<LatLon, Error> {
        LatLon::parse_coord(value)
    }

    /// Converts to UTM on the NAD83 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] outside the UTM latitudes `[-80, 84]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let utm = coord.to_utm().unwrap();
    ///
    /// assert_eq!(utm.zone(), 18);
    /// assert_eq!(utm.latitude_band(), Some('T'));
    /// assert!((utm.easting() - 585_664.121).abs() < 1e-3);
    /// assert!((utm.northing() - 4_511_315.422).abs() < 1e-3);
    /// ```
    pub fn to_utm(&self) -> Result<UtmCoordinate, Error> {
        Translator::default().to_utm(self)
    }

    /// Converts to UTM, or to UPS beyond the UTM latitudes, on the NAD83
    /// ellipsoid.
    ///
    /// ```
    /// use usngconv::LatLon;
    ///
    /// let polar = LatLon::create(-85.0, 3.0).unwrap().to_utm_ups().unwrap();
    /// assert_eq!(polar.zone(), 0);
    /// assert_eq!(polar.latitude_band(), Some('B'));
    /// ```
    pub fn to_utm_ups(&self) -> Result<UtmUps, Error> {
        Translator::default().to_utm_ups(self)
    }

    /// Converts to a USNG reference at `precision` on the NAD83 ellipsoid.
    ///
    /// ```
    /// use usngconv::{CoordinatePrecision, LatLon};
    ///
    /// let origin = LatLon::create(0.0, 0.0).unwrap();
    /// let usng = origin.to_usng(CoordinatePrecision::OneHundredKilometers).unwrap();
    /// assert_eq!(usng.to_string(), "31N AA");
    /// ```
    pub fn to_usng(&self, precision: CoordinatePrecision) -> Result<UsngCoordinate, Error> {
        Translator::default().to_usng(self, precision)
    }
}

impl ParseCoord for LatLon {
    /// Parses `"{lat}, {lon}"` or `"{lat} {lon}"` in decimal degrees.
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let mut parts = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty());

        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            log::debug!("rejected lat/lon string {value:?}");
            return Err(Error::InvalidFormat(format!("{value:?} is not a \"lat, lon\" pair")));
        };

        let number = |text: &str| {
            text.parse::<f64>()
                .map_err(|e| Error::InvalidFormat(format!("{text:?} is not a number: {e}")))
        };

        LatLon::create(number(lat)?, number(lon)?)
    }
}

impl FromStr for LatLon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LatLon::parse_coord(s)
    }
}

impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(
            f,
            "{lat} {lon}",
        )
    }
}
