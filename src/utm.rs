use std::{fmt::Display, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Error, ParseCoord, ThisOrThat,
    constants::{MAX_EASTING, MAX_NORTHING, NORTHING_OFFSET, UTM_MAX_LAT, UTM_MIN_LAT},
    latlon::LatLon,
    precision::CoordinatePrecision,
    translator::Translator,
    utility::GeoMath,
    utmups,
};

pub mod zonespec {
    pub const UPS: i32 = 0;
    pub const MINUTMZONE: i32 = 1;
    pub const MAXUTMZONE: i32 = 60;
}

/// Latitude bands of the UTM grid, south to north. I and O are never used.
pub(crate) const LATITUDE_BANDS: &str = "CDEFGHJKLMNPQRSTUVWX";

/// (band, north edge, south edge) in degrees. The bands touching the equator
/// stop just short of it.
const BAND_LATITUDES: [(char, f64, f64); 20] = [
    ('C', -72.0, -80.0),
    ('D', -64.0, -72.0),
    ('E', -56.0, -64.0),
    ('F', -48.0, -56.0),
    ('G', -40.0, -48.0),
    ('H', -32.0, -40.0),
    ('J', -24.0, -32.0),
    ('K', -16.0, -24.0),
    ('L', -8.0, -16.0),
    ('M', -0.01, -8.0),
    ('N', 8.0, 0.01),
    ('P', 16.0, 8.0),
    ('Q', 24.0, 16.0),
    ('R', 32.0, 24.0),
    ('S', 40.0, 32.0),
    ('T', 48.0, 40.0),
    ('U', 56.0, 48.0),
    ('V', 64.0, 56.0),
    ('W', 72.0, 64.0),
    ('X', 84.0, 72.0),
];

/// Grid zones that do not span the usual 6°, as (zone, band, east, west).
const IRREGULAR_ZONES: [(i32, char, f64, f64); 6] = [
    (31, 'V', 3.0, 0.0),
    (32, 'V', 12.0, 3.0),
    (31, 'X', 9.0, 0.0),
    (33, 'X', 21.0, 9.0),
    (35, 'X', 33.0, 21.0),
    (37, 'X', 42.0, 33.0),
];

/// Which side of the equator a UTM northing is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn is_north(self) -> bool {
        self == Hemisphere::North
    }

    /// Hemisphere implied by a UTM latitude band: N and above are north.
    pub fn from_utm_band(band: char) -> Hemisphere {
        (band >= 'N').ternary(Hemisphere::North, Hemisphere::South)
    }

    /// Hemisphere implied by a UPS band: Y and Z are north, A and B south.
    pub fn from_ups_band(band: char) -> Hemisphere {
        (band >= 'Y').ternary(Hemisphere::North, Hemisphere::South)
    }

    pub(crate) fn from_indicator(value: char) -> Option<Hemisphere> {
        match value.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            _ => None,
        }
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.is_north().ternary('N', 'S'))
    }
}

/// UTM zone containing `lat`/`lon`, including the Norway and Svalbard
/// exceptions. Longitudes in `[180, 360]` are accepted and wrapped.
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] when latitude is outside `[-80, 84]` or
/// longitude is outside `[-180, 360]`.
///
/// # Usage
///
/// ```
/// use usngconv::zone_number;
///
/// assert_eq!(zone_number(34.0, -111.0).unwrap(), 12);
/// assert_eq!(zone_number(28.0, 179.0).unwrap(), 60);
/// assert_eq!(zone_number(28.0, -180.0).unwrap(), 1);
/// assert_eq!(zone_number(60.0, 7.0).unwrap(), 32);
/// assert_eq!(zone_number(75.0, 10.0).unwrap(), 33);
/// assert!(zone_number(85.0, 0.0).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn zone_number(lat: f64, lon: f64) -> Result<i32, Error> {
    if !(-180_f64..=360_f64).contains(&lon) || !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&lat) {
        return Err(Error::InvalidCoord(format!(
            "Latitude {lat}, longitude {lon} outside of UTM range [-80, 84], [-180, 360]."
        )));
    }

    let lon = lon.wrap_longitude();
    let mut zone = ((lon + 180.) / 6.).floor() as i32 + 1;

    // Norway
    if (56_f64..64.).contains(&lat) && (3_f64..12.).contains(&lon) {
        zone = 32;
    }

    // Svalbard
    if (72_f64..84.).contains(&lat) {
        zone = match lon {
            l if (0_f64..9.).contains(&l) => 31,
            l if (9_f64..21.).contains(&l) => 33,
            l if (21_f64..33.).contains(&l) => 35,
            l if (33_f64..42.).contains(&l) => 37,
            _ => zone,
        };
    }

    Ok(zone)
}

/// Latitude band letter for `lat`, or `'Z'` outside the UTM latitude range.
///
/// ```
/// use usngconv::latitude_band;
///
/// assert_eq!(latitude_band(34.0), 'S');
/// assert_eq!(latitude_band(0.0), 'N');
/// assert_eq!(latitude_band(84.0), 'X');
/// assert_eq!(latitude_band(85.0), 'Z');
/// assert_eq!(latitude_band(-80.0), 'C');
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn latitude_band(lat: f64) -> char {
    if !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&lat) {
        return 'Z';
    }

    let mut index = (lat - UTM_MIN_LAT) / 8.;
    // Skip I
    if index >= 6. {
        index += 1.;
    }
    // Skip O
    if index >= 12. {
        index += 1.;
    }
    // 80 to 84 stays in X
    if index >= 22. {
        index -= 1.;
    }

    char::from(b'C' + index as u8)
}

/// Longitude of the central meridian of `zone`.
pub(crate) fn central_meridian(zone: i32) -> f64 {
    6.0 * f64::from(zone) - 183.
}

/// North and south latitude edges of a band, `None` for anything but C..X.
pub(crate) fn band_latitudes(band: char) -> Option<(f64, f64)> {
    BAND_LATITUDES
        .iter()
        .find(|(b, _, _)| *b == band)
        .map(|&(_, north, south)| (north, south))
}

/// East and west longitude edges of a grid zone.
pub(crate) fn zone_longitudes(zone: i32, band: char) -> (f64, f64) {
    IRREGULAR_ZONES
        .iter()
        .find(|(z, b, _, _)| *z == zone && *b == band)
        .map_or_else(
            || {
                let east = -180.0 + 6.0 * f64::from(zone);
                (east, east - 6.0)
            },
            |&(_, _, east, west)| (east, west),
        )
}

/// Resolves the hemisphere from an optional band and an optional N/S
/// indicator. At least one must be given, and they must agree.
pub(crate) fn resolve_hemisphere(
    band_hemisphere: Option<Hemisphere>,
    indicator: Option<Hemisphere>,
) -> Result<Hemisphere, Error> {
    match (band_hemisphere, indicator) {
        (Some(from_band), Some(given)) if from_band != given => Err(Error::InvalidFormat(format!(
            "Latitude band is in the {from_band} hemisphere but {given} was given."
        ))),
        (Some(h), _) | (None, Some(h)) => Ok(h),
        (None, None) => Err(Error::InvalidFormat(
            "A latitude band or an N/S indicator is required.".to_string(),
        )),
    }
}

pub(crate) fn check_easting_northing(easting: f64, northing: f64) -> Result<(), Error> {
    if !(0_f64..=MAX_EASTING).contains(&easting) {
        return Err(Error::InvalidCoord(format!(
            "Easting {easting} outside of valid range [0, {MAX_EASTING}]."
        )));
    }
    if !(0_f64..=MAX_NORTHING).contains(&northing) {
        return Err(Error::InvalidCoord(format!(
            "Northing {northing} outside of valid range [0, {MAX_NORTHING}]."
        )));
    }

    Ok(())
}

/// A Universal Transverse Mercator coordinate.
///
/// Northings are stored false-northed: southern hemisphere values carry the
/// 10,000,000m offset, so they are never negative.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtmCoordinate {
    pub(crate) zone: i32,
    pub(crate) latitude_band: Option<char>,
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) precision: CoordinatePrecision,
}

impl UtmCoordinate {
    pub(crate) fn new(
        zone: i32,
        latitude_band: Option<char>,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
        precision: CoordinatePrecision,
    ) -> UtmCoordinate {
        Self {
            zone,
            latitude_band,
            hemisphere,
            easting,
            northing,
            precision,
        }
    }

    /// Tries to create a UTM coordinate. Either a latitude band or a
    /// hemisphere must be supplied; precision follows from the number of whole
    /// meter digits.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidCoord`] if the zone is outside `[1, 60]` or the
    ///   easting/northing are out of range.
    /// * [`Error::InvalidFormat`] if the band is not one of C..X, or neither a
    ///   band nor a hemisphere is given, or they disagree.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{Hemisphere, UtmCoordinate};
    ///
    /// let coord = UtmCoordinate::create(18, Some('S'), None, 323_487.0, 4_306_483.0).unwrap();
    /// assert_eq!(coord.hemisphere(), Hemisphere::North);
    /// assert_eq!(coord.to_string(), "18S 323487 4306483");
    ///
    /// let south = UtmCoordinate::create(5, None, Some(Hemisphere::South), 1.0, 2_199_600.0).unwrap();
    /// assert_eq!(south.northing_with_offset(), 2_199_600.0 - 10_000_000.0);
    ///
    /// assert!(UtmCoordinate::create(61, Some('S'), None, 1.0, 1.0).is_err());
    /// assert!(UtmCoordinate::create(18, None, None, 1.0, 1.0).is_err());
    /// ```
    pub fn create(
        zone: i32,
        latitude_band: Option<char>,
        hemisphere: Option<Hemisphere>,
        easting: f64,
        northing: f64,
    ) -> Result<UtmCoordinate, Error> {
        if !(zonespec::MINUTMZONE..=zonespec::MAXUTMZONE).contains(&zone) {
            return Err(Error::InvalidCoord(format!("Zone {zone} not in range [1, 60].")));
        }

        let latitude_band = latitude_band.map(|b| b.to_ascii_uppercase());
        if let Some(band) = latitude_band {
            if !LATITUDE_BANDS.contains(band) {
                return Err(Error::InvalidFormat(format!("{band} is not a UTM latitude band.")));
            }
        }

        check_easting_northing(easting, northing)?;
        let hemisphere = resolve_hemisphere(latitude_band.map(Hemisphere::from_utm_band), hemisphere)?;

        Ok(UtmCoordinate::new(
            zone,
            latitude_band,
            hemisphere,
            easting,
            northing,
            CoordinatePrecision::for_meters(easting, northing),
        ))
    }

    pub fn zone(&self) -> i32 {
        self.zone
    }

    pub fn latitude_band(&self) -> Option<char> {
        self.latitude_band
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn is_north(&self) -> bool {
        self.hemisphere.is_north()
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    /// Northing as stored, including the southern false northing.
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Northing relative to the equator: negative in the southern hemisphere.
    pub fn northing_with_offset(&self) -> f64 {
        self.is_north().ternary(self.northing, self.northing - NORTHING_OFFSET)
    }

    pub fn precision(&self) -> CoordinatePrecision {
        self.precision
    }

    pub fn parse_str(value: &str) -> Result<UtmCoordinate, Error> {
        UtmCoordinate::parse_coord(value)
    }

    /// Converts to lat/lon on the NAD83 ellipsoid.
    pub fn to_latlon(&self) -> LatLon {
        Translator::default().utm_to_latlon(self)
    }
}

impl PartialEq for UtmCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.zone == other.zone
            && self.latitude_band == other.latitude_band
            && self.hemisphere == other.hemisphere
            && self.easting.eps_eq(other.easting)
            && self.northing.eps_eq(other.northing)
    }
}

impl ParseCoord for UtmCoordinate {
    /// Parses `"{zone}{band} {easting} {northing}"`, optionally with `mE`/`mN`
    /// suffixes and a trailing N/S indicator.
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let fields = utmups::parse_fields(value)?;
        match fields.zone {
            Some(zone) if zone != zonespec::UPS => UtmCoordinate::create(
                zone,
                fields.latitude_band,
                fields.hemisphere,
                fields.easting,
                fields.northing,
            ),
            _ => {
                log::debug!("rejected UTM string without a zone: {value:?}");
                Err(Error::InvalidFormat(format!("{value:?} has no UTM zone")))
            }
        }
    }
}

impl FromStr for UtmCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UtmCoordinate::parse_coord(s)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Display for UtmCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {} {}",
            self.zone,
            self.latitude_band.map(String::from).unwrap_or_default(),
            self.precision.format_meters(self.easting.trunc() as i64),
            self.precision.format_meters(self.northing.trunc() as i64),
        )?;

        if self.latitude_band.is_none() {
            write!(f, " {}", self.hemisphere)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(34.0, -111.0, 12)]
    #[case(0.0, 0.0, 31)]
    #[case(-4.5, -4.5, 30)]
    #[case(56.0, 3.0, 32)]
    #[case(63.99, 11.99, 32)]
    #[case(64.0, 5.0, 31)]
    #[case(72.0, 8.99, 31)]
    #[case(72.0, 20.0, 33)]
    #[case(83.9, 32.0, 35)]
    #[case(80.0, 41.9, 37)]
    #[case(80.0, 42.0, 38)]
    #[case(45.0, 359.0, 30)]
    #[case(45.0, 180.0, 1)]
    fn zones(#[case] lat: f64, #[case] lon: f64, #[case] zone: i32) {
        assert_eq!(zone_number(lat, lon).unwrap(), zone);
    }

    #[rstest]
    #[case(84.1, 0.0)]
    #[case(-80.1, 0.0)]
    #[case(0.0, 360.1)]
    #[case(0.0, -180.1)]
    #[case(f64::NAN, 0.0)]
    fn zones_out_of_range(#[case] lat: f64, #[case] lon: f64) {
        assert!(zone_number(lat, lon).unwrap_err().is_domain_error());
    }

    #[test]
    fn every_band_letter() {
        let letters: String = (0..20).map(|i| latitude_band(-76.0 + 8.0 * f64::from(i))).collect();
        assert_eq!(letters, LATITUDE_BANDS);
        assert_eq!(latitude_band(-80.5), 'Z');
        assert_eq!(latitude_band(-0.001), 'M');
    }

    #[test]
    fn band_edges() {
        assert_eq!(band_latitudes('M'), Some((-0.01, -8.0)));
        assert_eq!(band_latitudes('X'), Some((84.0, 72.0)));
        assert_eq!(band_latitudes('Z'), None);
        assert_eq!(band_latitudes('I'), None);
    }

    #[test]
    fn zone_edges() {
        assert_eq!(zone_longitudes(17, 'S'), (-78.0, -84.0));
        assert_eq!(zone_longitudes(1, 'C'), (-174.0, -180.0));
        assert_eq!(zone_longitudes(32, 'V'), (12.0, 3.0));
        assert_eq!(zone_longitudes(31, 'V'), (3.0, 0.0));
        assert_eq!(zone_longitudes(31, 'U'), (6.0, 0.0));
        assert_eq!(zone_longitudes(37, 'X'), (42.0, 33.0));
    }

    #[test]
    fn hemisphere_resolution() {
        assert_eq!(resolve_hemisphere(Some(Hemisphere::South), None).unwrap(), Hemisphere::South);
        assert_eq!(resolve_hemisphere(None, Some(Hemisphere::North)).unwrap(), Hemisphere::North);
        assert!(resolve_hemisphere(Some(Hemisphere::South), Some(Hemisphere::North)).unwrap_err().is_format_error());
        assert!(resolve_hemisphere(None, None).unwrap_err().is_format_error());
    }

    #[test]
    fn create_validates() {
        assert!(UtmCoordinate::create(0, Some('S'), None, 1.0, 1.0).unwrap_err().is_domain_error());
        assert!(UtmCoordinate::create(5, Some('Z'), None, 1.0, 1.0).unwrap_err().is_format_error());
        assert!(UtmCoordinate::create(5, Some('Q'), None, -1.0, 1.0).unwrap_err().is_domain_error());
        assert!(UtmCoordinate::create(5, Some('Q'), None, 1.0, 10_000_001.0).unwrap_err().is_domain_error());
        assert!(UtmCoordinate::create(5, Some('Q'), Some(Hemisphere::South), 1.0, 1.0).unwrap_err().is_format_error());

        let lower = UtmCoordinate::create(5, Some('q'), None, 1.0, 2_199_600.0).unwrap();
        assert_eq!(lower.latitude_band(), Some('Q'));
        assert_eq!(lower.precision(), CoordinatePrecision::OneMeter);
    }

    #[rstest]
    #[case(CoordinatePrecision::SixByEightDegrees, "17S 500000 3999600")]
    #[case(CoordinatePrecision::OneHundredKilometers, "17S 500000 3999600")]
    #[case(CoordinatePrecision::TenKilometers, "17S 500000 3999600")]
    #[case(CoordinatePrecision::OneMeter, "17S 500000 3999600")]
    fn display_writes_whole_meters(#[case] precision: CoordinatePrecision, #[case] expected: &str) {
        let coord = UtmCoordinate::new(17, Some('S'), Hemisphere::North, 500_000.0, 3_999_600.0, precision);
        assert_eq!(coord.to_string(), expected);
        assert_eq!(UtmCoordinate::parse_str(expected).unwrap(), coord);
    }

    #[test]
    fn display_without_band_has_indicator() {
        let coord = UtmCoordinate::create(5, None, Some(Hemisphere::North), 1.0, 2_199_600.0).unwrap();
        assert_eq!(coord.to_string(), "5 00001 2199600 N");
        assert_eq!(UtmCoordinate::parse_str(&coord.to_string()).unwrap(), coord);
    }
}
