use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Error, ParseCoord, ThisOrThat,
    constants::{NORTHING_OFFSET, SEAM_OVERLAP, UTM_MAX_LAT, UTM_MIN_LAT},
    latlon::LatLon,
    precision::CoordinatePrecision,
    translator::Translator,
    ups::{UPS_BANDS, UpsCoordinate},
    utility::GeoMath,
    utm::{self, Hemisphere, LATITUDE_BANDS, UtmCoordinate, zonespec},
};

lazy_static! {
    static ref UTM_UPS_RE: Regex = Regex::new(
        r"^(\d{0,2})([A-Z]?)\s+(\d+(?:\.\d+)?)(?:ME)?\s+(\d+(?:\.\d+)?)(?:MN)?(?:\s+([NS]))?$"
    ).expect("UTM/UPS grammar is a valid regex");
}

/// Raw fields of a UTM or UPS string, before any range checks.
#[derive(Debug)]
pub(crate) struct UtmUpsFields {
    /// `None` when no zone digits were written
    pub zone: Option<i32>,
    pub latitude_band: Option<char>,
    pub hemisphere: Option<Hemisphere>,
    pub easting: f64,
    pub northing: f64,
}

/// Splits `"{zone}{band} {easting}[mE] {northing}[mN] [N|S]"` into its
/// fields. Matching is case-insensitive.
pub(crate) fn parse_fields(value: &str) -> Result<UtmUpsFields, Error> {
    let upper = value.trim().to_ascii_uppercase();
    let Some(caps) = UTM_UPS_RE.captures(&upper) else {
        log::debug!("rejected UTM/UPS string {value:?}");
        return Err(Error::InvalidFormat(format!("{value:?} is not a valid UTM/UPS string")));
    };

    let zone = match &caps[1] {
        "" => None,
        digits => Some(
            digits
                .parse::<i32>()
                .map_err(|e| Error::InvalidFormat(format!("Bad zone {digits}: {e}")))?,
        ),
    };
    let number = |idx: usize| {
        caps[idx]
            .parse::<f64>()
            .map_err(|e| Error::InvalidFormat(format!("{:?} is not a distance: {e}", &caps[idx])))
    };

    Ok(UtmUpsFields {
        zone,
        latitude_band: caps[2].chars().next(),
        hemisphere: caps.get(5).and_then(|m| m.as_str().chars().next()).and_then(Hemisphere::from_indicator),
        easting: number(3)?,
        northing: number(4)?,
    })
}

/// A projected coordinate that is either UTM (zone 1..60) or UPS (zone 0).
///
/// Near the 84°N and 80°S seams a point can be expressed both ways;
/// [`UtmUps::is_utm`] and [`UtmUps::is_ups`] may then both be true.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtmUps {
    pub(crate) zone: i32,
    pub(crate) latitude_band: Option<char>,
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) precision: CoordinatePrecision,
}

impl UtmUps {
    /// Tries to create a UTM or UPS coordinate. Zone 0 is UPS and takes an
    /// A, B, Y or Z band; zones 1..60 are UTM and take a band from C..X.
    /// Either a band or a hemisphere must be supplied.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidCoord`] if easting is outside `[0, 3200000]`,
    ///   northing is outside `[0, 10000000]` or the zone is outside `[0, 60]`.
    /// * [`Error::InvalidFormat`] if the band does not belong to the zone's
    ///   grid, neither a band nor a hemisphere is given, or they disagree.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{Hemisphere, UtmUps};
    ///
    /// let ups = UtmUps::create(0, Some('B'), None, 2_029_070.0, 2_554_696.0).unwrap();
    /// assert_eq!(ups.hemisphere(), Hemisphere::South);
    /// assert_eq!(ups.to_string(), "B 2029070mE 2554696mN");
    ///
    /// let utm = UtmUps::create(5, None, Some(Hemisphere::North), 1.0, 2_199_600.0).unwrap();
    /// assert_eq!(utm.to_string(), "5 00001mE 2199600mN N");
    ///
    /// assert!(UtmUps::create(66, Some('M'), None, 1.0, 1.0).is_err());
    /// assert!(UtmUps::create(0, Some('I'), None, 1.0, 1.0).is_err());
    /// assert!(UtmUps::create(0, None, None, 1.0, 1.0).is_err());
    /// ```
    pub fn create(
        zone: i32,
        latitude_band: Option<char>,
        hemisphere: Option<Hemisphere>,
        easting: f64,
        northing: f64,
    ) -> Result<UtmUps, Error> {
        utm::check_easting_northing(easting, northing)?;

        if !(zonespec::UPS..=zonespec::MAXUTMZONE).contains(&zone) {
            return Err(Error::InvalidCoord(format!("Zone {zone} not in range [0, 60].")));
        }

        let utmp = zone != zonespec::UPS;
        let latitude_band = latitude_band.map(|b| b.to_ascii_uppercase());
        if let Some(band) = latitude_band {
            let bands = utmp.ternary(LATITUDE_BANDS, UPS_BANDS);
            if !bands.contains(band) {
                return Err(Error::InvalidFormat(format!(
                    "{band} is not a {} latitude band.",
                    utmp.ternary("UTM", "UPS")
                )));
            }
        }

        let band_hemisphere = latitude_band.map(|band| {
            utmp.ternary_lazy(|| Hemisphere::from_utm_band(band), || Hemisphere::from_ups_band(band))
        });
        let hemisphere = utm::resolve_hemisphere(band_hemisphere, hemisphere)?;

        Ok(Self {
            zone,
            latitude_band,
            hemisphere,
            easting,
            northing,
            precision: CoordinatePrecision::for_meters(easting, northing),
        })
    }

    /// Zone number, `0` for UPS.
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

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// UTM northing relative to the equator. UPS northings have no offset
    /// and are returned unchanged.
    pub fn northing_with_offset(&self) -> f64 {
        (self.zone != zonespec::UPS && !self.is_north()).ternary(self.northing - NORTHING_OFFSET, self.northing)
    }

    pub fn precision(&self) -> CoordinatePrecision {
        self.precision
    }

    /// Whether the point lies in UTM coverage. Always true for a UTM zone; a
    /// UPS point qualifies within half a degree of the UTM latitude limits.
    pub fn is_utm(&self) -> bool {
        if self.zone != zonespec::UPS {
            return true;
        }

        let lat = self.to_latlon().latitude();
        ((UTM_MIN_LAT - SEAM_OVERLAP)..=(UTM_MAX_LAT + SEAM_OVERLAP)).contains(&lat)
    }

    /// Whether the point lies in UPS coverage. Always true for zone 0; a UTM
    /// point qualifies within half a degree of the polar caps.
    pub fn is_ups(&self) -> bool {
        if self.zone == zonespec::UPS {
            return true;
        }

        let lat = self.to_latlon().latitude();
        lat >= UTM_MAX_LAT - SEAM_OVERLAP || lat <= UTM_MIN_LAT + SEAM_OVERLAP
    }

    pub fn parse_str(value: &str) -> Result<UtmUps, Error> {
        UtmUps::parse_coord(value)
    }

    /// Converts to lat/lon on the NAD83 ellipsoid.
    pub fn to_latlon(&self) -> LatLon {
        Translator::default().utm_ups_to_latlon(self)
    }
}

impl PartialEq for UtmUps {
    fn eq(&self, other: &Self) -> bool {
        self.zone == other.zone
            && self.latitude_band == other.latitude_band
            && self.hemisphere == other.hemisphere
            && self.easting.eps_eq(other.easting)
            && self.northing.eps_eq(other.northing)
    }
}

impl From<UtmCoordinate> for UtmUps {
    fn from(value: UtmCoordinate) -> Self {
        Self {
            zone: value.zone,
            latitude_band: value.latitude_band,
            hemisphere: value.hemisphere,
            easting: value.easting,
            northing: value.northing,
            precision: value.precision,
        }
    }
}

impl From<UpsCoordinate> for UtmUps {
    fn from(value: UpsCoordinate) -> Self {
        Self {
            zone: zonespec::UPS,
            latitude_band: Some(value.latitude_band()),
            hemisphere: value.hemisphere(),
            easting: value.easting(),
            northing: value.northing(),
            precision: value.precision(),
        }
    }
}

impl TryFrom<UtmUps> for UtmCoordinate {
    type Error = Error;

    fn try_from(value: UtmUps) -> Result<Self, Self::Error> {
        if value.zone == zonespec::UPS {
            return Err(Error::InvalidCoord("UPS coordinate has no UTM zone.".to_string()));
        }

        Ok(UtmCoordinate::new(
            value.zone,
            value.latitude_band,
            value.hemisphere,
            value.easting,
            value.northing,
            value.precision,
        ))
    }
}

impl TryFrom<UtmUps> for UpsCoordinate {
    type Error = Error;

    fn try_from(value: UtmUps) -> Result<Self, Self::Error> {
        if value.zone != zonespec::UPS {
            return Err(Error::InvalidCoord(format!("Zone {} is not a UPS zone.", value.zone)));
        }

        // Fill in a band from the hemisphere and the side of the 0° meridian
        let band = value
            .latitude_band
            .unwrap_or_else(|| UpsCoordinate::band_for(value.hemisphere, value.easting));
        UpsCoordinate::create(band, value.easting, value.northing)
    }
}

impl ParseCoord for UtmUps {
    /// Parses `"{zone}{band} {easting}[mE] {northing}[mN] [N|S]"`. A missing
    /// zone means UPS.
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let fields = parse_fields(value)?;
        UtmUps::create(
            fields.zone.unwrap_or(zonespec::UPS),
            fields.latitude_band,
            fields.hemisphere,
            fields.easting,
            fields.northing,
        )
    }
}

impl FromStr for UtmUps {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UtmUps::parse_coord(s)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Display for UtmUps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Zone 0 is implied by a polar band, but must be written without one
        if self.zone != zonespec::UPS || self.latitude_band.is_none() {
            write!(f, "{}", self.zone)?;
        }

        write!(
            f,
            "{} {}mE {}mN",
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
    #[case("5Q 000001 2199600", Some(5), Some('Q'), None)]
    #[case("5 000001 2199600 N", Some(5), None, Some(Hemisphere::North))]
    #[case("5 000001mE 2199600mN s", Some(5), None, Some(Hemisphere::South))]
    #[case("b 2029070mE 2554696mN", None, Some('B'), None)]
    #[case("0 2029070 2554696 S", Some(0), None, Some(Hemisphere::South))]
    fn fields(
        #[case] value: &str,
        #[case] zone: Option<i32>,
        #[case] band: Option<char>,
        #[case] hemisphere: Option<Hemisphere>,
    ) {
        let parsed = parse_fields(value).unwrap();
        assert_eq!(parsed.zone, zone);
        assert_eq!(parsed.latitude_band, band);
        assert_eq!(parsed.hemisphere, hemisphere);
    }

    #[rstest]
    #[case("5Q")]
    #[case("5Q KB 42785 31517")]
    #[case("5Q 1 2 X")]
    #[case("123Q 1 2")]
    #[case("")]
    fn fields_reject(#[case] value: &str) {
        assert!(parse_fields(value).unwrap_err().is_format_error());
    }

    #[rstest]
    #[case("5 000001 2199600")]
    #[case("5Z 000001 2199600")]
    #[case("L 000001 2199600")]
    #[case("5Q 000001 2199600 S")]
    fn parse_rejects_bad_combinations(#[case] value: &str) {
        assert!(UtmUps::parse_str(value).unwrap_err().is_format_error());
    }

    #[test]
    fn create_validates_ranges() {
        assert!(UtmUps::create(61, None, Some(Hemisphere::North), 1.0, 1.0).unwrap_err().is_domain_error());
        assert!(UtmUps::create(-1, None, Some(Hemisphere::North), 1.0, 1.0).unwrap_err().is_domain_error());
        assert!(UtmUps::create(5, Some('Q'), None, 3_200_001.0, 1.0).unwrap_err().is_domain_error());
        assert!(UtmUps::create(5, Some('Q'), None, 1.0, -1.0).unwrap_err().is_domain_error());
        assert!(UtmUps::create(5, Some('A'), None, 1.0, 1.0).unwrap_err().is_format_error());
        assert!(UtmUps::create(0, Some('Q'), None, 1.0, 1.0).unwrap_err().is_format_error());
        assert!(UtmUps::create(0, Some('Y'), Some(Hemisphere::South), 1.0, 1.0).unwrap_err().is_format_error());
    }

    #[test]
    fn display_round_trip() {
        for value in ["5Q 00001mE 2199600mN", "5 00001mE 2199600mN N", "Z 2000000mE 2000000mN", "0 2029070mE 2554696mN S"] {
            let coord = UtmUps::parse_str(value).unwrap();
            assert_eq!(coord.to_string(), value);
            assert_eq!(UtmUps::parse_str(&coord.to_string()).unwrap(), coord);
        }
    }

    #[test]
    fn ups_string_is_ups_only() {
        let coord = UtmUps::parse_str("Z 2000000mE 2000000mN").unwrap();
        assert_eq!(coord.zone(), zonespec::UPS);
        assert_eq!(coord.latitude_band(), Some('Z'));
        assert_eq!(coord.precision(), CoordinatePrecision::OneMeter);
        assert!(coord.is_ups());
        assert!(!coord.is_utm());
    }

    #[test]
    fn mid_latitude_utm_is_not_ups() {
        let coord = UtmUps::parse_str("18S 323487 4306483").unwrap();
        assert!(coord.is_utm());
        assert!(!coord.is_ups());
    }

    #[test]
    fn southern_offset_only_for_utm() {
        let utm = UtmUps::create(21, Some('H'), None, 341_475.0, 6_168_016.0).unwrap();
        assert!((utm.northing_with_offset() - (6_168_016.0 - NORTHING_OFFSET)).abs() < 1e-9);

        let ups = UtmUps::create(0, Some('A'), None, 1_900_000.0, 2_100_000.0).unwrap();
        assert!((ups.northing_with_offset() - 2_100_000.0).abs() < 1e-9);
    }

    #[test]
    fn conversions_between_kinds() {
        let utm = UtmCoordinate::create(18, Some('S'), None, 323_487.0, 4_306_483.0).unwrap();
        let both = UtmUps::from(utm);
        assert_eq!(UtmCoordinate::try_from(both).unwrap(), utm);
        assert!(UpsCoordinate::try_from(both).unwrap_err().is_domain_error());

        let ups = UpsCoordinate::create('Y', 1_900_000.0, 2_100_000.0).unwrap();
        let both = UtmUps::from(ups);
        assert_eq!(both.zone(), 0);
        assert_eq!(UpsCoordinate::try_from(both).unwrap(), ups);
        assert!(UtmCoordinate::try_from(both).is_err());

        let bare = UtmUps::create(0, None, Some(Hemisphere::North), 2_100_000.0, 2_000_000.0).unwrap();
        assert_eq!(UpsCoordinate::try_from(bare).unwrap().latitude_band(), 'Z');
    }
}
