use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Error, ParseCoord,
    bbox::BoundingBox,
    grid,
    latlon::LatLon,
    precision::CoordinatePrecision,
    translator::Translator,
    utm::{LATITUDE_BANDS, UtmCoordinate, zonespec},
};

/// Row letters used by any zone. I and O are skipped.
const ROW_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUV";

lazy_static! {
    static ref USNG_RE: Regex = Regex::new(
        r"^([1-9]|[1-5][0-9]|60)([C-HJ-NP-X])(?:\s+([A-HJ-NP-Z])([A-HJ-NP-V])(?:\s+(\d{1,5})\s+(\d{1,5}))?)?$"
    ).expect("USNG grammar is a valid regex");
    static ref MGRS_RE: Regex = Regex::new(
        r"^([1-9]|[1-5][0-9]|60)([C-HJ-NP-X])(?:([A-HJ-NP-Z])([A-HJ-NP-V])(\d{0,10}))?$"
    ).expect("MGRS grammar is a valid regex");
}

/// A United States National Grid (or MGRS) reference.
///
/// Everything after the grid zone designator is optional: a zone and band
/// alone name a 6° by 8° cell, grid letters narrow that to a 100km square,
/// and `n` digits per axis narrow it to a `10^(5 - n)` meter square. The
/// precision always matches what is present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsngCoordinate {
    zone: i32,
    latitude_band: char,
    column_letter: Option<char>,
    row_letter: Option<char>,
    easting: Option<u32>,
    northing: Option<u32>,
    precision: CoordinatePrecision,
}

fn check_zone_band(zone: i32, band: char) -> Result<char, Error> {
    if !(zonespec::MINUTMZONE..=zonespec::MAXUTMZONE).contains(&zone) {
        return Err(Error::InvalidCoord(format!("Zone {zone} not in range [1, 60].")));
    }

    let band = band.to_ascii_uppercase();
    if LATITUDE_BANDS.contains(band) {
        Ok(band)
    } else {
        Err(Error::InvalidFormat(format!("{band} is not a USNG latitude band.")))
    }
}

fn check_letters(zone: i32, column: char, row: char) -> Result<(char, char), Error> {
    let (column, row) = (column.to_ascii_uppercase(), row.to_ascii_uppercase());

    if !grid::is_column_letter(zone, column) {
        return Err(Error::InvalidFormat(format!("{column} is not a grid column letter in zone {zone}.")));
    }
    if !ROW_LETTERS.contains(row) {
        return Err(Error::InvalidFormat(format!("{row} is not a grid row letter.")));
    }

    Ok((column, row))
}

impl UsngCoordinate {
    /// Grid zone designator only, e.g. `18S`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] for a zone outside `[1, 60]` and
    /// [`Error::InvalidFormat`] for a band outside C..X.
    pub fn zone_band(zone: i32, latitude_band: char) -> Result<UsngCoordinate, Error> {
        let latitude_band = check_zone_band(zone, latitude_band)?;

        Ok(Self {
            zone,
            latitude_band,
            column_letter: None,
            row_letter: None,
            easting: None,
            northing: None,
            precision: CoordinatePrecision::SixByEightDegrees,
        })
    }

    /// A 100km grid square, e.g. `18S UJ`.
    ///
    /// # Errors
    ///
    /// As [`UsngCoordinate::zone_band`], plus [`Error::InvalidFormat`] when the
    /// column letter is not used by the zone or the row letter is not a grid
    /// row.
    pub fn grid_square(zone: i32, latitude_band: char, column_letter: char, row_letter: char) -> Result<UsngCoordinate, Error> {
        let coord = UsngCoordinate::zone_band(zone, latitude_band)?;
        let (column_letter, row_letter) = check_letters(zone, column_letter, row_letter)?;

        Ok(Self {
            column_letter: Some(column_letter),
            row_letter: Some(row_letter),
            precision: CoordinatePrecision::OneHundredKilometers,
            ..coord
        })
    }

    /// A fully specified reference with `precision.level()` digits per axis.
    ///
    /// # Errors
    ///
    /// As [`UsngCoordinate::grid_square`], plus [`Error::InvalidCoord`] when
    /// the precision has no digits or a value does not fit in its digits.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{CoordinatePrecision, UsngCoordinate};
    ///
    /// let coord = UsngCoordinate::create(18, 'S', 'U', 'J', 2348, 648, CoordinatePrecision::TenMeters).unwrap();
    /// assert_eq!(coord.to_string(), "18S UJ 2348 0648");
    /// assert_eq!(coord.to_mgrs_string(), "18SUJ23480648");
    ///
    /// assert!(UsngCoordinate::create(18, 'S', 'U', 'J', 23487, 648, CoordinatePrecision::TenMeters).is_err());
    /// assert!(UsngCoordinate::create(18, 'S', 'A', 'J', 1, 1, CoordinatePrecision::TenKilometers).is_err());
    /// ```
    pub fn create(
        zone: i32,
        latitude_band: char,
        column_letter: char,
        row_letter: char,
        easting: u32,
        northing: u32,
        precision: CoordinatePrecision,
    ) -> Result<UsngCoordinate, Error> {
        let coord = UsngCoordinate::grid_square(zone, latitude_band, column_letter, row_letter)?;

        if precision < CoordinatePrecision::TenKilometers {
            return Err(Error::InvalidCoord(format!("{precision:?} does not carry easting and northing digits.")));
        }

        let limit = 10_u32.pow(precision.level().unsigned_abs());
        if easting >= limit || northing >= limit {
            return Err(Error::InvalidCoord(format!(
                "Easting {easting} and northing {northing} must be below {limit} at {precision:?}."
            )));
        }

        Ok(Self {
            easting: Some(easting),
            northing: Some(northing),
            precision,
            ..coord
        })
    }

    /// Builds a reference from digit strings, taking the precision from their
    /// length.
    fn from_digit_strings(zone: i32, band: char, column: char, row: char, easting: &str, northing: &str) -> Result<UsngCoordinate, Error> {
        let precision = CoordinatePrecision::for_east_north(easting, northing);
        let parse = |digits: &str| {
            digits
                .parse::<u32>()
                .map_err(|e| Error::InvalidFormat(format!("{digits:?} is not a grid distance: {e}")))
        };

        UsngCoordinate::create(zone, band, column, row, parse(easting)?, parse(northing)?, precision)
    }

    pub fn zone(&self) -> i32 {
        self.zone
    }

    pub fn latitude_band(&self) -> char {
        self.latitude_band
    }

    pub fn column_letter(&self) -> Option<char> {
        self.column_letter
    }

    pub fn row_letter(&self) -> Option<char> {
        self.row_letter
    }

    pub fn easting(&self) -> Option<u32> {
        self.easting
    }

    pub fn northing(&self) -> Option<u32> {
        self.northing
    }

    pub fn precision(&self) -> CoordinatePrecision {
        self.precision
    }

    pub(crate) fn letters(&self) -> Option<(char, char)> {
        self.column_letter.zip(self.row_letter)
    }

    /// Parses the spaced USNG form, e.g. `18S UJ 23487 06483`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the string does not follow the
    /// grammar, and the errors of [`UsngCoordinate::create`] otherwise.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{CoordinatePrecision, UsngCoordinate};
    ///
    /// let coord = UsngCoordinate::parse_usng("18s uj 23487 06483").unwrap();
    /// assert_eq!(coord.zone(), 18);
    /// assert_eq!(coord.latitude_band(), 'S');
    /// assert_eq!(coord.column_letter(), Some('U'));
    /// assert_eq!(coord.row_letter(), Some('J'));
    /// assert_eq!(coord.easting(), Some(23487));
    /// assert_eq!(coord.northing(), Some(6483));
    /// assert_eq!(coord.precision(), CoordinatePrecision::OneMeter);
    ///
    /// assert_eq!(UsngCoordinate::parse_usng("12S").unwrap().precision(), CoordinatePrecision::SixByEightDegrees);
    /// assert!(UsngCoordinate::parse_usng("18S UJ 2348 06483").is_err());
    /// ```
    pub fn parse_usng(value: &str) -> Result<UsngCoordinate, Error> {
        let upper = value.trim().to_ascii_uppercase();
        let Some(caps) = USNG_RE.captures(&upper) else {
            log::debug!("rejected USNG string {value:?}");
            return Err(Error::InvalidFormat(format!("{value:?} is not a valid USNG string")));
        };

        let (zone, band) = zone_and_band(&caps)?;
        let Some((column, row)) = letters_of(&caps) else {
            return UsngCoordinate::zone_band(zone, band);
        };

        match (caps.get(5), caps.get(6)) {
            (Some(easting), Some(northing)) => {
                let (easting, northing) = (easting.as_str(), northing.as_str());
                if easting.len() != northing.len() {
                    log::debug!("rejected USNG string {value:?} with uneven digits");
                    return Err(Error::InvalidFormat(format!(
                        "{value:?} has {} easting digits but {} northing digits",
                        easting.len(),
                        northing.len()
                    )));
                }
                UsngCoordinate::from_digit_strings(zone, band, column, row, easting, northing)
            }
            _ => UsngCoordinate::grid_square(zone, band, column, row),
        }
    }

    /// Parses the unspaced MGRS form, e.g. `18SUJ2348706483`. The digit run is
    /// split evenly into easting and northing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the string does not follow the
    /// grammar or has an odd number of digits.
    ///
    /// ```
    /// use usngconv::UsngCoordinate;
    ///
    /// let mgrs = UsngCoordinate::parse_mgrs("5QKB4278531517").unwrap();
    /// assert_eq!(mgrs, UsngCoordinate::parse_usng("5Q KB 42785 31517").unwrap());
    ///
    /// assert!(UsngCoordinate::parse_mgrs("5QKB427853151").is_err());
    /// ```
    pub fn parse_mgrs(value: &str) -> Result<UsngCoordinate, Error> {
        let upper = value.trim().to_ascii_uppercase();
        let Some(caps) = MGRS_RE.captures(&upper) else {
            log::debug!("rejected MGRS string {value:?}");
            return Err(Error::InvalidFormat(format!("{value:?} is not a valid MGRS string")));
        };

        let (zone, band) = zone_and_band(&caps)?;
        let Some((column, row)) = letters_of(&caps) else {
            return UsngCoordinate::zone_band(zone, band);
        };

        let digits = caps.get(5).map_or("", |m| m.as_str());
        if digits.is_empty() {
            return UsngCoordinate::grid_square(zone, band, column, row);
        }
        if digits.len() % 2 != 0 {
            log::debug!("rejected MGRS string {value:?} with an odd digit count");
            return Err(Error::InvalidFormat(format!("{value:?} has an odd number of digits")));
        }

        let (easting, northing) = digits.split_at(digits.len() / 2);
        UsngCoordinate::from_digit_strings(zone, band, column, row, easting, northing)
    }

    /// Same content as the `Display` form with the separators removed.
    pub fn to_mgrs_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, spaced: bool) -> String {
        let sep = if spaced { " " } else { "" };
        let mut out = format!("{}{}", self.zone, self.latitude_band);

        if let Some((column, row)) = self.letters() {
            out.push_str(sep);
            out.push(column);
            out.push(row);

            if let (Some(easting), Some(northing)) = (self.easting, self.northing) {
                out.push_str(sep);
                out.push_str(&self.precision.format(i64::from(easting)));
                out.push_str(sep);
                out.push_str(&self.precision.format(i64::from(northing)));
            }
        }

        out
    }

    /// South-west corner of the referenced cell on the NAD83 ellipsoid.
    pub fn to_latlon(&self) -> Result<LatLon, Error> {
        Translator::default().usng_to_latlon(self)
    }

    pub fn to_utm(&self) -> Result<UtmCoordinate, Error> {
        Translator::default().usng_to_utm(self)
    }

    pub fn to_bounding_box(&self) -> Result<BoundingBox, Error> {
        Translator::default().usng_to_bounding_box(self)
    }
}

fn zone_and_band(caps: &regex::Captures<'_>) -> Result<(i32, char), Error> {
    let zone = caps[1]
        .parse::<i32>()
        .map_err(|e| Error::InvalidFormat(format!("Bad zone {}: {e}", &caps[1])))?;
    let band = caps[2].chars().next().unwrap_or_default();

    Ok((zone, band))
}

fn letters_of(caps: &regex::Captures<'_>) -> Option<(char, char)> {
    let column = caps.get(3)?.as_str().chars().next()?;
    let row = caps.get(4)?.as_str().chars().next()?;

    Some((column, row))
}

impl ParseCoord for UsngCoordinate {
    /// Accepts either the spaced USNG form or the unspaced MGRS form.
    fn parse_coord(value: &str) -> Result<Self, Error> {
        UsngCoordinate::parse_usng(value).or_else(|_| UsngCoordinate::parse_mgrs(value))
    }
}

impl FromStr for UsngCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UsngCoordinate::parse_coord(s)
    }
}

impl Display for UsngCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(true))
    }
}
