#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// How finely a grid coordinate pins down a location.
///
/// Each level is the number of digits written per axis; the discriminant is
/// that level. Ordered from coarsest to finest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoordinatePrecision {
    /// Grid zone designator only, a 6° by 8° cell
    SixByEightDegrees = -1,
    OneHundredKilometers = 0,
    TenKilometers = 1,
    OneKilometer = 2,
    OneHundredMeters = 3,
    TenMeters = 4,
    #[default]
    OneMeter = 5,
}

impl CoordinatePrecision {
    pub const ALL: [CoordinatePrecision; 7] = [
        CoordinatePrecision::SixByEightDegrees,
        CoordinatePrecision::OneHundredKilometers,
        CoordinatePrecision::TenKilometers,
        CoordinatePrecision::OneKilometer,
        CoordinatePrecision::OneHundredMeters,
        CoordinatePrecision::TenMeters,
        CoordinatePrecision::OneMeter,
    ];

    /// Digits per axis, `-1` for the six-by-eight degree cell.
    pub fn level(self) -> i32 {
        self as i32
    }

    /// Width a numeric field is padded to; zero when no digits are written.
    pub fn digits(self) -> usize {
        usize::try_from(self.level()).unwrap_or(0)
    }

    /// Meters represented by one unit of the last written digit, `10^(5 - level)`.
    ///
    /// ```
    /// use usngconv::CoordinatePrecision;
    ///
    /// assert_eq!(CoordinatePrecision::OneMeter.divisor(), 1);
    /// assert_eq!(CoordinatePrecision::TenKilometers.divisor(), 10_000);
    /// assert_eq!(CoordinatePrecision::SixByEightDegrees.divisor(), 1_000_000);
    /// ```
    pub fn divisor(self) -> i64 {
        10_i64.pow((5 - self.level()).unsigned_abs())
    }

    /// Side of the square cell a coordinate at this precision stands for, in meters.
    pub fn cell_size(self) -> f64 {
        100_000. / 10_f64.powi(self.level())
    }

    /// Precision implied by the longer of two digit strings.
    ///
    /// ```
    /// use usngconv::CoordinatePrecision;
    ///
    /// assert_eq!(CoordinatePrecision::for_east_north("123", "4"), CoordinatePrecision::OneHundredMeters);
    /// assert_eq!(CoordinatePrecision::for_east_north("", ""), CoordinatePrecision::TenKilometers);
    /// ```
    pub fn for_east_north(easting: &str, northing: &str) -> CoordinatePrecision {
        let max_len = easting.trim().len().max(northing.trim().len());

        match max_len {
            l if l > 4 => CoordinatePrecision::OneMeter,
            4 => CoordinatePrecision::TenMeters,
            3 => CoordinatePrecision::OneHundredMeters,
            2 => CoordinatePrecision::OneKilometer,
            _ => CoordinatePrecision::TenKilometers,
        }
    }

    /// Precision implied by the whole-meter digit counts of a projected
    /// coordinate.
    pub(crate) fn for_meters(easting: f64, northing: f64) -> CoordinatePrecision {
        let digits = |value: f64| format!("{}", value.abs().trunc());
        CoordinatePrecision::for_east_north(&digits(easting), &digits(northing))
    }

    /// Zero-pads `value` to [`CoordinatePrecision::digits`] without grouping.
    /// Wider values are written in full. Levels of zero or below give an empty
    /// string.
    ///
    /// ```
    /// use usngconv::CoordinatePrecision;
    ///
    /// assert_eq!(CoordinatePrecision::OneKilometer.format(7), "07");
    /// assert_eq!(CoordinatePrecision::OneMeter.format(4_306_483), "4306483");
    /// assert_eq!(CoordinatePrecision::OneHundredKilometers.format(7), "");
    /// ```
    pub fn format(self, value: i64) -> String {
        match self.digits() {
            0 => String::new(),
            width => format!("{value:0width$}"),
        }
    }

    /// Whole-meter easting or northing of a projected coordinate. Padded like
    /// [`CoordinatePrecision::format`], but never empty.
    ///
    /// ```
    /// use usngconv::CoordinatePrecision;
    ///
    /// assert_eq!(CoordinatePrecision::OneMeter.format_meters(1), "00001");
    /// assert_eq!(CoordinatePrecision::SixByEightDegrees.format_meters(3_699_600), "3699600");
    /// assert_eq!(CoordinatePrecision::OneHundredKilometers.format_meters(0), "0");
    /// ```
    pub fn format_meters(self, value: i64) -> String {
        match self.digits() {
            0 => value.to_string(),
            _ => self.format(value),
        }
    }
}

impl TryFrom<i32> for CoordinatePrecision {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        CoordinatePrecision::ALL
            .into_iter()
            .find(|p| p.level() == value)
            .ok_or_else(|| Error::InvalidCoord(format!("Precision level {value} outside of valid range [-1, 5].")))
    }
}
