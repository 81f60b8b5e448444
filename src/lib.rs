#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc
)]

//! Conversions between geodetic latitude/longitude, UTM, UPS and the US
//! National Grid (USNG/MGRS).
//!
//! ```
//! use usngconv::{CoordinatePrecision, LatLon, UsngCoordinate};
//!
//! let point = LatLon::create(38.8895, -77.0352).unwrap();
//! let usng = point.to_usng(CoordinatePrecision::OneMeter).unwrap();
//! assert_eq!(usng.to_string(), "18S UJ 23487 06483");
//!
//! let parsed: UsngCoordinate = usngconv::from_str("18SUJ2348706483").unwrap();
//! assert_eq!(parsed, usng);
//! ```

use thiserror::Error;

pub mod bbox;
pub mod ellipsoid;
pub mod latlon;
pub mod precision;
pub mod translator;
pub mod ups;
pub mod usng;
pub mod utm;
pub mod utmups;

pub use bbox::BoundingBox;
pub use constants::NORTHING_OFFSET;
pub use ellipsoid::Ellipsoid;
pub use latlon::LatLon;
pub use precision::CoordinatePrecision;
pub use translator::Translator;
pub use ups::UpsCoordinate;
pub use usng::UsngCoordinate;
pub use utm::{Hemisphere, UtmCoordinate, latitude_band, zone_number};
pub use utmups::UtmUps;

pub(crate) mod projections {
    pub mod transverse_mercator;
    pub mod polar_stereographic;
}

pub(crate) mod constants;
pub(crate) mod grid;
pub(crate) mod utility;

#[derive(Debug, Error)]
pub enum Error {
    /// Input does not follow a coordinate grammar, or names a zone, band or
    /// grid square combination that cannot exist.
    #[error("Coordinate format is invalid: {0}")]
    InvalidFormat(String),
    /// A numeric value is outside its valid range.
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
}

impl Error {
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::InvalidFormat(_))
    }

    pub fn is_domain_error(&self) -> bool {
        matches!(self, Error::InvalidCoord(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ParseCoord {
    fn parse_coord(value: &str) -> std::result::Result<Self, Error>
    where Self: Sized;
}

/// Parses any coordinate type from its string form.
///
/// ```
/// use usngconv::{LatLon, UtmCoordinate};
///
/// let utm: UtmCoordinate = usngconv::from_str("18S 323487 4306483").unwrap();
/// assert_eq!(utm.zone(), 18);
///
/// let point = usngconv::from_str::<_, LatLon>("38.8895, -77.0352").unwrap();
/// assert!(point.is_north());
/// ```
pub fn from_str<S, T>(value: S) -> std::result::Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }

    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T,
    {
        if *self { r#true() } else { r#false() }
    }
}
