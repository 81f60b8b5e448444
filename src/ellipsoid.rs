#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, ThisOrThat};

const GRS80_E2: f64 = 0.006_694_380_023;
const CLARKE1866_E2: f64 = 0.006_768_658;

/// Reference ellipsoid used by the projections.
///
/// Only the equatorial radius and the squared eccentricity are free; everything
/// else is derived from them once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    a: f64,
    e2: f64,
    ep2: f64,
    e1: f64,
}

impl Ellipsoid {
    /// GRS80, the ellipsoid of NAD83.
    pub const NAD83: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        e2: GRS80_E2,
        ep2: GRS80_E2 / (1.0 - GRS80_E2),
        e1: 0.001_679_220_394_653_751_9,
    };
    /// Clarke 1866, the ellipsoid of NAD27.
    pub const NAD27: Ellipsoid = Ellipsoid {
        a: 6_378_206.4,
        e2: CLARKE1866_E2,
        ep2: CLARKE1866_E2 / (1.0 - CLARKE1866_E2),
        e1: 0.001_697_915_683_658_709_9,
    };

    /// Builds an ellipsoid from its equatorial radius in meters and its
    /// squared eccentricity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] unless `a > 0` and `0 <= e2 < 1`.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::Ellipsoid;
    ///
    /// let clarke = Ellipsoid::new(6_378_206.4, 0.006_768_658).unwrap();
    /// assert!((clarke.e1() - Ellipsoid::NAD27.e1()).abs() < 1e-12);
    ///
    /// assert!(Ellipsoid::new(-1.0, 0.0).is_err());
    /// assert!(Ellipsoid::new(6_378_137.0, 1.0).is_err());
    /// ```
    pub fn new(a: f64, e2: f64) -> Result<Ellipsoid, Error> {
        if !(a.is_finite() && a > 0.0) {
            return Err(Error::InvalidCoord(format!("Equatorial radius {a} must be positive.")));
        }
        if !(0.0..1.0).contains(&e2) {
            return Err(Error::InvalidCoord(format!("Squared eccentricity {e2} outside of valid range [0, 1).")));
        }

        let root = (1.0 - e2).sqrt();
        Ok(Ellipsoid {
            a,
            e2,
            ep2: e2 / (1.0 - e2),
            e1: (1.0 - root) / (1.0 + root),
        })
    }

    /// Looks up a preset by datum or ellipsoid name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for an unknown name.
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NAD83" | "GRS80" => Ok(Ellipsoid::NAD83),
            "NAD27" | "CLARKE1866" => Ok(Ellipsoid::NAD27),
            other => Err(Error::InvalidFormat(format!("Unknown ellipsoid {other}"))),
        }
    }

    /// Equatorial radius in meters.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Squared eccentricity.
    pub fn e2(&self) -> f64 {
        self.e2
    }

    /// Second eccentricity squared, `e2 / (1 - e2)`.
    pub fn ep2(&self) -> f64 {
        self.ep2
    }

    /// Footprint latitude series coefficient, `(1 - sqrt(1 - e2)) / (1 + sqrt(1 - e2))`.
    pub fn e1(&self) -> f64 {
        self.e1
    }

    /// Signed eccentricity, as used by the conformal latitude helpers.
    pub(crate) fn es(&self) -> f64 {
        (self.e2 < 0.0).ternary(-1., 1.) * self.e2.abs().sqrt()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::NAD83
    }
}
