use crate::{constants::UTM_K0, ellipsoid::Ellipsoid, latlon::LatLon, utility::GeoMath};

/// Latitude reported in place of an exact 0 by the inverse projection
const ZERO_LATITUDE_NUDGE: f64 = 0.001;

// ================================
// Transverse Mercator (Snyder series)
// ================================

#[derive(Clone, Copy, Debug)]
pub(crate) struct TransverseMercator {
    a: f64,
    k0: f64,
    e2: f64,
    ep2: f64,
    e1: f64,
    /// Meridian arc coefficients, `M = a * (m0*phi - m2*sin2phi + m4*sin4phi - m6*sin6phi)`
    m0: f64,
    m2: f64,
    m4: f64,
    m6: f64,
}

impl TransverseMercator {
    pub fn utm(ellipsoid: &Ellipsoid) -> TransverseMercator {
        let e2 = ellipsoid.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        Self {
            a: ellipsoid.a(),
            k0: UTM_K0,
            e2,
            ep2: ellipsoid.ep2(),
            e1: ellipsoid.e1(),
            m0: 1. - e2 / 4. - 3. * e4 / 64. - 5. * e6 / 256.,
            m2: 3. * e2 / 8. + 3. * e4 / 32. + 45. * e6 / 1024.,
            m4: 15. * e4 / 256. + 45. * e6 / 1024.,
            m6: 35. * e6 / 3072.,
        }
    }

    /// Distance along the central meridian from the equator to `phi` (radians).
    fn meridian_arc(&self, phi: f64) -> f64 {
        self.a * (
            self.m0 * phi
            - self.m2 * (2. * phi).sin()
            + self.m4 * (4. * phi).sin()
            - self.m6 * (6. * phi).sin()
        )
    }

    /// Projects `lat`/`lon` onto the zone whose central meridian is `lon0`.
    ///
    /// The returned `(x, y)` carry no false easting or northing: `x` is
    /// relative to the central meridian and `y` is negative south of the
    /// equator.
    #[allow(clippy::many_single_char_names)]
    pub fn from_latlon(&self, lon0: f64, lat: f64, lon: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = self.a / (1. - self.e2 * sin_phi.powi(2)).sqrt();
        let t = tan_phi.powi(2);
        let c = self.ep2 * cos_phi.powi(2);
        let a = cos_phi * (lon - lon0).to_radians();
        let m = self.meridian_arc(phi);

        let x = self.k0 * n * (
            a
            + (1. - t + c) * a.powi(3) / 6.
            + (5. - 18. * t + t.powi(2) + 72. * c - 58. * self.ep2) * a.powi(5) / 120.
        );

        let y = self.k0 * (
            m + n * tan_phi * (
                a.powi(2) / 2.
                + (5. - t + 9. * c + 4. * c.powi(2)) * a.powi(4) / 24.
                + (61. - 58. * t + t.powi(2) + 600. * c - 330. * self.ep2) * a.powi(6) / 720.
            )
        );

        (x, y)
    }

    /// Inverse of [`TransverseMercator::from_latlon`]. `y` is signed, so southern
    /// northings must have the false northing removed before calling this.
    #[allow(clippy::many_single_char_names)]
    pub fn to_latlon(&self, lon0: f64, x: f64, y: f64) -> LatLon {
        let m = y / self.k0;
        let mu = m / (self.a * self.m0);

        // Footprint latitude: the latitude on the central meridian with the same y
        let e1 = self.e1;
        let phi1 = mu
            + (3. * e1 / 2. - 27. * e1.powi(3) / 32.) * (2. * mu).sin()
            + (21. * e1.powi(2) / 16. - 55. * e1.powi(4) / 32.) * (4. * mu).sin()
            + (151. * e1.powi(3) / 96.) * (6. * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let w = 1. - self.e2 * sin_phi1.powi(2);

        let n1 = self.a / w.sqrt();
        let t1 = tan_phi1.powi(2);
        let c1 = self.ep2 * cos_phi1.powi(2);
        let r1 = self.a * (1. - self.e2) / w.powf(1.5);
        let d = x / (n1 * self.k0);

        let mut lat = (phi1 - (n1 * tan_phi1 / r1) * (
            d.powi(2) / 2.
            - (5. + 3. * t1 + 10. * c1 - 4. * c1.powi(2) - 9. * self.ep2) * d.powi(4) / 24.
            + (61. + 90. * t1 + 298. * c1 + 45. * t1.powi(2) - 252. * self.ep2 - 3. * c1.powi(2))
                * d.powi(6) / 720.
        )).to_degrees();

        if lat.is_zero() {
            log::debug!("inverse transverse mercator gave latitude 0 at x = {x}, reporting {ZERO_LATITUDE_NUDGE}");
            lat = ZERO_LATITUDE_NUDGE;
        }

        let dlon = (
            d
            - (1. + 2. * t1 + c1) * d.powi(3) / 6.
            + (5. - 2. * c1 + 28. * t1 - 3. * c1.powi(2) + 8. * self.ep2 + 24. * t1.powi(2))
                * d.powi(5) / 120.
        ) / cos_phi1;

        LatLon::new(lat, (lon0 + dlon.to_degrees()).ang_normalize())
    }
}
