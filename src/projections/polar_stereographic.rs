use crate::{ThisOrThat, constants::UPS_K0, ellipsoid::Ellipsoid, utility::{GeoMath, dms}, latlon::LatLon};

#[derive(Clone, Copy, Debug)]
pub(crate) struct PolarStereographic {
    a: f64,
    k0: f64,
    es: f64,
    c: f64,
}

impl PolarStereographic {
    pub fn ups(ellipsoid: &Ellipsoid) -> PolarStereographic {
        let es = ellipsoid.es();
        let c = (1. - ellipsoid.e2()).sqrt() * 1_f64.eatanhe(es).exp();

        Self {
            a: ellipsoid.a(),
            k0: UPS_K0,
            es,
            c,
        }
    }

    /// Polar distance scale, `rho = t * 2 k0 a / c`.
    fn rho_scale(&self) -> f64 {
        2. * self.k0 * self.a / self.c
    }

    /// Projects onto the north (`northp`) or south polar plane. The result
    /// carries no false origin.
    pub fn from_latlon(&self, northp: bool, lat: f64, lon: f64) -> (f64, f64) {
        let lat = lat * northp.ternary(1., -1.);

        let tau = lat.to_radians().tan();
        let taup = tau.taupf(self.es);
        let mut rho = 1_f64.hypot(taup) + taup.abs();
        rho = (taup >= 0.).ternary_lazy(
            || (lat.eps_eq(f64::from(dms::QD))).ternary_lazy(|| 0., || 1. / rho),
            || rho,
        );
        rho *= self.rho_scale();

        let (x, y) = lon.to_radians().sin_cos();

        (x * rho, y * northp.ternary(-rho, rho))
    }

    /// Inverse of [`PolarStereographic::from_latlon`], with the false origin
    /// already removed from `x` and `y`.
    pub fn to_latlon(&self, northp: bool, x: f64, y: f64) -> LatLon {
        let rho = x.hypot(y);
        let t = (rho.is_zero()).ternary_lazy(
            || f64::EPSILON.powi(2),
            || rho / self.rho_scale(),
        );
        let taup = (1. / t - t) / 2.;
        let tau = taup.tauf(self.es);

        let lat = northp.ternary(1., -1.) * tau.atan().to_degrees();
        let lon = x.atan2(northp.ternary(-y, y)).to_degrees();

        LatLon::new(lat, lon)
    }
}
