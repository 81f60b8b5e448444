pub(crate) mod dms {
    /// Degrees per quarter turn
    pub const QD: i32 = 90;
    /// Degrees per half turn
    pub const HD: i32 = 2 * QD;
    /// Degrees per turn
    pub const TD: i32 = 2 * HD;
}

/// Newton iterations allowed when solving for the conformal latitude
const TAUF_MAX_ITER: usize = 5;

pub(crate) trait GeoMath {
    fn is_zero(&self) -> bool;
    fn eps_eq(&self, other: Self) -> bool;
    fn ang_normalize(&self) -> Self;
    fn wrap_longitude(&self) -> Self;
    fn eatanhe(&self, es: Self) -> Self;
    fn remainder(&self, denom: Self) -> Self;
    fn taupf(&self, es: Self) -> Self;
    fn tauf(&self, es: Self) -> Self;
}

impl GeoMath for f64 {
    fn is_zero(&self) -> bool {
        self.abs() < f64::EPSILON
    }

    fn eps_eq(&self, other: f64) -> bool {
        (*self - other).abs() < f64::EPSILON
    }

    /// Reduce an angle to `[-180, 180]`, keeping the sign of the input at the
    /// half-turn boundary.
    fn ang_normalize(&self) -> f64 {
        let value = self.remainder(f64::from(dms::TD));
        let hd = f64::from(dms::HD);

        if value.abs().eps_eq(hd) {
            hd.copysign(*self)
        }
        else {
            value
        }
    }

    /// Map a longitude given in `[-180, 360]` onto `[-180, 180)`. Both 180 and
    /// -180 come out as -180.
    fn wrap_longitude(&self) -> f64 {
        let td = f64::from(dms::TD);
        let hd = f64::from(dms::HD);
        (*self + hd) - ((*self + hd) / td).trunc() * td - hd
    }

    fn eatanhe(&self, es: f64) -> f64 {
        if es.is_sign_positive() {
            es * (es * *self).atanh()
        } else {
            -es * (es * *self).atanh()
        }
    }

    fn remainder(&self, denom: Self) -> Self {
        *self - (*self / denom).round() * denom
    }

    /// tan of the conformal latitude for `self` = tan of the geographic latitude.
    fn taupf(&self, es: f64) -> f64 {
        let tau1 = 1.0_f64.hypot(*self);
        let sig = (*self / tau1).eatanhe(es).sinh();

        1.0_f64.hypot(sig) * *self - sig * tau1
    }

    /// Inverse of [`GeoMath::taupf`], solved by Newton's method.
    #[allow(clippy::similar_names)]
    fn tauf(&self, es: f64) -> f64 {
        let tol = f64::EPSILON.sqrt() / 10.0;

        let e2m = 1.0 - es.powi(2);
        let mut tau = if self.abs() > 70.0 {
            self * 1_f64.eatanhe(es).exp()
        } else {
            self / e2m
        };

        let stol = tol * self.abs().max(1.0);
        for iter in 0..TAUF_MAX_ITER {
            let taupa = tau.taupf(es);
            let dtau = (self - taupa) * (1.0 + e2m * tau.powi(2))
                / (e2m * 1.0_f64.hypot(tau) * 1.0_f64.hypot(taupa));
            tau += dtau;
            // Written this way so a NaN step also stops the loop
            if !(dtau.abs() >= stol) {
                return tau;
            }
            log::trace!("tauf iter {}: dtau = {:.6e}", iter + 1, dtau);
        }

        log::trace!("tauf stopped after {TAUF_MAX_ITER} iterations without converging (taup = {self})");
        tau
    }
}

#[cfg(test)]
mod tests {
    use super::GeoMath;

    #[test]
    fn wrap_longitude_covers_extended_range() {
        assert!((180_f64.wrap_longitude() + 180.0).abs() < 1e-12);
        assert!(((-180_f64).wrap_longitude() + 180.0).abs() < 1e-12);
        assert!((360_f64.wrap_longitude()).abs() < 1e-12);
        assert!((270_f64.wrap_longitude() + 90.0).abs() < 1e-12);
        assert!((-77.5_f64.wrap_longitude() + 77.5).abs() < 1e-12);
    }

    #[test]
    fn ang_normalize_keeps_sign_at_half_turn() {
        assert_eq!(180_f64.ang_normalize(), 180.0);
        assert_eq!((-180_f64).ang_normalize(), -180.0);
        assert!((190_f64.ang_normalize() + 170.0).abs() < 1e-12);
    }

    #[test]
    fn tauf_inverts_taupf() {
        let es = 0.006_694_380_023_f64.sqrt();
        for tau in [-20.0, -1.0, 0.0, 0.3, 1.0, 5.0, 200.0] {
            let taup = f64::taupf(&tau, es);
            let back = taup.tauf(es);
            assert!((back - tau).abs() < 1e-9 * tau.abs().max(1.0), "{tau} -> {back}");
        }
    }
}
