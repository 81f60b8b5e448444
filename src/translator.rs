//! The conversion engine.
//!
//! A [`Translator`] is fixed to one reference ellipsoid at construction and
//! holds nothing else, so a single instance can be shared between threads.

use crate::{
    Error, ThisOrThat,
    bbox::BoundingBox,
    constants::{BLOCK_SIZE, NORTHING_OFFSET, SEAM_OVERLAP, UPS_FALSE_ORIGIN, UTM_FALSE_EASTING, UTM_MAX_LAT, UTM_MIN_LAT},
    ellipsoid::Ellipsoid,
    grid,
    latlon::LatLon,
    precision::CoordinatePrecision,
    projections::{polar_stereographic::PolarStereographic, transverse_mercator::TransverseMercator},
    ups::UpsCoordinate,
    usng::UsngCoordinate,
    utility::GeoMath,
    utm::{self, Hemisphere, UtmCoordinate, latitude_band, zone_number, zonespec},
    utmups::UtmUps,
};

/// Converts between lat/lon, UTM, UPS and USNG on one reference ellipsoid.
///
/// # Usage
///
/// ```
/// use usngconv::{CoordinatePrecision, LatLon, Translator};
///
/// let translator = Translator::nad83();
/// let point = LatLon::create(34.0, -111.0).unwrap();
///
/// let utm = translator.to_utm(&point).unwrap();
/// assert_eq!(utm.zone(), 12);
/// assert_eq!(utm.easting().round(), 500_000.0);
/// assert_eq!(utm.northing().trunc(), 3_762_155.0);
///
/// let usng = translator.to_usng(&point, CoordinatePrecision::TenKilometers).unwrap();
/// assert_eq!(usng.to_string(), "12S WC 0 6");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Translator {
    ellipsoid: Ellipsoid,
    tm: TransverseMercator,
    ps: PolarStereographic,
}

impl Translator {
    pub fn new(ellipsoid: Ellipsoid) -> Translator {
        Self {
            ellipsoid,
            tm: TransverseMercator::utm(&ellipsoid),
            ps: PolarStereographic::ups(&ellipsoid),
        }
    }

    /// Translator on the GRS80 ellipsoid used by NAD83.
    pub fn nad83() -> Translator {
        Translator::new(Ellipsoid::NAD83)
    }

    /// Translator on the Clarke 1866 ellipsoid used by NAD27.
    pub fn nad27() -> Translator {
        Translator::new(Ellipsoid::NAD27)
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    // ================================
    // From lat/lon
    // ================================

    /// Projects a point into its UTM zone. Southern northings carry the
    /// 10,000,000m false northing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] when latitude is outside `[-80, 84]`.
    pub fn to_utm(&self, point: &LatLon) -> Result<UtmCoordinate, Error> {
        let lat = point.latitude();
        let zone = zone_number(lat, point.longitude())?;
        let lon = point.longitude().wrap_longitude();

        let (x, y) = self.tm.from_latlon(utm::central_meridian(zone), lat, lon);

        let hemisphere = (lat < 0.).ternary(Hemisphere::South, Hemisphere::North);
        let easting = x + UTM_FALSE_EASTING;
        let northing = hemisphere.is_north().ternary(y, y + NORTHING_OFFSET);

        Ok(UtmCoordinate::new(
            zone,
            Some(latitude_band(lat)),
            hemisphere,
            easting,
            northing,
            CoordinatePrecision::for_meters(easting, northing),
        ))
    }

    /// Projects a point onto its polar cap. Latitudes reach half a degree into
    /// UTM coverage, so the cap starts at 83.5°N and 79.5°S.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] for latitudes between the caps.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{LatLon, Translator};
    ///
    /// let translator = Translator::default();
    /// let ups = translator.to_ups(&LatLon::create(-85.0, 3.0).unwrap()).unwrap();
    /// assert_eq!(ups.to_string(), "B 2029070mE 2554696mN");
    ///
    /// assert!(translator.to_ups(&LatLon::create(45.0, 3.0).unwrap()).is_err());
    /// ```
    pub fn to_ups(&self, point: &LatLon) -> Result<UpsCoordinate, Error> {
        let lat = point.latitude();
        let hemisphere = if lat >= UTM_MAX_LAT - SEAM_OVERLAP {
            Hemisphere::North
        } else if lat <= UTM_MIN_LAT + SEAM_OVERLAP {
            Hemisphere::South
        } else {
            return Err(Error::InvalidCoord(format!(
                "Latitude {lat} outside of UPS range [-90, {}], [{}, 90].",
                UTM_MIN_LAT + SEAM_OVERLAP,
                UTM_MAX_LAT - SEAM_OVERLAP
            )));
        };

        let (x, y) = self.ps.from_latlon(hemisphere.is_north(), lat, point.longitude());
        let easting = x + UPS_FALSE_ORIGIN;
        let northing = y + UPS_FALSE_ORIGIN;

        Ok(UpsCoordinate::new(
            UpsCoordinate::band_for(hemisphere, easting),
            easting,
            northing,
            CoordinatePrecision::for_meters(easting, northing),
        ))
    }

    /// UTM inside `[-80, 84]`, UPS outside.
    pub fn to_utm_ups(&self, point: &LatLon) -> Result<UtmUps, Error> {
        if (UTM_MIN_LAT..=UTM_MAX_LAT).contains(&point.latitude()) {
            self.to_utm(point).map(UtmUps::from)
        } else {
            self.to_ups(point).map(UtmUps::from)
        }
    }

    /// USNG reference for a point, truncated (not rounded) to `precision`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] outside UTM coverage.
    pub fn to_usng(&self, point: &LatLon, precision: CoordinatePrecision) -> Result<UsngCoordinate, Error> {
        let utm = self.to_utm(point)?;
        let zone = utm.zone();
        let band = latitude_band(point.latitude());

        if precision == CoordinatePrecision::SixByEightDegrees {
            return UsngCoordinate::zone_band(zone, band);
        }

        let (column, row) = grid::grid_letters(zone, utm.easting(), utm.northing());
        if precision == CoordinatePrecision::OneHundredKilometers {
            return UsngCoordinate::grid_square(zone, band, column, row);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let digits = |value: f64| {
            ((value.round() as i64).rem_euclid(BLOCK_SIZE) / precision.divisor()) as u32
        };

        UsngCoordinate::create(zone, band, column, row, digits(utm.easting()), digits(utm.northing()), precision)
    }

    /// [`Translator::to_usng`] at one meter.
    pub fn to_usng_default(&self, point: &LatLon) -> Result<UsngCoordinate, Error> {
        self.to_usng(point, CoordinatePrecision::OneMeter)
    }

    /// USNG reference for the middle of a box, as coarse as the box is large.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] when the midpoint is outside UTM
    /// coverage.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{BoundingBox, Translator};
    ///
    /// let translator = Translator::default();
    /// let wide = BoundingBox::new(37.0, 31.0, -108.0, -114.0).unwrap();
    /// assert_eq!(translator.bounding_box_to_usng(&wide).unwrap().to_string(), "12S");
    ///
    /// let narrow = BoundingBox::new(34.55, 34.55, -112.472, -112.47199).unwrap();
    /// assert_eq!(translator.bounding_box_to_usng(&narrow).unwrap().to_string(), "12S UD 64941 24126");
    /// ```
    pub fn bounding_box_to_usng(&self, bbox: &BoundingBox) -> Result<UsngCoordinate, Error> {
        self.to_usng(&bbox.midpoint(), bbox.precision())
    }

    // ================================
    // To lat/lon
    // ================================

    pub fn utm_to_latlon(&self, utm: &UtmCoordinate) -> LatLon {
        self.tm.to_latlon(
            utm::central_meridian(utm.zone()),
            utm.easting() - UTM_FALSE_EASTING,
            utm.northing_with_offset(),
        )
    }

    pub fn ups_to_latlon(&self, ups: &UpsCoordinate) -> LatLon {
        self.polar_to_latlon(ups.is_north(), ups.easting(), ups.northing())
    }

    /// Inverse projection picked by zone: 0 is polar, anything else is UTM.
    pub fn utm_ups_to_latlon(&self, coord: &UtmUps) -> LatLon {
        if coord.zone() == zonespec::UPS {
            self.polar_to_latlon(coord.is_north(), coord.easting(), coord.northing())
        } else {
            self.tm.to_latlon(
                utm::central_meridian(coord.zone()),
                coord.easting() - UTM_FALSE_EASTING,
                coord.northing_with_offset(),
            )
        }
    }

    fn polar_to_latlon(&self, northp: bool, easting: f64, northing: f64) -> LatLon {
        self.ps.to_latlon(northp, easting - UPS_FALSE_ORIGIN, northing - UPS_FALSE_ORIGIN)
    }

    /// South-west corner of the cell a USNG reference names. A bare grid zone
    /// designator gives a point halfway up its band on the central meridian.
    ///
    /// # Errors
    ///
    /// See [`Translator::usng_to_utm`].
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{Translator, UsngCoordinate};
    ///
    /// let usng = UsngCoordinate::parse_usng("18S UJ 23487 06483").unwrap();
    /// let point = Translator::default().usng_to_latlon(&usng).unwrap();
    ///
    /// assert!((point.latitude() - 38.8895).abs() < 1e-4);
    /// assert!((point.longitude() + 77.0352).abs() < 1e-4);
    /// ```
    pub fn usng_to_latlon(&self, usng: &UsngCoordinate) -> Result<LatLon, Error> {
        self.usng_to_utm(usng).map(|utm| self.utm_to_latlon(&utm))
    }

    // ================================
    // To UTM and bounding boxes
    // ================================

    /// UTM position of the south-west corner of a USNG cell. The result keeps
    /// the USNG precision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the grid letters do not decode.
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{Translator, UsngCoordinate};
    ///
    /// let usng = UsngCoordinate::parse_usng("12S VC 12900 43292").unwrap();
    /// let utm = Translator::default().usng_to_utm(&usng).unwrap();
    ///
    /// assert_eq!(utm.to_string(), "12S 412900 3743292");
    /// ```
    pub fn usng_to_utm(&self, usng: &UsngCoordinate) -> Result<UtmCoordinate, Error> {
        let precision = usng.precision();
        let band = usng.latitude_band();

        let (easting, northing) = grid::grid_origin(
            usng.zone(),
            band,
            usng.letters(),
            i64::from(usng.easting().unwrap_or(0)),
            i64::from(usng.northing().unwrap_or(0)),
            precision.divisor(),
        )
        .ok_or_else(|| Error::InvalidFormat(format!("{usng} does not name a grid square")))?;

        Ok(UtmCoordinate::new(
            usng.zone(),
            Some(band),
            Hemisphere::from_utm_band(band),
            easting,
            northing,
            precision,
        ))
    }

    /// Box covering `accuracy` meters north and east of a UTM coordinate, or
    /// the cell its precision stands for when no accuracy is given.
    ///
    /// Above 100km the box is the whole grid zone: the latitude band's edges
    /// by the zone's longitude edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if the zone is wider than 100km and the
    /// point's band is outside C..X.
    pub fn utm_to_bounding_box(&self, utm: &UtmCoordinate, accuracy: Option<f64>) -> Result<BoundingBox, Error> {
        let accuracy = accuracy.unwrap_or_else(|| utm.precision().cell_size());
        let south_west = self.utm_to_latlon(utm);

        if accuracy <= BLOCK_SIZE as f64 {
            let corner = UtmCoordinate::new(
                utm.zone(),
                utm.latitude_band(),
                utm.hemisphere(),
                utm.easting() + accuracy,
                utm.northing() + accuracy,
                utm.precision(),
            );
            let north_east = self.utm_to_latlon(&corner);

            return Ok(BoundingBox::new_unchecked(
                north_east.latitude().max(south_west.latitude()),
                north_east.latitude().min(south_west.latitude()),
                north_east.longitude(),
                south_west.longitude(),
            ));
        }

        let band = utm.latitude_band().unwrap_or_else(|| latitude_band(south_west.latitude()));
        let (north, south) = utm::band_latitudes(band).ok_or_else(|| {
            Error::InvalidCoord(format!("Latitude {} is outside the UTM bands.", south_west.latitude()))
        })?;
        let (east, west) = utm::zone_longitudes(utm.zone(), band);

        Ok(BoundingBox::new_unchecked(north, south, east, west))
    }

    /// As [`Translator::utm_to_bounding_box`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] for a UPS coordinate.
    pub fn utm_ups_to_bounding_box(&self, coord: &UtmUps, accuracy: Option<f64>) -> Result<BoundingBox, Error> {
        let utm = UtmCoordinate::try_from(*coord)?;
        self.utm_to_bounding_box(&utm, accuracy)
    }

    /// The area a USNG reference stands for.
    ///
    /// # Errors
    ///
    /// See [`Translator::usng_to_utm`].
    ///
    /// # Usage
    ///
    /// ```
    /// use usngconv::{Translator, UsngCoordinate};
    ///
    /// let gzd = UsngCoordinate::parse_usng("17S").unwrap();
    /// let bbox = Translator::default().usng_to_bounding_box(&gzd).unwrap();
    ///
    /// assert_eq!(bbox.to_string(), "40.0 32.0 -78.0 -84.0");
    /// ```
    pub fn usng_to_bounding_box(&self, usng: &UsngCoordinate) -> Result<BoundingBox, Error> {
        let utm = self.usng_to_utm(usng)?;
        self.utm_to_bounding_box(&utm, Some(usng.precision().cell_size()))
    }

    // ================================
    // Parsing
    // ================================

    pub fn parse_utm_string(&self, value: &str) -> Result<UtmCoordinate, Error> {
        UtmCoordinate::parse_str(value)
    }

    pub fn parse_usng_string(&self, value: &str) -> Result<UsngCoordinate, Error> {
        UsngCoordinate::parse_usng(value)
    }

    pub fn parse_mgrs_string(&self, value: &str) -> Result<UsngCoordinate, Error> {
        UsngCoordinate::parse_mgrs(value)
    }

    pub fn parse_utm_ups_string(&self, value: &str) -> Result<UtmUps, Error> {
        UtmUps::parse_str(value)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Translator::nad83()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    fn point(lat: f64, lon: f64) -> LatLon {
        LatLon::create(lat, lon).unwrap()
    }

    #[rstest]
    #[case(34.0, -111.0, 12, 'S', 500_000.0, 3_762_155.977)]
    #[case(0.0, 0.0, 31, 'N', 166_021.443, 0.0)]
    #[case(-34.5, -58.5, 21, 'H', 362_289.447, 6_181_381.594)]
    #[case(40.748333, -73.985278, 18, 'T', 585_664.121, 4_511_315.422)]
    fn forward_utm(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] zone: i32,
        #[case] band: char,
        #[case] easting: f64,
        #[case] northing: f64,
    ) {
        let utm = Translator::default().to_utm(&point(lat, lon)).unwrap();
        assert_eq!(utm.zone(), zone);
        assert_eq!(utm.latitude_band(), Some(band));
        assert_abs_diff_eq!(utm.easting(), easting, epsilon = 1e-3);
        assert_abs_diff_eq!(utm.northing(), northing, epsilon = 1e-3);
    }

    #[test]
    fn forward_utm_rejects_polar() {
        let translator = Translator::default();
        assert!(translator.to_utm(&point(84.5, 0.)).unwrap_err().is_domain_error());
        assert!(translator.to_utm(&point(-80.5, 0.)).unwrap_err().is_domain_error());
    }

    #[test]
    fn antimeridian_uses_wrapped_longitude() {
        let translator = Translator::default();
        let east = translator.to_utm(&LatLon::new(28.5, 180.)).unwrap();
        let west = translator.to_utm(&point(28.5, -180.)).unwrap();
        assert_eq!(east.zone(), 1);
        assert_abs_diff_eq!(east.easting(), west.easting(), epsilon = 1e-9);
    }

    #[rstest]
    #[case(85.0, 30.0, 'Z', 2_277_728.696, 1_518_959.788)]
    #[case(-85.0, -45.0, 'A', 1_607_232.312, 2_392_767.688)]
    #[case(84.0, 0.0, 'Z', 2_000_000.0, 1_333_272.296)]
    #[case(-80.0, 90.0, 'B', 3_112_951.137, 2_000_000.0)]
    fn forward_ups(#[case] lat: f64, #[case] lon: f64, #[case] band: char, #[case] easting: f64, #[case] northing: f64) {
        let ups = Translator::default().to_ups(&point(lat, lon)).unwrap();
        assert_eq!(ups.latitude_band(), band);
        assert_abs_diff_eq!(ups.easting(), easting, epsilon = 1e-3);
        assert_abs_diff_eq!(ups.northing(), northing, epsilon = 1e-3);

        let back = Translator::default().ups_to_latlon(&ups);
        assert_abs_diff_eq!(back.latitude(), lat, epsilon = 1e-9);
        assert_abs_diff_eq!(back.longitude(), lon, epsilon = 1e-9);
    }

    #[test]
    fn utm_ups_picks_projection_by_latitude() {
        let translator = Translator::default();
        assert_eq!(translator.to_utm_ups(&point(84.0, 10.)).unwrap().zone(), 32);
        assert_eq!(translator.to_utm_ups(&point(83.9, 10.)).unwrap().zone(), 33);
        assert_eq!(translator.to_utm_ups(&point(84.1, 10.)).unwrap().zone(), 0);
        assert_eq!(translator.to_utm_ups(&point(-80.0, 10.)).unwrap().zone(), 32);
        assert_eq!(translator.to_utm_ups(&point(-80.1, 10.)).unwrap().zone(), 0);
    }

    #[test]
    fn seam_points_are_both() {
        let translator = Translator::default();

        let utm_side = translator.to_utm_ups(&point(83.9, 10.)).unwrap();
        assert!(utm_side.is_utm());
        assert!(utm_side.is_ups());

        let ups_side = translator.to_utm_ups(&point(84.2, 10.)).unwrap();
        assert!(ups_side.is_utm());
        assert!(ups_side.is_ups());

        let deep = translator.to_utm_ups(&point(-85., 10.)).unwrap();
        assert!(!deep.is_utm());
    }

    #[test]
    fn usng_inverse_matches_forward() {
        let translator = Translator::default();
        let usng = translator.parse_usng_string("18S UJ 23487 06483").unwrap();

        let utm = translator.usng_to_utm(&usng).unwrap();
        assert_abs_diff_eq!(utm.easting(), 323_487.);
        assert_abs_diff_eq!(utm.northing(), 4_306_483.);
        assert_eq!(utm.precision(), CoordinatePrecision::OneMeter);

        let latlon = translator.usng_to_latlon(&usng).unwrap();
        assert_eq!(translator.to_usng_default(&latlon).unwrap(), usng);
    }

    #[test]
    fn southern_usng_keeps_false_northing() {
        let translator = Translator::default();
        let usng = translator.parse_usng_string("21H UB 41 63").unwrap();

        let utm = translator.usng_to_utm(&usng).unwrap();
        assert_eq!(utm.hemisphere(), Hemisphere::South);
        assert!(utm.northing() > 6_000_000.);

        let latlon = translator.usng_to_latlon(&usng).unwrap();
        assert!(latlon.latitude() < -34.);
    }

    #[test]
    fn zone_band_box_uses_irregular_zones() {
        let translator = Translator::default();
        let norway = translator.usng_to_bounding_box(&UsngCoordinate::zone_band(32, 'V').unwrap()).unwrap();
        assert_abs_diff_eq!(norway.west(), 3.);
        assert_abs_diff_eq!(norway.east(), 12.);
        assert_abs_diff_eq!(norway.south(), 56.);
        assert_abs_diff_eq!(norway.north(), 64.);
    }

    #[test]
    fn utm_box_defaults_to_precision_cell() {
        let translator = Translator::default();
        let utm = UtmCoordinate::create(18, Some('S'), None, 323_487., 4_306_483.).unwrap();
        let bbox = translator.utm_to_bounding_box(&utm, None).unwrap();

        // One meter square
        assert!(bbox.north() > bbox.south());
        assert!(bbox.north() - bbox.south() < 1e-4);
        assert!(bbox.east() > bbox.west());

        let wide = translator.utm_to_bounding_box(&utm, Some(200_000.)).unwrap();
        assert_abs_diff_eq!(wide.north(), 40.);
        assert_abs_diff_eq!(wide.west(), -78.);
    }

    #[test]
    fn ups_has_no_utm_box() {
        let translator = Translator::default();
        let ups = translator.parse_utm_ups_string("Z 2000000mE 2000000mN").unwrap();
        assert!(translator.utm_ups_to_bounding_box(&ups, None).unwrap_err().is_domain_error());
    }

    #[test]
    fn nad27_shifts_the_grid() {
        let here = point(38.8895, -77.0352);
        let nad83 = Translator::nad83().to_utm(&here).unwrap();
        let nad27 = Translator::nad27().to_utm(&here).unwrap();

        assert_eq!(nad83.zone(), nad27.zone());
        assert!((nad83.northing() - nad27.northing()).abs() > 1.);

        let back = Translator::nad27().utm_to_latlon(&nad27);
        assert_abs_diff_eq!(back.latitude(), here.latitude(), epsilon = 1e-6);
        assert_abs_diff_eq!(back.longitude(), here.longitude(), epsilon = 1e-6);
    }

    #[test]
    fn translator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translator>();
    }
}
