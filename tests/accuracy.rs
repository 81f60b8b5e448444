use approx::assert_abs_diff_eq;
use rstest::rstest;
use usngconv::{CoordinatePrecision, LatLon, Translator};

/// Points spread over the UTM latitudes, kept off zone and band edges.
fn utm_grid() -> impl Iterator<Item = LatLon> {
    (-79..72).step_by(3).flat_map(|lat| {
        (-180..180).step_by(7).map(move |lon| {
            LatLon::create(f64::from(lat) + 0.37, f64::from(lon) + 0.61).unwrap()
        })
    })
}

fn lon_diff(a: f64, b: f64) -> f64 {
    ((a - b + 540.0) % 360.0 - 180.0).abs()
}

#[rstest]
#[case(Translator::nad83())]
#[case(Translator::nad27())]
fn utm_round_trip(#[case] translator: Translator) {
    let mut worst: f64 = 0.0;

    for point in utm_grid() {
        let utm = translator.to_utm(&point).unwrap();
        let back = translator.utm_to_latlon(&utm);

        let again = translator.to_utm(&back).unwrap();
        assert_eq!(again.zone(), utm.zone());
        assert_abs_diff_eq!(again.easting(), utm.easting(), epsilon = 1e-3);
        assert_abs_diff_eq!(again.northing(), utm.northing(), epsilon = 1e-3);

        worst = worst
            .max((back.latitude() - point.latitude()).abs())
            .max(lon_diff(back.longitude(), point.longitude()));
    }

    // About 0.1m on the ground
    assert!(worst < 1e-6, "worst round trip error {worst} degrees");
}

#[test]
fn usng_one_meter_round_trip() {
    let translator = Translator::default();

    for point in utm_grid() {
        let usng = translator.to_usng(&point, CoordinatePrecision::OneMeter).unwrap();
        let parsed = translator.parse_usng_string(&usng.to_string()).unwrap();
        assert_eq!(parsed, usng);

        // The decoded south-west corner is within a cell diagonal
        let corner = translator.usng_to_latlon(&parsed).unwrap();
        let distance = corner.haversine(&point);
        assert!(distance < 1.5, "{usng} is {distance}m from {point}");
        assert_eq!(translator.to_usng(&corner, CoordinatePrecision::OneMeter).unwrap(), usng);
    }
}

#[test]
fn usng_cells_surround_their_point() {
    let translator = Translator::default();

    for point in utm_grid().step_by(11) {
        let usng = translator.to_usng(&point, CoordinatePrecision::OneHundredMeters).unwrap();
        let bbox = translator.usng_to_bounding_box(&usng).unwrap();

        let centre = LatLon::create(
            (bbox.north() + bbox.south()) / 2.0,
            (bbox.east() + bbox.west()) / 2.0,
        )
        .unwrap();
        let distance = centre.haversine(&point);
        assert!(distance < 75.0, "{point} is {distance}m from the centre of {usng}");
    }
}

#[rstest]
#[case(84.0)]
#[case(85.5)]
#[case(88.0)]
#[case(-80.0)]
#[case(-82.0)]
#[case(-89.5)]
fn ups_round_trip(#[case] lat: f64) {
    let translator = Translator::default();

    for lon in (-180..180).step_by(15) {
        let point = LatLon::create(lat, f64::from(lon)).unwrap();
        let ups = translator.to_ups(&point).unwrap();
        let back = translator.ups_to_latlon(&ups);

        assert_abs_diff_eq!(back.latitude(), lat, epsilon = 1e-9);
        assert!(lon_diff(back.longitude(), point.longitude()) < 1e-9, "{point} came back as {back}");
    }
}

#[test]
fn seam_points_have_both_projections() {
    let translator = Translator::default();
    let point = LatLon::create(83.8, 20.0).unwrap();

    let utm = translator.to_utm(&point).unwrap();
    let ups = translator.to_ups(&point).unwrap();
    let from_utm = translator.utm_to_latlon(&utm);
    let from_ups = translator.ups_to_latlon(&ups);

    assert!(from_utm.haversine(&from_ups) < 0.01);
}
