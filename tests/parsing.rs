use approx::assert_abs_diff_eq;
use rstest::rstest;
use usngconv::{
    CoordinatePrecision, Hemisphere, LatLon, Translator, UpsCoordinate, UsngCoordinate, UtmCoordinate, UtmUps,
};

#[rstest]
#[case("5Q KB 42785 31517")]
#[case("5QKB4278531517")]
#[case("5q kb 42785 31517")]
fn usng_and_mgrs_strings_agree(#[case] value: &str) {
    let translator = Translator::default();
    let parsed: UsngCoordinate = usngconv::from_str(value).unwrap();

    assert_eq!(parsed, translator.parse_usng_string("5Q KB 42785 31517").unwrap());
    assert_eq!(parsed, translator.parse_mgrs_string("5QKB4278531517").unwrap());
    assert_eq!(parsed.precision(), CoordinatePrecision::OneMeter);
}

#[rstest]
#[case("5 000001 2199600 N", None, Hemisphere::North)]
#[case("5 000001 2199600 S", None, Hemisphere::South)]
#[case("5Q 000001 2199600", Some('Q'), Hemisphere::North)]
#[case("5Q 000001mE 2199600mN N", Some('Q'), Hemisphere::North)]
fn utm_strings_parse(#[case] value: &str, #[case] band: Option<char>, #[case] hemisphere: Hemisphere) {
    let utm = Translator::default().parse_utm_string(value).unwrap();

    assert_eq!(utm.zone(), 5);
    assert_eq!(utm.latitude_band(), band);
    assert_eq!(utm.hemisphere(), hemisphere);
    assert_abs_diff_eq!(utm.easting(), 1.0);
    assert_abs_diff_eq!(utm.northing(), 2_199_600.0);
}

#[rstest]
#[case("5Q")]
#[case("5Q KB 42785 31517")]
#[case("5 000001 2199600")]
#[case("5Z 000001 2199600")]
#[case("L 000001 2199600")]
#[case("B 2029070mE 2554696mN")]
fn utm_strings_reject(#[case] value: &str) {
    let err = Translator::default().parse_utm_string(value).unwrap_err();
    assert!(err.is_format_error(), "{value}: {err}");
}

#[test]
fn utm_out_of_range_is_a_domain_error() {
    let translator = Translator::default();
    assert!(translator.parse_utm_string("61N 1 1").unwrap_err().is_domain_error());
    assert!(translator.parse_utm_string("5Q 3200001 1").unwrap_err().is_domain_error());
    assert!(translator.parse_utm_string("5Q 1 10000001").unwrap_err().is_domain_error());
}

#[test]
fn utm_ups_create_errors() {
    assert!(UtmUps::create(66, Some('M'), None, 1.0, 1.0).unwrap_err().is_domain_error());
    assert!(UtmUps::create(0, Some('I'), None, 1.0, 1.0).unwrap_err().is_format_error());
    assert!(UtmUps::create(0, None, None, 1.0, 1.0).unwrap_err().is_format_error());
}

#[test]
fn ups_strings_parse() {
    let ups: UpsCoordinate = usngconv::from_str("A 1607232mE 2392767mN").unwrap();
    assert_eq!(ups.latitude_band(), 'A');
    assert_eq!(ups.hemisphere(), Hemisphere::South);

    // A zone 0 string with only a hemisphere gets its band from the easting
    let generic = UtmUps::parse_str("0 1607232 2392767 S").unwrap();
    assert_eq!(UpsCoordinate::try_from(generic).unwrap(), ups);

    assert!(UpsCoordinate::parse_str("0 1607232 2392767 S").unwrap_err().is_format_error());
    assert!(UpsCoordinate::parse_str("5Q 1 2").unwrap_err().is_format_error());
    assert!(UpsCoordinate::parse_str("Y 1 2 S").unwrap_err().is_format_error());
}

#[rstest]
#[case("18S 323487 4306483")]
#[case("21H 341475 6168016")]
#[case("5 00001 2199600 N")]
fn utm_display_round_trip(#[case] value: &str) {
    let utm = UtmCoordinate::parse_str(value).unwrap();
    assert_eq!(utm.to_string(), value);
}

#[rstest]
#[case("38.8895, -77.0352", 38.8895, -77.0352)]
#[case("38.8895 -77.0352", 38.8895, -77.0352)]
#[case("-34.5,-58.5", -34.5, -58.5)]
#[case("10 190", 10.0, -170.0)]
fn latlon_strings_parse(#[case] value: &str, #[case] lat: f64, #[case] lon: f64) {
    let point: LatLon = value.parse().unwrap();
    assert_abs_diff_eq!(point.latitude(), lat);
    assert_abs_diff_eq!(point.longitude(), lon, epsilon = 1e-12);
}

#[rstest]
#[case("")]
#[case("38.8895")]
#[case("38.8895, -77.0352, 10")]
#[case("north, west")]
fn latlon_strings_reject(#[case] value: &str) {
    assert!(LatLon::parse_str(value).unwrap_err().is_format_error());
}

#[test]
fn latlon_out_of_range_is_a_domain_error() {
    assert!(LatLon::parse_str("91, 0").unwrap_err().is_domain_error());
    assert!(LatLon::parse_str("0, 361").unwrap_err().is_domain_error());
}
