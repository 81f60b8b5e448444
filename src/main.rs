//! Coordinate conversion tool
//!
//! Reads one coordinate in any supported notation and prints it in every
//! notation it can be expressed in.
//!
//! Usage:
//!   usngconv [--nad27] [--precision <LEVEL>] "<coordinate>"

use std::process::ExitCode;

use clap::{ArgAction, Parser};
use usngconv::{CoordinatePrecision, LatLon, Translator, UsngCoordinate, UtmUps};

type Result<T> = std::result::Result<T, usngconv::Error>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Converts between lat/lon, UTM, UPS and USNG/MGRS coordinates",
    long_about = None
)]
struct Args {
    /// Use the NAD27 (Clarke 1866) ellipsoid instead of NAD83
    #[arg(long, action = ArgAction::SetTrue)]
    nad27: bool,

    /// USNG digits per axis, -1 for the grid zone only
    #[arg(short, long, default_value_t = 5, allow_hyphen_values = true,
          value_parser = clap::value_parser!(i32).range(-1..=5))]
    precision: i32,

    /// "lat, lon" in decimal degrees, a USNG or MGRS reference, or a UTM/UPS coordinate
    coordinate: String,
}

/// Reads the input as lat/lon, then USNG/MGRS, then UTM/UPS.
fn to_latlon(translator: &Translator, input: &str) -> Result<LatLon> {
    if let Ok(point) = LatLon::parse_str(input) {
        return Ok(point);
    }
    if let Ok(usng) = usngconv::from_str::<_, UsngCoordinate>(input) {
        return translator.usng_to_latlon(&usng);
    }

    let coord = translator.parse_utm_ups_string(input)?;
    Ok(translator.utm_ups_to_latlon(&coord))
}

fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{name:>8}: {value}");
}

fn run(args: &Args) -> Result<()> {
    let translator = if args.nad27 { Translator::nad27() } else { Translator::nad83() };
    let precision = CoordinatePrecision::try_from(args.precision)?;

    let point = to_latlon(&translator, args.coordinate.trim())?;
    print_named_value("lat/lon", point);

    let projected: UtmUps = translator.to_utm_ups(&point)?;
    print_named_value(if projected.zone() == 0 { "UPS" } else { "UTM" }, projected);

    if projected.zone() != 0 {
        let usng = translator.to_usng(&point, precision)?;
        print_named_value("USNG", usng);
        print_named_value("MGRS", usng.to_mgrs_string());
        print_named_value("bbox", translator.usng_to_bounding_box(&usng)?);
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
