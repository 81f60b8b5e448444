//! The 100km grid square lettering shared by USNG and MGRS.
//!
//! Columns cycle through 8 letters and rows through 20. Which alphabets a
//! zone uses repeats every 6 zones.

use num::Integer;

use crate::{
    ThisOrThat,
    constants::{BLOCK_SIZE, GRID_COL_PERIOD, GRID_ROW_PERIOD, UTM_FALSE_EASTING},
    utm::LATITUDE_BANDS,
};

const COLUMN_LETTERS: [&str; 3] = ["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
const ROW_LETTERS_ODD: &str = "ABCDEFGHJKLMNPQRSTUV";
const ROW_LETTERS_EVEN: &str = "FGHJKLMNPQRSTUVABCDE";

/// Column letters grouped by their distance from the zone's west edge, in
/// units of 100km. Index 0 is never used.
const EASTING_LETTERS: [&str; 9] = ["", "AJS", "BKT", "CLU", "DMV", "ENW", "FPX", "GQY", "HRZ"];

/// Lowest northing in each latitude band (C..X), in millions of meters, modulo
/// the 2,000,000m period of the row letters.
const BAND_BASE_NORTHING: [f64; 20] = [
    1.1, 2.0, 2.8, 3.7, 4.6, 5.5, 6.4, 7.3, 8.2, 9.1, 0.0, 0.8, 1.7, 2.6, 3.5, 4.4, 5.3, 6.2, 7.0, 7.9,
];

/// Meters added to a band's base northing to land roughly mid-band.
const BAND_MIDPOINT_OFFSET: f64 = 499_600.;

/// Northing period of the row letters.
const ROW_CYCLE: f64 = 2_000_000.;

/// Zone set in `[1, 6]`.
pub(crate) fn zone_set(zone: i32) -> i32 {
    let set = zone.mod_floor(&6);
    (set == 0).ternary(6, set)
}

fn column_letters(zone: i32) -> &'static str {
    // Sets 1 and 4 share an alphabet, as do 2 and 5, and 3 and 6
    #[allow(clippy::cast_sign_loss)]
    let idx = ((zone_set(zone) - 1) % 3) as usize;
    COLUMN_LETTERS[idx]
}

fn row_letters(zone: i32) -> &'static str {
    zone.is_odd().ternary(ROW_LETTERS_ODD, ROW_LETTERS_EVEN)
}

/// Whether `letter` is a legal column letter in `zone`.
pub(crate) fn is_column_letter(zone: i32, letter: char) -> bool {
    column_letters(zone).contains(letter)
}

/// Two-letter 100km square identifier for a UTM easting/northing (northing
/// false-northed in the south).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn grid_letters(zone: i32, easting: f64, northing: f64) -> (char, char) {
    let north = northing.round() as i64;
    let east = easting.round() as i64;

    let row = (1 + Integer::div_floor(&north, &BLOCK_SIZE)).mod_floor(&GRID_ROW_PERIOD);
    let col = Integer::div_floor(&east, &BLOCK_SIZE).mod_floor(&GRID_COL_PERIOD);

    // Row and column 0 wrap around to the last letter
    let row = (row == 0).ternary(GRID_ROW_PERIOD - 1, row - 1);
    let col = (col == 0).ternary(GRID_COL_PERIOD - 1, col - 1);

    let column = column_letters(zone).as_bytes()[col as usize];
    let row = row_letters(zone).as_bytes()[row as usize];

    (char::from(column), char::from(row))
}

/// Base northing of a latitude band, in meters.
fn band_base(band: char) -> Option<f64> {
    LATITUDE_BANDS
        .find(band)
        .map(|idx| BAND_BASE_NORTHING[idx] * 1_000_000.)
}

/// South-west corner of a 100km square as a UTM easting/northing, or, with
/// no row letter, a point halfway up the latitude band.
///
/// `east`/`north` are the USNG digits and `divisor` the meters per digit
/// unit. Returns `None` for a band outside C..X.
pub(crate) fn grid_origin(
    zone: i32,
    band: char,
    letters: Option<(char, char)>,
    east: i64,
    north: i64,
    divisor: i64,
) -> Option<(f64, f64)> {
    let base = band_base(band)?;

    let Some((column, row)) = letters else {
        return Some((UTM_FALSE_EASTING, base + BAND_MIDPOINT_OFFSET));
    };

    let col_idx = EASTING_LETTERS
        .iter()
        .position(|set| set.contains(column))?;
    #[allow(clippy::cast_precision_loss)]
    let easting = (col_idx as f64) * BLOCK_SIZE as f64 + (east * divisor) as f64;

    #[allow(clippy::cast_precision_loss)]
    let mut northing = row_letters(zone).find(row)? as f64 * BLOCK_SIZE as f64;
    while northing < base {
        northing += ROW_CYCLE;
    }
    #[allow(clippy::cast_precision_loss)]
    let northing = northing + (north * divisor) as f64;

    Some((easting, northing))
}
