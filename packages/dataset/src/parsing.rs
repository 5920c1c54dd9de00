//! Cell-level parsing used by the normalization pass.

use car_map_car_models::LngLat;

/// Parses the leading integer of `s`.
///
/// Leading whitespace and a single `+`/`-` sign are accepted, then the
/// longest run of ASCII digits is read and anything after it ignored, so
/// `"1995.0"` yields `1995` and `"12 mpg"` yields `12`. Returns `None` when
/// no digit follows the optional sign or the digits overflow an `i64`.
#[must_use]
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a coordinate pair from optional `lat`/`lng` cells.
///
/// Returns `None` if either cell is missing, blank, not a number, or not
/// finite.
#[must_use]
pub fn parse_lng_lat(lat: Option<&str>, lng: Option<&str>) -> Option<LngLat> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    Some(LngLat::new(longitude, latitude))
}
