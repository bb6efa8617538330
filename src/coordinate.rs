//! Text encodings for GPS tags.
//!
//! Coordinates are written as a rational triplet, `"<deg>/1,<min>/1,<sec*1000>/1000,"`, with the
//! sign carried separately in a one-letter hemisphere reference. The trailing comma is part of
//! the format expected by the tag store.

use chrono::{DateTime, Local, Utc};

use crate::config::DatestampZone;
use crate::error::AppError;

pub const DATESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Encodes the magnitude of a decimal-degree value as a rational triplet.
pub fn convert_coordinate(coord: f64) -> Result<String, AppError> {
    if !coord.is_finite() {
        return Err(AppError::Conversion(format!(
            "coordinate {} is not a finite number",
            coord
        )));
    }

    let value = coord.abs();
    let degrees = value.floor();
    let remainder = (value - degrees) * 60.0;
    let minutes = remainder.floor();
    let remainder = (remainder - minutes) * 60.0;
    let seconds = (remainder * 1000.0).floor();

    Ok(format!(
        "{}/1,{}/1,{}/1000,",
        degrees as u64, minutes as u64, seconds as u64
    ))
}

pub fn latitude_ref(latitude: f64) -> &'static str {
    if latitude < 0.0 {
        "S"
    } else {
        "N"
    }
}

pub fn longitude_ref(longitude: f64) -> &'static str {
    if longitude < 0.0 {
        "W"
    } else {
        "E"
    }
}

/// Renders a millisecond Unix timestamp as a `GPSDateStamp` value in the given zone.
pub fn format_datestamp(timestamp_ms: i64, zone: DatestampZone) -> Result<String, AppError> {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        AppError::Conversion(format!("timestamp {} ms is out of range", timestamp_ms))
    })?;

    let text = match zone {
        DatestampZone::Utc => utc.format(DATESTAMP_FORMAT).to_string(),
        DatestampZone::Local => utc.with_timezone(&Local).format(DATESTAMP_FORMAT).to_string(),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_encodes_as_all_zero_triplet() {
        assert_eq!(convert_coordinate(0.0).unwrap(), "0/1,0/1,0/1000,");
    }

    #[test]
    fn sydney_latitude() {
        assert_eq!(convert_coordinate(-33.8688).unwrap(), "33/1,52/1,7680/1000,");
        assert_eq!(convert_coordinate(33.8688).unwrap(), "33/1,52/1,7680/1000,");
    }

    #[test]
    fn half_degree_is_thirty_minutes() {
        assert_eq!(convert_coordinate(45.5).unwrap(), "45/1,30/1,0/1000,");
        assert_eq!(convert_coordinate(-151.2093).unwrap(), "151/1,12/1,33480/1000,");
    }

    #[test]
    fn non_finite_input_is_a_conversion_failure() {
        assert!(matches!(
            convert_coordinate(f64::NAN),
            Err(AppError::Conversion(_))
        ));
        assert!(matches!(
            convert_coordinate(f64::NEG_INFINITY),
            Err(AppError::Conversion(_))
        ));
    }

    #[test]
    fn hemisphere_references() {
        assert_eq!(latitude_ref(-1.0), "S");
        assert_eq!(latitude_ref(0.0), "N");
        assert_eq!(latitude_ref(12.0), "N");
        assert_eq!(longitude_ref(-1.0), "W");
        assert_eq!(longitude_ref(0.0), "E");
        assert_eq!(longitude_ref(151.0), "E");
    }

    #[test]
    fn datestamp_in_utc() {
        // 2021-03-04 05:06:07.890 UTC
        let ms = 1_614_834_367_890;
        assert_eq!(
            format_datestamp(ms, DatestampZone::Utc).unwrap(),
            "2021:03:04 05:06:07"
        );
    }

    #[test]
    fn datestamp_out_of_range_fails() {
        assert!(matches!(
            format_datestamp(i64::MAX, DatestampZone::Utc),
            Err(AppError::Conversion(_))
        ));
    }
}
