//! OFTP2 `CCYYMMDD` / `HHMMSScccc` Virtual File timestamp encoding.
//!
//! The trailing 4 digits of the time field are a sub-second counter
//! (0001-9999). This implementation derives it from nanoseconds with one
//! extra digit of resolution beyond milliseconds: `nanos / 100_000 % 10000`.

use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::DtypError;

/// Splits a UTC instant into its `(CCYYMMDD, HHMMSScccc)` string pair.
pub fn encode_timestamp(dt: OffsetDateTime) -> (String, String) {
    let dt = dt.to_offset(time::UtcOffset::UTC);
    let date = format!("{:04}{:02}{:02}", dt.year(), dt.month() as u8, dt.day());
    let counter = (dt.nanosecond() / 100_000) % 10000;
    let time = format!(
        "{:02}{:02}{:02}{:04}",
        dt.hour(),
        dt.minute(),
        dt.second(),
        counter
    );
    (date, time)
}

/// Reconstructs a UTC instant from the leading 14 digits of `date` + `time`,
/// discarding the trailing sub-second counter.
pub fn decode_timestamp(date: &str, time: &str) -> Result<OffsetDateTime, DtypError> {
    if date.len() != 8 || time.len() < 6 {
        return Err(DtypError::InvalidTimestamp);
    }
    let combined = format!("{date}{}", &time[..6]);
    let format = format_description!("[year][month][day][hour][minute][second]");
    let primitive = time::PrimitiveDateTime::parse(&combined, &format)
        .map_err(|_| DtypError::InvalidTimestamp)?;
    Ok(primitive.assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn encode_decode_roundtrip_to_the_second() {
        let dt = datetime!(2024-03-05 12:34:56 UTC);
        let (date, time) = encode_timestamp(dt);
        assert_eq!(date, "20240305");
        assert_eq!(&time[..6], "123456");
        let back = decode_timestamp(&date, &time).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(decode_timestamp("bad", "alsobad").is_err());
    }
}
