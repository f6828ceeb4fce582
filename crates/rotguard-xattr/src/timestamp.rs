//! Timestamp attribute encoding.

use rotguard_core::Mtime;

use crate::error::StoreError;

/// Digits of nanosecond precision in the canonical form.
const NANOS_DIGITS: usize = 9;

/// Longest fraction accepted when reading.
const MAX_FRACTION_DIGITS: usize = 10;

/// Encode `mtime` in the canonical `<seconds>.<9-digit nanoseconds>` form.
pub fn format_timestamp(mtime: Mtime) -> String {
    format!("{}.{:09}", mtime.secs, mtime.nanos)
}

/// Decode a stored timestamp.
///
/// Accepts `<seconds>` or `<seconds>.<fraction>` with a fraction of 1 to 10
/// digits. Fractions shorter than nine digits are scaled up, so `.123456`
/// means 123456000 ns. A ten digit fraction is taken as a raw nanosecond
/// count and must still be below one second.
pub fn parse_timestamp(raw: &[u8]) -> Result<Mtime, StoreError> {
    let text = std::str::from_utf8(raw).map_err(|_| StoreError::MalformedTimestamp {
        value: String::from_utf8_lossy(raw).into_owned(),
    })?;
    let malformed = || StoreError::MalformedTimestamp {
        value: text.to_string(),
    };

    let (secs, fraction) = match text.split_once('.') {
        Some((secs, fraction)) => (secs, Some(fraction)),
        None => (text, None),
    };

    if !is_digits(secs) {
        return Err(malformed());
    }
    let secs: u64 = secs.parse().map_err(|_| malformed())?;

    let nanos = match fraction {
        None => 0,
        Some(fraction) => {
            if !is_digits(fraction) || fraction.len() > MAX_FRACTION_DIGITS {
                return Err(malformed());
            }
            let mut nanos: u64 = fraction.parse().map_err(|_| malformed())?;
            for _ in fraction.len()..NANOS_DIGITS {
                nanos *= 10;
            }
            nanos
        }
    };

    u32::try_from(nanos)
        .ok()
        .and_then(|nanos| Mtime::new(secs, nanos))
        .ok_or_else(|| StoreError::NanosOutOfRange {
            value: text.to_string(),
        })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Mtime, StoreError> {
        parse_timestamp(s.as_bytes())
    }

    #[test]
    fn test_canonical() {
        assert_eq!(
            parse("1335974989.123456789").unwrap(),
            Mtime { secs: 1335974989, nanos: 123456789 }
        );
        assert_eq!(parse("0.000000000").unwrap(), Mtime::UNSET);
    }

    #[test]
    fn test_legacy_microseconds() {
        assert_eq!(
            parse("1335974989.123456").unwrap(),
            Mtime { secs: 1335974989, nanos: 123456000 }
        );
        assert_eq!(parse("7.5").unwrap(), Mtime { secs: 7, nanos: 500_000_000 });
        assert_eq!(parse("7.05").unwrap(), Mtime { secs: 7, nanos: 50_000_000 });
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(parse("1000").unwrap(), Mtime { secs: 1000, nanos: 0 });
    }

    #[test]
    fn test_ten_digit_fraction() {
        assert!(matches!(
            parse("1.1234567890"),
            Err(StoreError::NanosOutOfRange { .. })
        ));
        // Past u32::MAX as well as past one second.
        assert!(matches!(
            parse("1.9999999999"),
            Err(StoreError::NanosOutOfRange { .. })
        ));
        assert_eq!(parse("1.0123456789").unwrap(), Mtime { secs: 1, nanos: 123456789 });
    }

    #[test]
    fn test_rejects_malformed() {
        let cases = [
            "", ".5", "12.", "abc", "12.3x", "-1.5", "+1.5", " 1.5", "1.5.6", "1.12345678901",
        ];
        for bad in cases {
            assert!(
                matches!(parse(bad), Err(StoreError::MalformedTimestamp { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(parse("99999999999999999999999.0").is_err());
        assert!(parse_timestamp(&[0xff, b'.', b'1']).is_err());
    }

    #[test]
    fn test_format_pads_nanos() {
        assert_eq!(format_timestamp(Mtime { secs: 2000, nanos: 500 }), "2000.000000500");
        assert_eq!(format_timestamp(Mtime::UNSET), "0.000000000");
    }

    #[test]
    fn test_format_then_parse() {
        let mtime = Mtime { secs: 1_700_000_000, nanos: 999_999_999 };
        assert_eq!(parse(&format_timestamp(mtime)).unwrap(), mtime);
    }
}
