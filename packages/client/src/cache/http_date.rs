//! HTTP date parsing following RFC 7231
//!
//! Used for `Retry-After` headers carrying an HTTP-date instead of a
//! seconds count.

/// HTTP date parsing error types
#[derive(Debug, Clone)]
pub enum HttpDateParseError {
    /// Date format was not recognized by any of the supported parsers
    UnrecognizedFormat(String),
    /// Date was parsed but represents a time before Unix epoch
    InvalidTimestamp(String),
}

impl std::fmt::Display for HttpDateParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpDateParseError::UnrecognizedFormat(date) => {
                write!(f, "Unrecognized HTTP date format: {}", date)
            }
            HttpDateParseError::InvalidTimestamp(date) => {
                write!(f, "Invalid timestamp in HTTP date: {}", date)
            }
        }
    }
}

impl std::error::Error for HttpDateParseError {}

/// HTTP date parsing utilities
pub mod httpdate {
    use std::time::{Duration, SystemTime};

    use chrono::{DateTime, NaiveDateTime};

    use super::HttpDateParseError;

    /// Parse an HTTP date string into `SystemTime` following RFC 7231.
    ///
    /// # Errors
    ///
    /// Returns an error when no supported format matches or the date is
    /// before the Unix epoch.
    pub fn parse_http_date(date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        // RFC 7231 Section 7.1.1.1: HTTP-date format preferences
        // 1. IMF-fixdate (preferred): "Sun, 06 Nov 1994 08:49:37 GMT"
        // 2. RFC 850 format: "Sunday, 06-Nov-94 08:49:37 GMT"
        // 3. ANSI C asctime() format: "Sun Nov  6 08:49:37 1994"

        // IMF-fixdate and RFC 850 carry a literal GMT zone
        for format in ["%a, %d %b %Y %H:%M:%S GMT", "%A, %d-%b-%y %H:%M:%S GMT"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
                return epoch_time(dt.and_utc().timestamp(), date_str);
            }
        }

        // ANSI C asctime() format (no timezone, assume GMT)
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a %b %e %H:%M:%S %Y") {
            return epoch_time(dt.and_utc().timestamp(), date_str);
        }

        // RFC 2822 as a fallback (numeric offsets)
        if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
            return epoch_time(dt.timestamp(), date_str);
        }

        Err(HttpDateParseError::UnrecognizedFormat(date_str.to_string()))
    }

    fn epoch_time(timestamp: i64, date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        if timestamp < 0 {
            return Err(HttpDateParseError::InvalidTimestamp(date_str.to_string()));
        }
        Ok(SystemTime::UNIX_EPOCH + Duration::from_secs(timestamp as u64))
    }

    /// Format `SystemTime` as an RFC 7231 IMF-fixdate string.
    #[must_use]
    pub fn fmt_http_date(time: SystemTime) -> String {
        use chrono::Utc;

        let duration = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();

        let dt = DateTime::<Utc>::from_timestamp(duration.as_secs() as i64, 0).unwrap_or_default();

        dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::httpdate::{fmt_http_date, parse_http_date};

    #[test]
    fn parses_imf_fixdate() {
        let time = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        let secs = time
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert_eq!(secs, 784_111_777);
    }

    #[test]
    fn round_trips_through_formatter() {
        let original = "Sun, 06 Nov 1994 08:49:37 GMT";
        let time = parse_http_date(original).unwrap();
        assert_eq!(fmt_http_date(time), original);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_http_date("next tuesday-ish").is_err());
    }
}
