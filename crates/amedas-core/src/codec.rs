//! Provider snapshot key encoding
//!
//! Map data files are named by a 14-digit `YYYYMMDDhhmmss` key. The key is
//! taken straight from the timestamp's wall-clock fields in its own offset;
//! no alignment to a publication boundary happens here.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;

/// Number of digits copied from the timestamp (year through minute)
const KEY_PREFIX_DIGITS: usize = 12;

/// Seconds field, the provider only publishes on whole minutes
const KEY_SECONDS: &str = "00";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid timestamp '{input}': {source}")]
    InvalidTimestamp {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Fixed-width key used to address one snapshot file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProviderKey(String);

impl ProviderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode a timestamp into the provider's key format
pub fn encode(timestamp: &DateTime<FixedOffset>) -> ProviderKey {
    let canonical = timestamp.to_rfc3339();
    let mut key: String = canonical
        .chars()
        .filter(char::is_ascii_digit)
        .take(KEY_PREFIX_DIGITS)
        .collect();
    key.push_str(KEY_SECONDS);
    ProviderKey(key)
}

/// Parse an RFC 3339 timestamp and encode it
pub fn encode_str(input: &str) -> Result<ProviderKey, CodecError> {
    let timestamp =
        DateTime::parse_from_rfc3339(input.trim()).map_err(|source| CodecError::InvalidTimestamp {
            input: input.to_string(),
            source,
        })?;
    Ok(encode(&timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_encode_reference_timestamp() {
        let key = encode_str("2025-07-06T15:20:00+09:00").unwrap();
        insta::assert_snapshot!(key.as_str(), @"20250706152000");
    }

    #[test]
    fn test_seconds_and_fraction_dropped() {
        let key = encode_str("2025-07-06T15:20:47.123+09:00").unwrap();
        assert_eq!(key.as_str(), "20250706152000");
    }

    #[test]
    fn test_no_boundary_rounding() {
        // 15:23 is not a publication minute, but the codec does not care
        let key = encode_str("2025-07-06T15:23:00+09:00").unwrap();
        assert_eq!(key.as_str(), "20250706152300");
    }

    #[test]
    fn test_offset_digits_not_leaked() {
        let key = encode_str("2025-01-02T03:04:00Z").unwrap();
        assert_eq!(key.as_str(), "20250102030400");
        let key = encode_str("2025-01-02T03:04:00-05:30").unwrap();
        assert_eq!(key.as_str(), "20250102030400");
    }

    #[test]
    fn test_always_fourteen_digits() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let mut ts = jst.with_ymd_and_hms(1999, 12, 31, 23, 50, 0).unwrap();
        for _ in 0..500 {
            let key = encode(&ts);
            assert_eq!(key.as_str().len(), 14, "{key}");
            assert!(key.as_str().bytes().all(|b| b.is_ascii_digit()), "{key}");
            ts += Duration::minutes(731);
        }
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = encode_str("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
