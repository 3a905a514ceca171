//! Snowflake IDs.
//!
//! Discord transmits IDs as decimal strings in JSON (they exceed the safe
//! integer range of some JSON consumers), but tooling and config files often
//! write them as plain integers. `Snowflake` accepts both on the way in and
//! always serializes as a string, matching what the API itself emits.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Milliseconds of the Discord epoch (2015-01-01T00:00:00Z).
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// A Discord snowflake ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Create a snowflake from its raw integer value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The creation time encoded in the snowflake's upper 42 bits.
    pub fn timestamp(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(((self.0 >> 22) + DISCORD_EPOCH_MS) as i64)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for Snowflake {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = Snowflake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a string or integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Snowflake(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Snowflake)
            .map_err(|_| E::custom(format!("snowflake out of range: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::custom(format!("invalid snowflake: {v:?}")))
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_string_and_integer() {
        let from_str: Snowflake = serde_json::from_str(r#""786008729715212338""#).unwrap();
        let from_int: Snowflake = serde_json::from_str("786008729715212338").unwrap();
        assert_eq!(from_str, from_int);
        assert_eq!(from_str.get(), 786_008_729_715_212_338);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Snowflake::new(42)).unwrap();
        assert_eq!(json, r#""42""#);
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Snowflake>(r#""not-a-number""#).is_err());
    }

    #[test]
    fn timestamp_from_known_snowflake() {
        // 2020-12-09, taken from a real interaction payload.
        let ts = Snowflake::new(786_008_729_715_212_338).timestamp().unwrap();
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2020-12-09");
    }
}
