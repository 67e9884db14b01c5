use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize, de};

const SUFFIX: &str = " mins";

/// Movie running time in whole minutes.
///
/// Exchanged as a string like `"102 mins"` and stored as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Runtime(i32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeFormatError {
    #[error("invalid runtime format, expected a string like \"102 mins\"")]
    InvalidFormat,
    #[error("runtime must not be negative")]
    Negative,
}

impl Runtime {
    pub fn new(minutes: i32) -> Self {
        Runtime(minutes)
    }

    pub fn minutes(self) -> i32 {
        self.0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

impl Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0, SUFFIX)
    }
}

impl FromStr for Runtime {
    type Err = RuntimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .strip_suffix(SUFFIX)
            .ok_or(RuntimeFormatError::InvalidFormat)?;
        if let Some(digits) = number.strip_prefix('-') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RuntimeFormatError::Negative);
            }
        }
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RuntimeFormatError::InvalidFormat);
        }
        let minutes: i32 = number
            .parse()
            .map_err(|_| RuntimeFormatError::InvalidFormat)?;
        Ok(Runtime(minutes))
    }
}

impl Serialize for Runtime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

struct RuntimeVisitor;

impl<'de> de::Visitor<'de> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string like \"102 mins\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom(RuntimeFormatError::InvalidFormat))
    }

    fn visit_i64<E>(self, _v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom(RuntimeFormatError::InvalidFormat))
    }

    fn visit_u64<E>(self, _v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom(RuntimeFormatError::InvalidFormat))
    }

    fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom(RuntimeFormatError::InvalidFormat))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom(RuntimeFormatError::InvalidFormat))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        Err(de::Error::custom(RuntimeFormatError::InvalidFormat))
    }

    fn visit_map<A>(self, _map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        Err(de::Error::custom(RuntimeFormatError::InvalidFormat))
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Non string input must reach the visitor to be reported as a format error
        deserializer.deserialize_any(RuntimeVisitor)
    }
}
