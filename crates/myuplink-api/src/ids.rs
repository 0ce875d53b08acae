// ── Identifier newtypes ──
//
// myUplink returns system and device ids as opaque strings. Parameter and
// zone ids are integers, but some firmware reports them as JSON strings, so
// they deserialize from either shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ── String ids ──────────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }
    };
}

string_id! {
    /// Identifier of an account-owned installation.
    SystemId
}

string_id! {
    /// Identifier of a physical unit, e.g. `"emmy-r-12345-20230101-..."`.
    DeviceId
}

// ── Integer ids ─────────────────────────────────────────────────────

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                crate::models::de::int_or_string(deserializer).map(Self)
            }
        }
    };
}

int_id! {
    /// Numeric id of a data point, unique within a device.
    ParameterId
}

int_id! {
    /// Numeric id of a smart-home zone, scoped to its device.
    ZoneId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parameter_id_accepts_number_or_string() {
        let from_num: ParameterId = serde_json::from_str("40004").unwrap();
        let from_str: ParameterId = serde_json::from_str("\"40004\"").unwrap();
        assert_eq!(from_num, ParameterId::new(40004));
        assert_eq!(from_num, from_str);
    }

    #[test]
    fn parameter_id_rejects_garbage() {
        assert!(serde_json::from_str::<ParameterId>("\"abc\"").is_err());
    }

    #[test]
    fn string_ids_roundtrip_as_plain_strings() {
        let id = DeviceId::from("emmy-r-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"emmy-r-1\"");
        assert_eq!(id.to_string(), "emmy-r-1");
    }
}
