use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ids written by older exports are plain numbers (millisecond timestamps)
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "RawId", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Time-ordered, so ids issued later sort later
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<RawId> for $name {
            fn from(value: RawId) -> Self {
                Self(value.into())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(EmployeeId);
opaque_id!(AdvanceId);
opaque_id!(LocationId);
