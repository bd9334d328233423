//! Small value types shared by the core client and the object adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Verbosity selector accepted by `show` style endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailsLevel {
    /// Only object UIDs
    Uid,
    /// The server default
    Standard,
    /// Every field
    Full,
}

impl DetailsLevel {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uid => "uid",
            Self::Standard => "standard",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for DetailsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailsLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "uid" => Ok(Self::Uid),
            "standard" => Ok(Self::Standard),
            "full" => Ok(Self::Full),
            _ => Err(Error::ValidationError(format!("Unknown details level: {s}"))),
        }
    }
}

impl From<DetailsLevel> for serde_json::Value {
    fn from(level: DetailsLevel) -> Self {
        Self::String(level.as_str().to_string())
    }
}
