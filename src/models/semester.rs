use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Six digit year+term code, e.g. `202508`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SemesterId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSemesterId(pub String);

impl fmt::Display for InvalidSemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a six digit semester id: {}", self.0)
    }
}

impl std::error::Error for InvalidSemesterId {}

impl SemesterId {
    pub const MIN: u32 = 100_000;
    pub const MAX: u32 = 999_999;

    /// Floor used when no semester is marked active.
    pub const BASELINE: SemesterId = SemesterId(202508);

    pub fn new(value: u32) -> Result<Self, InvalidSemesterId> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidSemesterId(value.to_string()))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SemesterId {
    type Error = InvalidSemesterId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for SemesterId {
    type Error = InvalidSemesterId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| InvalidSemesterId(value.to_string()))
            .and_then(Self::new)
    }
}

impl From<SemesterId> for u32 {
    fn from(id: SemesterId) -> Self {
        id.0
    }
}

impl FromStr for SemesterId {
    type Err = InvalidSemesterId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSemesterId(s.to_string()));
        }
        s.parse::<u32>()
            .map_err(|_| InvalidSemesterId(s.to_string()))
            .and_then(Self::new)
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata record for one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    #[serde(rename = "_id")]
    pub id: SemesterId,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestSemester {
    pub latest: String,
}

impl From<SemesterId> for LatestSemester {
    fn from(id: SemesterId) -> Self {
        Self {
            latest: id.to_string(),
        }
    }
}
