use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a moderated content row.
///
/// The wire codes order states by how close they are to retirement; they
/// exist for storage and display. Transition legality comes from the
/// transition table, never from comparing codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Drafted,
    Submitted,
    Rejected,
    Approved,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn code(&self) -> i16 {
        match self {
            ContentStatus::Drafted => 5,
            ContentStatus::Submitted => 4,
            ContentStatus::Rejected => 3,
            ContentStatus::Approved => 2,
            ContentStatus::Published => 1,
            ContentStatus::Archived => 0,
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContentStatus::Drafted => "drafted",
            ContentStatus::Submitted => "submitted",
            ContentStatus::Rejected => "rejected",
            ContentStatus::Approved => "approved",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownStatusCode(pub i16);

impl fmt::Display for UnknownStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown content status code {}", self.0)
    }
}

impl std::error::Error for UnknownStatusCode {}

impl TryFrom<i16> for ContentStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            5 => Ok(ContentStatus::Drafted),
            4 => Ok(ContentStatus::Submitted),
            3 => Ok(ContentStatus::Rejected),
            2 => Ok(ContentStatus::Approved),
            1 => Ok(ContentStatus::Published),
            0 => Ok(ContentStatus::Archived),
            other => Err(UnknownStatusCode(other)),
        }
    }
}
