//! Process identifiers as stored in the pid record.

use std::fmt;
use std::str::FromStr;

/// A positive process identifier.
///
/// Zero and values above `i32::MAX` are unrepresentable: `kill(2)` treats
/// them as process-group selectors, and a corrupt record must never turn
/// into a signal sent to a whole group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(u32);

impl Pid {
    /// Largest pid accepted.
    pub const MAX: u32 = i32::MAX as u32;

    /// Wrap a raw pid, rejecting values that are not a single process.
    pub fn new(raw: u32) -> Result<Self, InvalidPid> {
        if raw == 0 || raw > Self::MAX {
            return Err(InvalidPid::OutOfRange(raw.to_string()));
        }
        Ok(Self(raw))
    }

    /// The pid of the calling process.
    pub fn current() -> Self {
        Self(std::process::id())
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Pid {
    type Error = InvalidPid;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl FromStr for Pid {
    type Err = InvalidPid;

    /// Parse the textual form written to the record; surrounding
    /// whitespace (the trailing newline) is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidPid::Empty);
        }
        if trimmed.starts_with('+') {
            return Err(InvalidPid::NotANumber(trimmed.to_string()));
        }
        let raw: u64 = trimmed
            .parse()
            .map_err(|_| InvalidPid::NotANumber(trimmed.to_string()))?;
        if raw == 0 || raw > u64::from(Self::MAX) {
            return Err(InvalidPid::OutOfRange(trimmed.to_string()));
        }
        Ok(Self(raw as u32))
    }
}

/// Why a string or integer is not a usable pid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPid {
    #[error("empty pid")]
    Empty,

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("pid out of range: {0}")]
    OutOfRange(String),
}
