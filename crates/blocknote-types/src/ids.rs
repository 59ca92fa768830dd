//! Typed block identifier.
//!
//! `BlockId` wraps a UUIDv7 (time-ordered, globally unique), so ids minted in
//! one session never collide with each other or with ids minted elsewhere.
//! It displays as standard UUID text for logging; the `short()` form (first
//! 8 hex chars) is for human-facing output and is never used as a lookup key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypeError;

/// A block identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

impl BlockId {
    /// Create a new time-ordered ID (UUIDv7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters, for display only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// Full 32-character hex string (no hyphens).
    pub fn to_hex(&self) -> String {
        self.0.as_simple().to_string()
    }

    /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| TypeError::InvalidId {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for BlockId {
    fn from(u: uuid::Uuid) -> Self {
        Self(u)
    }
}

impl From<BlockId> for uuid::Uuid {
    fn from(id: BlockId) -> uuid::Uuid {
        id.0
    }
}

impl FromStr for BlockId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full UUID with hyphens for log readability
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.short())
    }
}
