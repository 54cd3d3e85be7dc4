//! Explicit authority context.
//!
//! Which side of the connection is canonical is threaded through every
//! mutating operation as a plain [`NetRole`] value rather than queried from
//! ambient state, so tests can simulate both sides within one process.

use core::fmt;

/// The side a call executes on.
///
/// Exactly one side holds [`NetRole::Authority`] for a given container; all
/// canonical mutations originate there. Every other side is
/// [`NetRole::Remote`] and holds a read-only mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetRole {
    Authority,
    Remote,
}

impl NetRole {
    pub const fn is_authoritative(self) -> bool {
        matches!(self, NetRole::Authority)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetRole::Authority => "authority",
            NetRole::Remote => "remote",
        }
    }
}

impl fmt::Display for NetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
