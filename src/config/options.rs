//! Options for the preallocation pass.
//!
//! This module provides the `PreallocOptions` struct, which selects the row
//! counting policy and how the preallocated matrix reacts to insertions beyond
//! its reservation. Policies can be named by string (`distinct`, `halved`,
//! `boundary`) so callers can forward them from their own option database.

use crate::error::PreallocError;
use std::fmt;
use std::str::FromStr;

/// Row counting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreallocPolicy {
    /// Count each distinct neighbour of a row exactly once.
    #[default]
    Distinct,
    /// Accumulate element and segment pairs from both directions, then halve.
    Halved,
    /// Serial estimate from node boundary types and element incidence.
    BoundaryType,
}

impl PreallocPolicy {
    pub fn name(self) -> &'static str {
        match self {
            PreallocPolicy::Distinct => "distinct",
            PreallocPolicy::Halved => "halved",
            PreallocPolicy::BoundaryType => "boundary",
        }
    }
}

impl FromStr for PreallocPolicy {
    type Err = PreallocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distinct" => Ok(PreallocPolicy::Distinct),
            "halved" => Ok(PreallocPolicy::Halved),
            "boundary" | "boundary_type" => Ok(PreallocPolicy::BoundaryType),
            other => Err(PreallocError::InvalidOption(format!(
                "unknown preallocation policy '{}' (expected distinct, halved or boundary)",
                other
            ))),
        }
    }
}

impl fmt::Display for PreallocPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Preallocation settings.
#[derive(Debug, Clone)]
pub struct PreallocOptions {
    /// Row counting policy
    pub policy: PreallocPolicy,

    /// Reject insertions that need storage beyond the reservation instead of
    /// counting them as mallocs
    pub new_nonzero_allocation_err: bool,

    /// Rank that holds the mesh before it is replicated
    pub root: usize,
}

impl Default for PreallocOptions {
    fn default() -> Self {
        PreallocOptions {
            policy: PreallocPolicy::Distinct,
            new_nonzero_allocation_err: false,
            root: 0,
        }
    }
}

impl PreallocOptions {
    pub fn with_policy(mut self, policy: PreallocPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_allocation_err(mut self, on: bool) -> Self {
        self.new_nonzero_allocation_err = on;
        self
    }
}
