//! Price feed types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two feeds an update arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Fast, presumed-authoritative feed
    Bank,
    /// Slower feed expected to corroborate the bank
    Company,
}

impl FeedKind {
    /// The feed on the other side of the comparison
    pub fn counterpart(&self) -> Self {
        match self {
            FeedKind::Bank => FeedKind::Company,
            FeedKind::Company => FeedKind::Bank,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Bank => "bank",
            FeedKind::Company => "company",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
