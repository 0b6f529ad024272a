//! Agent kinds known to the runner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Kind of agent a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentType {
    /// Extracts documents for a user. Produces no result.
    DocumentExtractor,
    /// Checks a user against policy. Produces `approved` or `rejected`.
    PolicyChecker,
}

impl AgentType {
    /// All known agent types.
    pub const ALL: [AgentType; 2] = [Self::DocumentExtractor, Self::PolicyChecker];

    /// Wire name of the agent type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentExtractor => "document-extractor",
            Self::PolicyChecker => "policy-checker",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown agent type '{}'", s)))
    }
}
