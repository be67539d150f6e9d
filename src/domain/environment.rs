//! Deployment environment model.

use std::fmt;

use serde::{Serialize, Serializer};

/// Git ref reported by CI when building the main integration branch.
pub const CI_MAIN_REF: &str = "refs/heads/main";

/// Branch name that maps to production.
pub const MAIN_BRANCH: &str = "main";

/// Logical deployment target.
///
/// Any string can be supplied through the explicit override; it is kept
/// exactly as given and only the literal `prod` is treated as production.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Prod,
    #[default]
    Dev,
    Other(String),
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value {
            "prod" => Environment::Prod,
            "dev" => Environment::Dev,
            other => Environment::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Prod => "prod",
            Environment::Dev => "dev",
            Environment::Other(value) => value,
        }
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Environment::Prod)
    }

    /// Environment implied by a source-control branch name.
    pub fn from_branch(branch: &str) -> Self {
        if branch == MAIN_BRANCH { Environment::Prod } else { Environment::Dev }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Signals consulted when resolving the environment, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentSignal {
    /// `ENVIRONMENT` variable.
    ExplicitOverride,
    /// `GITHUB_REF` pointing at the main branch.
    CiMainBranch,
    /// Current git branch.
    GitBranch,
    /// Nothing matched.
    Default,
}

impl EnvironmentSignal {
    /// Signals probed before falling back to [`EnvironmentSignal::Default`].
    pub const ORDER: [EnvironmentSignal; 3] = [
        EnvironmentSignal::ExplicitOverride,
        EnvironmentSignal::CiMainBranch,
        EnvironmentSignal::GitBranch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnvironmentSignal::ExplicitOverride => "ENVIRONMENT variable",
            EnvironmentSignal::CiMainBranch => "GitHub main branch",
            EnvironmentSignal::GitBranch => "git branch",
            EnvironmentSignal::Default => "default",
        }
    }
}

/// Outcome of environment resolution, computed once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentResolution {
    pub environment: Environment,
    pub signal: EnvironmentSignal,
}
