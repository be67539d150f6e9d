//! Determine the runtime environment from the configured signals.

use tracing::{debug, info};

use crate::domain::environment::CI_MAIN_REF;
use crate::domain::{Environment, EnvironmentResolution, EnvironmentSignal, Settings};
use crate::ports::Git;

/// Resolve the environment by probing each signal in priority order.
///
/// Never fails: every git problem is treated as "no signal" and resolution
/// falls through to the default.
pub fn resolve_environment<G: Git + ?Sized>(settings: &Settings, git: &G) -> EnvironmentResolution {
    for signal in EnvironmentSignal::ORDER {
        if let Some(environment) = probe(signal, settings, git) {
            info!(environment = %environment, source = signal.label(), "Resolved environment");
            return EnvironmentResolution { environment, signal };
        }
    }

    let environment = Environment::default();
    info!(environment = %environment, source = EnvironmentSignal::Default.label(), "Resolved environment");
    EnvironmentResolution { environment, signal: EnvironmentSignal::Default }
}

fn probe<G: Git + ?Sized>(
    signal: EnvironmentSignal,
    settings: &Settings,
    git: &G,
) -> Option<Environment> {
    match signal {
        EnvironmentSignal::ExplicitOverride => {
            settings.environment_override.as_deref().map(Environment::parse)
        }
        EnvironmentSignal::CiMainBranch => match settings.github_ref.as_deref() {
            Some(CI_MAIN_REF) => Some(Environment::Prod),
            Some(other) => {
                debug!(github_ref = other, "GITHUB_REF does not point at main");
                None
            }
            None => None,
        },
        EnvironmentSignal::GitBranch => match git.get_current_branch() {
            Ok(branch) => {
                debug!(branch = %branch, "Detected git branch");
                Some(Environment::from_branch(&branch))
            }
            Err(e) => {
                info!(error = %e, "Git branch detection failed");
                None
            }
        },
        EnvironmentSignal::Default => Some(Environment::default()),
    }
}
