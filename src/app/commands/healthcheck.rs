//! Report environment and platform information.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::{Environment, Settings};

const HOSTNAME_VAR: &str = "HOSTNAME";
const HOSTNAME_FILE: &str = "/etc/hostname";
const UNKNOWN_HOST: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub environment: Option<Environment>,
    pub host: String,
    pub version: &'static str,
    pub os_family: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

impl HealthReport {
    /// Human-readable lines, one per reported fact.
    pub fn lines(&self) -> Vec<String> {
        let environment =
            self.environment.as_ref().map_or_else(|| "None".to_string(), ToString::to_string);
        vec![
            format!("Environment = {}", environment),
            format!("Host's network name = {}", self.host),
            format!("flowdeploy version = {}", self.version),
            format!("Platform information = {}", self.os_family),
            format!("OS/Arch = {}/{} 🚀", self.os, self.arch),
        ]
    }
}

pub fn execute(settings: &Settings, env: Option<Environment>) -> HealthReport {
    let report = HealthReport {
        environment: env,
        host: host_name(settings, Path::new(HOSTNAME_FILE)),
        version: env!("CARGO_PKG_VERSION"),
        os_family: std::env::consts::FAMILY,
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
    };
    info!(host = %report.host, os = report.os, arch = report.arch, "Health check");
    report
}

fn host_name(settings: &Settings, hostname_file: &Path) -> String {
    if let Some(host) = settings.env.get(HOSTNAME_VAR) {
        return host.to_string();
    }
    fs::read_to_string(hostname_file)
        .ok()
        .map(|content| content.trim().to_string())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reports_environment_and_host_from_settings() {
        let settings = Settings::from_env_pairs([("HOSTNAME", "runner-1")]).unwrap();
        let report = execute(&settings, Some(Environment::Prod));

        assert_eq!(report.host, "runner-1");
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(report.lines()[0], "Environment = prod");
        assert!(report.lines()[4].starts_with(&format!("OS/Arch = {}/", std::env::consts::OS)));
    }

    #[test]
    fn missing_environment_prints_none() {
        let settings = Settings::from_env_pairs([("HOSTNAME", "h")]).unwrap();
        assert_eq!(execute(&settings, None).lines()[0], "Environment = None");
    }

    #[test]
    fn host_falls_back_to_hostname_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("hostname");
        fs::write(&file, "box-7\n").unwrap();
        let settings = Settings::from_env_pairs(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(host_name(&settings, &file), "box-7");
        assert_eq!(host_name(&settings, &dir.path().join("missing")), "unknown");
    }
}
