use miette::Diagnostic;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum VariablesError {
    #[error("unknown package manager: '{value}'")]
    #[diagnostic(
        code(nextstrap::variables::unknown_package_manager),
        help("Supported package managers are: npm, pnpm, yarn, bun")
    )]
    UnknownPackageManager { value: String },

    #[error("invalid project name: '{value}'")]
    #[diagnostic(
        code(nextstrap::variables::invalid_project_name),
        help("Project names must be non-empty and contain only letters, digits and hyphens")
    )]
    InvalidProjectName { value: String },
}

/// Dependency installation tool the generated project is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}
impl PackageManager {
    pub const ALL: [PackageManager; 4] = [Self::Npm, Self::Pnpm, Self::Yarn, Self::Bun];

    /// Name of the executable, also the identifier accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    pub fn install_command(&self) -> String {
        format!("{} install", self.as_str())
    }

    /// Command that starts the development server.
    pub fn run_command(&self) -> String {
        self.run_script("dev")
    }

    /// Command that runs an arbitrary `package.json` script.
    ///
    /// npm and bun go through `run`, except `bun dev` which bun resolves on its own.
    pub fn run_script(&self, script: &str) -> String {
        match self {
            Self::Npm => format!("npm run {}", script),
            Self::Pnpm => format!("pnpm {}", script),
            Self::Yarn => format!("yarn {}", script),
            Self::Bun if script == "dev" => "bun dev".to_string(),
            Self::Bun => format!("bun run {}", script),
        }
    }

    /// Command used to execute a package binary without installing it.
    pub fn exec_command(&self) -> &'static str {
        match self {
            Self::Npm => "npx",
            Self::Pnpm => "pnpm dlx",
            Self::Yarn => "yarn dlx",
            Self::Bun => "bunx",
        }
    }
}
impl FromStr for PackageManager {
    type Err = VariablesError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            _ => Err(VariablesError::UnknownPackageManager {
                value: value.to_string(),
            }),
        }
    }
}
impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A project name restricted to letters, digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);
impl ProjectName {
    pub fn parse(value: &str) -> Result<Self, VariablesError> {
        lazy_static::lazy_static! {
            static ref PROJECT_NAME_REGEX: regex::Regex =
                regex::Regex::new(r"^[a-zA-Z0-9-]+$").expect("a valid regex pattern");
        }

        if PROJECT_NAME_REGEX.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(VariablesError::InvalidProjectName {
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Values substituted into the generated project. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariables {
    pub project_name: ProjectName,
    pub package_manager: PackageManager,
}
impl TemplateVariables {
    pub fn new(project_name: ProjectName, package_manager: PackageManager) -> Self {
        Self {
            project_name,
            package_manager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_commands_are_total_and_distinct() {
        let installs: Vec<String> = PackageManager::ALL
            .iter()
            .map(|pm| pm.install_command())
            .collect();
        let runs: Vec<String> = PackageManager::ALL
            .iter()
            .map(|pm| pm.run_command())
            .collect();

        assert_eq!(
            installs,
            vec!["npm install", "pnpm install", "yarn install", "bun install"]
        );
        assert_eq!(runs, vec!["npm run dev", "pnpm dev", "yarn dev", "bun dev"]);
    }

    #[test]
    fn test_run_script() {
        assert_eq!(PackageManager::Npm.run_script("lint"), "npm run lint");
        assert_eq!(PackageManager::Pnpm.run_script("lint"), "pnpm lint");
        assert_eq!(PackageManager::Yarn.run_script("lint"), "yarn lint");
        assert_eq!(PackageManager::Bun.run_script("lint"), "bun run lint");
    }

    #[test]
    fn test_package_manager_from_str() {
        assert_eq!("pnpm".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert_eq!(" Bun ".parse::<PackageManager>(), Ok(PackageManager::Bun));
        assert_eq!(
            "cargo".parse::<PackageManager>(),
            Err(VariablesError::UnknownPackageManager {
                value: "cargo".to_string()
            })
        );
        assert!("".parse::<PackageManager>().is_err());
    }

    #[test]
    fn test_package_manager_display_round_trips() {
        for pm in PackageManager::ALL {
            assert_eq!(pm.to_string().parse::<PackageManager>(), Ok(pm));
        }
    }

    #[test]
    fn test_project_name_validation() {
        assert!(ProjectName::parse("demo-app").is_ok());
        assert!(ProjectName::parse("App2").is_ok());
        assert!(ProjectName::parse("").is_err());
        assert!(ProjectName::parse("demo app").is_err());
        assert!(ProjectName::parse("demo_app").is_err());
        assert!(ProjectName::parse("../escape").is_err());
        assert!(ProjectName::parse("{{PROJECT_NAME}}").is_err());
    }
}
