//! Config module.
//! Built once at startup from the environment and shared with handlers behind an `Arc`.
//! `from_lookup` takes any key lookup so tests can inject fixtures.
//! Missing repository coordinates or tokens are tolerated here and reported per request.

use std::str::FromStr;

use crate::document::FieldTarget;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_FILE_PATH: &str = "miniApp.json";
pub const DEFAULT_GITLAB_API_BASE: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_FLAT_KEY: &str = "statusBarBgColor";
pub const DEFAULT_NESTED_PATH: &str = "statusBar.theme.light.backgroundColor";

/// Source-control host the config file lives on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    GitLab,
    GitHub,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gitlab" => Ok(BackendKind::GitLab),
            "github" => Ok(BackendKind::GitHub),
            other => Err(format!("unknown backend '{}' (expected gitlab or github)", other)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::GitLab => write!(f, "gitlab"),
            BackendKind::GitHub => write!(f, "github"),
        }
    }
}

/// Where the file lives and how to write to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoSettings {
    /// GitLab project id (or `group/project`), or GitHub `owner/repo`.
    pub repository: Option<String>,
    pub branch: String,
    pub file_path: String,
    pub api_base: String,
    /// Write-capable token. Never logged.
    pub token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub admin_secret: Option<String>,
    pub backend: BackendKind,
    pub repo: RepoSettings,
    pub target: FieldTarget,
}

impl Config {
    pub fn from_env(backend: BackendKind) -> Self {
        Self::from_lookup(backend, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(backend: BackendKind, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank values count as unset
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (prefix, default_api) = match backend {
            BackendKind::GitLab => ("GITLAB", DEFAULT_GITLAB_API_BASE),
            BackendKind::GitHub => ("GITHUB", DEFAULT_GITHUB_API_BASE),
        };
        let repository = match backend {
            BackendKind::GitLab => get("GITLAB_PROJECT_ID"),
            BackendKind::GitHub => get("GITHUB_REPO"),
        };

        let repo = RepoSettings {
            repository,
            branch: get(&format!("{prefix}_BRANCH")).unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            file_path: get("JSON_FILE_PATH").unwrap_or_else(|| DEFAULT_FILE_PATH.to_string()),
            api_base: get(&format!("{prefix}_API_BASE"))
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| default_api.to_string()),
            token: get(&format!("{prefix}_TOKEN")),
        };

        let nested = match get("COLOR_FIELD_MODE").as_deref() {
            Some(mode) if mode.eq_ignore_ascii_case("flat") => false,
            Some(mode) if mode.eq_ignore_ascii_case("nested") => true,
            _ => backend == BackendKind::GitHub,
        };
        let target = match (nested, get("COLOR_FIELD")) {
            (false, field) => FieldTarget::Flat(field.unwrap_or_else(|| DEFAULT_FLAT_KEY.to_string())),
            (true, field) => FieldTarget::nested(field.as_deref().unwrap_or(DEFAULT_NESTED_PATH)),
        };

        Self {
            admin_secret: get("ADMIN_SECRET"),
            backend,
            repo,
            target,
        }
    }

    /// Names of required settings that are absent, for a startup warning.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.admin_secret.is_none() {
            missing.push("ADMIN_SECRET");
        }
        match self.backend {
            BackendKind::GitLab => {
                if self.repo.repository.is_none() {
                    missing.push("GITLAB_PROJECT_ID");
                }
                if self.repo.token.is_none() {
                    missing.push("GITLAB_TOKEN");
                }
            }
            BackendKind::GitHub => {
                if self.repo.repository.is_none() {
                    missing.push("GITHUB_REPO");
                }
                if self.repo.token.is_none() {
                    missing.push("GITHUB_TOKEN");
                }
            }
        }
        missing
    }
}
