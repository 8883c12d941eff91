//! Hosting backend facade - dispatches fetch/commit to GitLab or GitHub.
//! Both calls are sequential and made once: no retries, no client-side timeout.

use reqwest::Client;
use serde_json::{Map, Value};

use crate::config::{BackendKind, RepoSettings};
use crate::error::SetColorError;
use crate::{github, gitlab};

/// Borrowed, fully-resolved coordinates of the config file.
#[derive(Clone, Copy, Debug)]
pub struct FileLocation<'a> {
    pub api_base: &'a str,
    pub repository: &'a str,
    pub branch: &'a str,
    pub file_path: &'a str,
    pub token: &'a str,
}

impl<'a> FileLocation<'a> {
    /// Fails with `ServerMisconfigured` if the repository or token is not set.
    pub fn resolve(kind: BackendKind, settings: &'a RepoSettings) -> Result<Self, SetColorError> {
        let (repo_var, token_var) = match kind {
            BackendKind::GitLab => ("GITLAB_PROJECT_ID not set", "GITLAB_TOKEN not set"),
            BackendKind::GitHub => ("GITHUB_REPO not set", "GITHUB_TOKEN not set"),
        };
        Ok(Self {
            api_base: &settings.api_base,
            repository: settings
                .repository
                .as_deref()
                .ok_or(SetColorError::ServerMisconfigured(repo_var))?,
            branch: &settings.branch,
            file_path: &settings.file_path,
            token: settings
                .token
                .as_deref()
                .ok_or(SetColorError::ServerMisconfigured(token_var))?,
        })
    }
}

/// The decoded document plus the version hash needed to replace it (GitHub only).
#[derive(Debug)]
pub struct RemoteFile {
    pub document: Map<String, Value>,
    pub sha: Option<String>,
}

/// Base64 content and message for a create/update-file call.
#[derive(Debug)]
pub struct Commit<'a> {
    pub content: String,
    pub message: String,
    pub sha: Option<&'a str>,
}

pub async fn fetch(
    kind: BackendKind,
    client: &Client,
    location: &FileLocation<'_>,
) -> Result<RemoteFile, SetColorError> {
    match kind {
        BackendKind::GitLab => gitlab::fetch_file(client, location).await,
        BackendKind::GitHub => github::fetch_file(client, location).await,
    }
}

pub async fn commit(
    kind: BackendKind,
    client: &Client,
    location: &FileLocation<'_>,
    commit: &Commit<'_>,
) -> Result<(), SetColorError> {
    match kind {
        BackendKind::GitLab => gitlab::commit_file(client, location, commit).await,
        BackendKind::GitHub => github::commit_file(client, location, commit).await,
    }
}
