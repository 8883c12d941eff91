//! GitHub contents API.
//! GET {api}/repos/{owner}/{repo}/contents/{path}?ref={branch} -> { content, sha }
//! PUT same path with { message, content, sha, branch }.
//! The blob `sha` from the read must accompany the write, so a concurrent edit is rejected upstream.

use anyhow::Context;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{Commit, FileLocation, RemoteFile};
use crate::document;
use crate::error::SetColorError;

const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

// *************** Request/Response Types ***************

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: &'a str,
    sha: &'a str,
    branch: &'a str,
}

// *************** Public API ***************

/// Repository is used as-is (`owner/repo`); each path segment is encoded on its own.
pub fn contents_url(location: &FileLocation<'_>) -> String {
    let file_path = location
        .file_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}/repos/{}/contents/{}",
        location.api_base, location.repository, file_path
    )
}

pub async fn fetch_file(
    client: &Client,
    location: &FileLocation<'_>,
) -> Result<RemoteFile, SetColorError> {
    let url = contents_url(location);
    debug!(%url, branch = location.branch, "Fetching file from GitHub");

    let response = client
        .get(&url)
        .header(AUTHORIZATION, format!("Bearer {}", location.token))
        .header(ACCEPT, MEDIA_TYPE)
        .header("X-GitHub-Api-Version", API_VERSION)
        .query(&[("ref", location.branch)])
        .send()
        .await
        .context("Failed to send request to GitHub")?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SetColorError::UpstreamFetch(body));
    }

    let file: ContentsResponse = response
        .json()
        .await
        .context("Failed to parse GitHub contents response")?;

    Ok(RemoteFile {
        document: document::decode_content(&file.content)?,
        sha: Some(file.sha),
    })
}

pub async fn commit_file(
    client: &Client,
    location: &FileLocation<'_>,
    commit: &Commit<'_>,
) -> Result<(), SetColorError> {
    let sha = commit
        .sha
        .context("GitHub commit requires the sha of the file being replaced")?;

    let request = PutContentsRequest {
        message: &commit.message,
        content: &commit.content,
        sha,
        branch: location.branch,
    };

    let response = client
        .put(contents_url(location))
        .header(AUTHORIZATION, format!("Bearer {}", location.token))
        .header(ACCEPT, MEDIA_TYPE)
        .header("X-GitHub-Api-Version", API_VERSION)
        .json(&request)
        .send()
        .await
        .context("Failed to send commit to GitHub")?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SetColorError::UpstreamCommit(body));
    }

    Ok(())
}

// *************** Tests ***************
