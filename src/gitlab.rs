//! GitLab repository files API.
//! GET  {api}/projects/{id}/repository/files/{path}?ref={branch}
//! PUT  {api}/projects/{id}/repository/files/{path}
//! Auth is the `PRIVATE-TOKEN` header; project id and path are each one encoded segment.

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{Commit, FileLocation, RemoteFile};
use crate::document;
use crate::error::SetColorError;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

// *************** Request/Response Types ***************

#[derive(Deserialize)]
struct FileResponse {
    content: String,
}

#[derive(Serialize)]
struct UpdateFileRequest<'a> {
    branch: &'a str,
    content: &'a str,
    commit_message: &'a str,
    /// `content` is base64; GitLab stores the decoded bytes.
    encoding: &'static str,
}

// *************** Public API ***************

pub fn file_url(location: &FileLocation<'_>) -> String {
    format!(
        "{}/projects/{}/repository/files/{}",
        location.api_base,
        urlencoding::encode(location.repository),
        urlencoding::encode(location.file_path)
    )
}

pub async fn fetch_file(
    client: &Client,
    location: &FileLocation<'_>,
) -> Result<RemoteFile, SetColorError> {
    let url = file_url(location);
    debug!(%url, branch = location.branch, "Fetching file from GitLab");

    let response = client
        .get(&url)
        .header(TOKEN_HEADER, location.token)
        .query(&[("ref", location.branch)])
        .send()
        .await
        .context("Failed to send request to GitLab")?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SetColorError::UpstreamFetch(body));
    }

    let file: FileResponse = response
        .json()
        .await
        .context("Failed to parse GitLab file response")?;

    Ok(RemoteFile {
        document: document::decode_content(&file.content)?,
        sha: None,
    })
}

pub async fn commit_file(
    client: &Client,
    location: &FileLocation<'_>,
    commit: &Commit<'_>,
) -> Result<(), SetColorError> {
    let request = UpdateFileRequest {
        branch: location.branch,
        content: &commit.content,
        commit_message: &commit.message,
        encoding: "base64",
    };

    let response = client
        .put(file_url(location))
        .header(TOKEN_HEADER, location.token)
        .json(&request)
        .send()
        .await
        .context("Failed to send commit to GitLab")?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SetColorError::UpstreamCommit(body));
    }

    Ok(())
}

// *************** Tests ***************
