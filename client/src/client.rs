//! HTTP client for the lakeFS REST API

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{
    ApiErrorBody, BranchCreation, ObjectStageCreation, ObjectStats, RefList, Repository,
};

/// lakeFS API client
///
/// Cheap to clone: clones share one connection pool, so a single client can
/// serve every worker of a run.
#[derive(Debug, Clone)]
pub struct LakeFsClient {
    http: Client,
    base: Url,
    access_key_id: String,
    secret_access_key: String,
}

impl LakeFsClient {
    /// Create a client from a validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let base = Url::parse(&config.api_base())
            .map_err(|e| ClientError::InvalidUri(format!("{}: {}", config.endpoint, e)))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base,
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
        })
    }

    /// Build an API URL from path segments, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUri(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.access_key_id, Some(&self.secret_access_key))
    }

    /// Get repository metadata
    pub async fn get_repository(&self, repository: &str) -> Result<Repository> {
        let url = self.url(&["repositories", repository])?;
        let response = self.authorized(self.http.get(url)).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// Stat one object under a ref
    pub async fn stat_object(
        &self,
        repository: &str,
        reference: &str,
        path: &str,
    ) -> Result<ObjectStats> {
        let url = self.url(&["repositories", repository, "refs", reference, "objects", "stat"])?;
        let request = self.http.get(url).query(&[("path", path)]);
        let response = self.authorized(request).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// Link an existing physical object to a path on a branch
    pub async fn stage_object(
        &self,
        repository: &str,
        branch: &str,
        path: &str,
        staging: &ObjectStageCreation,
    ) -> Result<ObjectStats> {
        let url = self.url(&["repositories", repository, "branches", branch, "objects"])?;
        let request = self.http.put(url).query(&[("path", path)]).json(staging);
        let response = self.authorized(request).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// List branches in lexicographic order, starting strictly after `after`
    pub async fn list_branches(
        &self,
        repository: &str,
        after: &str,
        amount: usize,
    ) -> Result<RefList> {
        let url = self.url(&["repositories", repository, "branches"])?;
        let amount = amount.to_string();
        let request = self
            .http
            .get(url)
            .query(&[("after", after), ("amount", amount.as_str())]);
        let response = self.authorized(request).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// Create a branch from `source`, returning the new branch's commit ID
    pub async fn create_branch(&self, repository: &str, creation: &BranchCreation) -> Result<String> {
        let url = self.url(&["repositories", repository, "branches"])?;
        let request = self.http.post(url).json(creation);
        let response = self.authorized(request).send().await?;
        let response = expect_status(response, StatusCode::CREATED).await?;
        Ok(response.text().await?.trim().trim_matches('"').to_string())
    }

    /// Delete a branch
    pub async fn delete_branch(&self, repository: &str, branch: &str) -> Result<()> {
        let url = self.url(&["repositories", repository, "branches", branch])?;
        let response = self.authorized(self.http.delete(url)).send().await?;
        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

/// Pass `response` through if it has the `expected` status, otherwise turn
/// it into [`ClientError::Status`]
async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    tracing::trace!(status = status.as_u16(), expected = expected.as_u16(), %message, "Unexpected response status");

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
