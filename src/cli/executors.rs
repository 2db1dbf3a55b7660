//! Per-token work for each load command

use async_trait::async_trait;
use stress_client::{BranchCreation, LakeFsClient, ObjectStageCreation};
use stress_core::{BoxError, Executor, Page, PageSource, WorkResult, WorkToken};

/// Stats the object named by each token
pub struct StatObject {
    pub client: LakeFsClient,
    pub repository: String,
    pub reference: String,
}

impl Executor for StatObject {
    async fn execute(&self, token: WorkToken) -> WorkResult {
        WorkResult::measure(
            self.client
                .stat_object(&self.repository, &self.reference, token.as_str()),
        )
        .await
    }
}

/// Stages the same physical object at the path named by each token
pub struct StageObject {
    pub client: LakeFsClient,
    pub repository: String,
    pub branch: String,
    pub staging: ObjectStageCreation,
}

impl Executor for StageObject {
    async fn execute(&self, token: WorkToken) -> WorkResult {
        WorkResult::measure(self.client.stage_object(
            &self.repository,
            &self.branch,
            token.as_str(),
            &self.staging,
        ))
        .await
    }
}

/// Creates a branch named by each token from a fixed source ref
pub struct CreateBranch {
    pub client: LakeFsClient,
    pub repository: String,
    pub source: String,
}

impl Executor for CreateBranch {
    async fn execute(&self, token: WorkToken) -> WorkResult {
        let creation = BranchCreation {
            name: token.into_inner(),
            source: self.source.clone(),
        };
        WorkResult::measure(self.client.create_branch(&self.repository, &creation)).await
    }
}

/// Deletes the branch named by each token
pub struct DeleteBranch {
    pub client: LakeFsClient,
    pub repository: String,
}

impl Executor for DeleteBranch {
    async fn execute(&self, token: WorkToken) -> WorkResult {
        WorkResult::measure(self.client.delete_branch(&self.repository, token.as_str())).await
    }
}

/// Branch listing of one repository, as a page source for discovery
pub struct BranchListing {
    pub client: LakeFsClient,
    pub repository: String,
}

#[async_trait]
impl PageSource for BranchListing {
    async fn fetch(&self, after: &str, amount: usize) -> Result<Page, BoxError> {
        let list = self
            .client
            .list_branches(&self.repository, after, amount)
            .await?;

        Ok(Page {
            items: list.results.into_iter().map(|r| r.id).collect(),
            has_more: list.pagination.has_more,
            next_offset: list.pagination.next_offset,
        })
    }
}
