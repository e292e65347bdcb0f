use crate::core::poll::PollPolicy;
use crate::domain::model::{GeneList, SubmissionResponse, UserListId, ViewResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn genes_file(&self) -> &str;
    fn description(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn poll_policy(&self) -> PollPolicy;
}

#[async_trait]
pub trait EnrichrApi: Send + Sync {
    async fn add_list(&self, genes: &GeneList, description: &str) -> Result<SubmissionResponse>;

    /// `Ok(None)` 表示服務端尚未能查詢到這份清單
    async fn view_list(&self, user_list_id: &UserListId) -> Result<Option<ViewResponse>>;
}
