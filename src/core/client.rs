use crate::core::genes::list_payload;
use crate::domain::model::{GeneList, SubmissionResponse, UserListId, ViewResponse};
use crate::domain::ports::{ConfigProvider, EnrichrApi};
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Client;
use std::time::Duration;

/// Enrichr REST API 的 reqwest 實作
pub struct EnrichrClient {
    base_url: String,
    client: Client,
}

impl EnrichrClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl EnrichrApi for EnrichrClient {
    async fn add_list(&self, genes: &GeneList, description: &str) -> Result<SubmissionResponse> {
        let url = self.endpoint("addList");
        let form = Form::new()
            .text("list", list_payload(genes))
            .text("description", description.to_string());

        tracing::debug!("📡 POST {} ({} genes)", url, genes.len());
        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        tracing::debug!("📡 addList response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(CheckError::SubmissionError {
                status: status.as_u16(),
                body,
            });
        }

        SubmissionResponse::from_json(&body)
    }

    async fn view_list(&self, user_list_id: &UserListId) -> Result<Option<ViewResponse>> {
        let url = self.endpoint("view");

        tracing::debug!("📡 GET {}?userListId={}", url, user_list_id);
        let response = self
            .client
            .get(&url)
            .query(&[("userListId", user_list_id.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("📡 view not available yet (status {})", status);
            return Ok(None);
        }

        let body = response.text().await?;
        let view: ViewResponse = serde_json::from_str(&body)?;
        Ok(Some(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::genes::normalize_symbols;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> EnrichrClient {
        EnrichrClient::new(&server.url("/Enrichr/"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            EnrichrClient::new("https://maayanlab.cloud/Enrichr/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://maayanlab.cloud/Enrichr");
        assert_eq!(
            client.endpoint("addList"),
            "https://maayanlab.cloud/Enrichr/addList"
        );
    }

    #[tokio::test]
    async fn test_add_list_posts_multipart_fields() {
        let server = MockServer::start_async().await;
        let add_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/Enrichr/addList")
                    .header_exists("content-type")
                    .body_contains("name=\"list\"")
                    .body_contains("TP53\nBRCA1\nEGFR")
                    .body_contains("name=\"description\"");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({"userListId": 3513, "shortId": "5f2c"}));
            })
            .await;

        let genes = normalize_symbols("tp53\nbrca1\negfr\n");
        let response = client_for(&server).add_list(&genes, "").await.unwrap();

        add_mock.assert_async().await;
        assert_eq!(response.user_list_id().unwrap().as_str(), "3513");
        assert_eq!(response.short_id(), Some("5f2c"));
    }

    #[tokio::test]
    async fn test_add_list_non_success_is_submission_error() {
        let server = MockServer::start_async().await;
        let add_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/Enrichr/addList");
                then.status(503).body("maintenance");
            })
            .await;

        let genes = normalize_symbols("TP53");
        let err = client_for(&server).add_list(&genes, "").await.unwrap_err();

        add_mock.assert_async().await;
        match err {
            CheckError::SubmissionError { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_add_list_invalid_json_is_serialization_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/Enrichr/addList");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let genes = normalize_symbols("TP53");
        let err = client_for(&server).add_list(&genes, "").await.unwrap_err();
        assert!(matches!(err, CheckError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_view_list_returns_genes() {
        let server = MockServer::start_async().await;
        let view_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/Enrichr/view")
                    .query_param("userListId", "3513");
                then.status(200).json_body(serde_json::json!({
                    "genes": ["TP53", "BRCA1", "EGFR"],
                    "description": ""
                }));
            })
            .await;

        let id = UserListId::from("3513");
        let view = client_for(&server).view_list(&id).await.unwrap().unwrap();

        view_mock.assert_async().await;
        assert_eq!(view.genes, vec!["TP53", "BRCA1", "EGFR"]);
        assert_eq!(view.description.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_view_list_not_found_is_not_ready() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/Enrichr/view");
                then.status(404);
            })
            .await;

        let id = UserListId::from("1");
        let view = client_for(&server).view_list(&id).await.unwrap();
        assert!(view.is_none());
    }
}
