//! Notion REST API client.

use serde::Serialize;
use tracing::instrument;

use crate::error::NotionError;
use crate::types::*;

const NOTION_API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Authenticated session against the Notion API.
pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    api_version: String,
}

impl NotionClient {
    pub fn new(token: &str) -> Result<Self, NotionError> {
        Self::with_base_url(token, NOTION_API_BASE, NOTION_VERSION)
    }

    pub fn with_base_url(
        token: &str,
        base_url: &str,
        api_version: &str,
    ) -> Result<Self, NotionError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("studymentor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", self.api_version.as_str())
    }

    /// Create a page under a database.
    #[instrument(skip(self, request), level = "info")]
    pub async fn create_page<P: Serialize>(
        &self,
        request: &CreatePageRequest<P>,
    ) -> Result<ApiPage, NotionError> {
        let response = self
            .request(reqwest::Method::POST, "/pages")
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Patch a page's properties.
    #[instrument(skip(self, request), level = "info")]
    pub async fn update_page<P: Serialize>(
        &self,
        page_id: &str,
        request: &UpdatePageRequest<P>,
    ) -> Result<ApiPage, NotionError> {
        let path = format!("/pages/{}", urlencoding::encode(page_id));
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Query a database for one page of results.
    #[instrument(skip(self, request), fields(page_size = request.page_size), level = "info")]
    pub async fn query_database(
        &self,
        database_id: &str,
        request: &QueryDatabaseRequest,
    ) -> Result<QueryDatabaseResponse, NotionError> {
        let path = format!("/databases/{}/query", urlencoding::encode(database_id));
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, NotionError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| NotionError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(NotionError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(NotionError::from_status(status.as_u16(), &text))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NotionClient {
        NotionClient::with_base_url("secret_test", &server.uri(), "2022-06-28").unwrap()
    }

    #[tokio::test]
    async fn test_create_page_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pages"))
            .and(header("Authorization", "Bearer secret_test"))
            .and(header("Notion-Version", "2022-06-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "page",
                "id": "p1",
                "url": "https://www.notion.so/p1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = CreatePageRequest::in_database(
            "db1",
            StatusUpdateProperties {
                status: SelectProperty::named("Done"),
            },
        );
        let page = client(&mock_server).create_page(&request).await.unwrap();

        assert_eq!(page.id, "p1");
        assert_eq!(page.url, "https://www.notion.so/p1");
    }

    #[tokio::test]
    async fn test_update_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/pages/p1"))
            .and(body_json(serde_json::json!({
                "properties": {"Status": {"select": {"name": "Done"}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "p1",
                "url": "https://www.notion.so/p1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = UpdatePageRequest {
            properties: StatusUpdateProperties {
                status: SelectProperty::named("Done"),
            },
        };
        client(&mock_server).update_page("p1", &request).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_database() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/databases/db1/query"))
            .and(body_json(serde_json::json!({
                "sorts": [{"property": "Created", "direction": "descending"}],
                "page_size": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "results": [
                    {"id": "a", "url": "https://www.notion.so/a", "properties": {}},
                    {"id": "b", "url": "https://www.notion.so/b", "properties": {}}
                ],
                "has_more": true
            })))
            .mount(&mock_server)
            .await;

        let response = client(&mock_server)
            .query_database("db1", &QueryDatabaseRequest::recent_first(2))
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].id, "b");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/databases/db1/query"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "object": "error",
                "status": 401,
                "code": "unauthorized",
                "message": "API token is invalid."
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server)
            .query_database("db1", &QueryDatabaseRequest::recent_first(10))
            .await;

        assert!(matches!(result, Err(NotionError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "2"))
            .mount(&mock_server)
            .await;

        let request = UpdatePageRequest {
            properties: StatusUpdateProperties {
                status: SelectProperty::named("Done"),
            },
        };
        let result = client(&mock_server).update_page("p1", &request).await;

        assert!(matches!(result, Err(NotionError::RateLimited(2))));
    }
}
