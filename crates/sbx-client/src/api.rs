//! The REST contract the views are written against, and its HTTP implementation.

use std::future::Future;

use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::ClientError,
    model::{Category, NewCategory, NewSuggestion, NewTopic, Suggestion, Topic, TopicData},
};

/// Operations of the suggestion box API.
///
/// Views only talk to the backend through this trait, so tests can swap in an
/// in-process implementation.
pub trait SuggestionApi: Send + Sync {
    /// `GET /api/topic`; `None` when the server answers `null`
    fn list_topics(&self) -> impl Future<Output = Result<Option<Vec<Topic>>, ClientError>> + Send;

    /// `GET /api/topic/{id}`
    fn get_topic(&self, topic_id: i64) -> impl Future<Output = Result<TopicData, ClientError>> + Send;

    /// `POST /api/topic`
    fn create_topic(&self, topic: NewTopic) -> impl Future<Output = Result<Topic, ClientError>> + Send;

    /// `DELETE /api/topic/{id}`
    fn delete_topic(&self, topic_id: i64) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `POST /api/category`
    fn create_category(
        &self,
        category: NewCategory,
    ) -> impl Future<Output = Result<Category, ClientError>> + Send;

    /// `DELETE /api/category/{id}`
    fn delete_category(&self, category_id: i64) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `POST /api/suggestion`
    fn create_suggestion(
        &self,
        suggestion: NewSuggestion,
    ) -> impl Future<Output = Result<Suggestion, ClientError>> + Send;

    /// `DELETE /api/suggestion/{id}`
    fn delete_suggestion(
        &self,
        suggestion_id: i64,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`SuggestionApi`] over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Client for the server at `base_url`, e.g. `http://localhost:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> Result<Response, ClientError> {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder.build()?;

        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);

        tracing::debug!(%status, %message, "request failed");

        if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(message))
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        decode(response).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        // The body (the deleted id, or nothing) carries no information
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }
}

/// Decode a JSON body, reading an empty body as `null`
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

impl SuggestionApi for HttpApi {
    async fn list_topics(&self) -> Result<Option<Vec<Topic>>, ClientError> {
        self.get("/api/topic").await
    }

    async fn get_topic(&self, topic_id: i64) -> Result<TopicData, ClientError> {
        self.get(&format!("/api/topic/{topic_id}")).await
    }

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, ClientError> {
        self.post("/api/topic", &topic).await
    }

    async fn delete_topic(&self, topic_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/api/topic/{topic_id}")).await
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, ClientError> {
        self.post("/api/category", &category).await
    }

    async fn delete_category(&self, category_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/api/category/{category_id}")).await
    }

    async fn create_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, ClientError> {
        self.post("/api/suggestion", &suggestion).await
    }

    async fn delete_suggestion(&self, suggestion_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/api/suggestion/{suggestion_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpApi::new("http://localhost:8080/");
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(api.url("/api/topic"), "http://localhost:8080/api/topic");
    }
}
