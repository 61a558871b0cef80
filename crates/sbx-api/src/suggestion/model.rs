use serde::Deserialize;

use crate::{error::ApiError, validation};

/// Body of `POST /api/suggestion`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuggestionRequest {
    pub name: String,
    pub content: String,
    pub category_id: i64,
}

impl CreateSuggestionRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validation::validate_name("name", &self.name)?;
        validation::validate_text("content", &self.content)?;
        validation::validate_id("categoryId", self.category_id)
    }
}
