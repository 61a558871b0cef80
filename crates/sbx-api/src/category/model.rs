use serde::Deserialize;

use crate::{error::ApiError, validation};

/// Body of `POST /api/category`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub topic_id: i64,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validation::validate_name("name", &self.name)?;
        validation::validate_id("topicId", self.topic_id)
    }
}
