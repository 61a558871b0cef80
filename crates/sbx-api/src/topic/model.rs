use serde::Deserialize;

use crate::{error::ApiError, validation};

/// Body of `POST /api/topic`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub name: String,
    pub description: String,
}

impl CreateTopicRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validation::validate_name("name", &self.name)?;
        validation::validate_text("description", &self.description)
    }
}
