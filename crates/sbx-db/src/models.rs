use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Topic model - the root of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique topic identifier
    pub id: i64,
    /// Topic name
    pub name: String,
    /// Free-form topic description
    pub description: String,
}

/// Category model - groups suggestions within a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier
    pub id: i64,
    /// Category name
    pub name: String,
    /// Topic this category belongs to
    pub topic_id: i64,
}

/// Suggestion model - a leaf item submitted by a named contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Unique suggestion identifier
    pub id: i64,
    /// Name of the contributor
    pub name: String,
    /// Suggestion text
    pub content: String,
    /// Category this suggestion belongs to
    pub category_id: i64,
}

/// A category together with all of its suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithSuggestions {
    #[serde(flatten)]
    pub category: Category,
    pub suggestions: Vec<Suggestion>,
}

/// Composite read returned by `GET /api/topic/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDetail {
    pub topic: Topic,
    pub categories: Vec<CategoryWithSuggestions>,
}

impl TopicDetail {
    /// Nest `suggestions` under their categories.
    ///
    /// Categories keep the order they were given in, and so do the suggestions
    /// within each category. Suggestions whose category is not in `categories`
    /// are ignored.
    pub fn assemble(topic: Topic, categories: Vec<Category>, suggestions: Vec<Suggestion>) -> Self {
        let mut categories: Vec<CategoryWithSuggestions> = categories
            .into_iter()
            .map(|category| CategoryWithSuggestions {
                category,
                suggestions: Vec::new(),
            })
            .collect();

        for suggestion in suggestions {
            if let Some(entry) = categories
                .iter_mut()
                .find(|c| c.category.id == suggestion.category_id)
            {
                entry.suggestions.push(suggestion);
            }
        }

        Self { topic, categories }
    }
}
