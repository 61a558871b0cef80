//! In-process [`SuggestionApi`] for view tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use tokio::sync::Semaphore;

use crate::{
    api::SuggestionApi,
    error::ClientError,
    model::{Category, NewCategory, NewSuggestion, NewTopic, Suggestion, Topic, TopicData},
};

#[derive(Default)]
struct Store {
    topics: Vec<Topic>,
    categories: Vec<Category>,
    suggestions: Vec<Suggestion>,
    next_id: i64,
    null_topics: bool,
    null_categories: bool,
    failures: HashMap<&'static str, VecDeque<ClientError>>,
    calls: Vec<&'static str>,
}

/// Backend double keeping its rows in memory
///
/// Operations take effect when called; a held operation then waits for
/// [`release`](Self::release) before its response is delivered.
#[derive(Default)]
pub(crate) struct FakeApi {
    store: Mutex<Store>,
    holds: Mutex<HashMap<&'static str, Arc<Semaphore>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        let api = Self::default();
        api.set_next_id(1);
        api
    }

    pub(crate) fn with_topics(topics: Vec<Topic>) -> Self {
        let api = Self::new();
        for topic in topics {
            api.insert_topic(topic);
        }
        api
    }

    fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub(crate) fn set_next_id(&self, id: i64) {
        self.store().next_id = id;
    }

    pub(crate) fn insert_topic(&self, topic: Topic) {
        let mut store = self.store();
        store.next_id = store.next_id.max(topic.id + 1);
        store.topics.push(topic);
    }

    /// Insert `category` and the suggestions it carries
    pub(crate) fn insert_category(&self, mut category: Category) {
        let mut store = self.store();
        store.next_id = store.next_id.max(category.id + 1);
        store.suggestions.append(&mut category.suggestions);
        store.categories.push(category);
    }

    /// Answer `null` instead of the topic collection
    pub(crate) fn return_null_topics(&self) {
        self.store().null_topics = true;
    }

    /// Answer `categories: null` on topic reads
    pub(crate) fn return_null_categories(&self) {
        self.store().null_categories = true;
    }

    /// Fail the next call of `op` with `err`
    pub(crate) fn fail_next(&self, op: &'static str, err: ClientError) {
        self.store().failures.entry(op).or_default().push_back(err);
    }

    /// Hold responses of `op` until released
    pub(crate) fn hold(&self, op: &'static str) {
        self.holds
            .lock()
            .unwrap()
            .insert(op, Arc::new(Semaphore::new(0)));
    }

    pub(crate) fn release(&self, op: &'static str, responses: usize) {
        if let Some(gate) = self.holds.lock().unwrap().get(op) {
            gate.add_permits(responses);
        }
    }

    /// Operations called so far, in order
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.store().calls.clone()
    }

    pub(crate) fn call_count(&self, op: &'static str) -> usize {
        self.store().calls.iter().filter(|c| **c == op).count()
    }

    pub(crate) fn topics(&self) -> Vec<Topic> {
        self.store().topics.clone()
    }

    /// Record the call and run `f` against the store, unless a failure is queued
    fn perform<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Store) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut store = self.store();
        store.calls.push(op);
        if let Some(err) = store.failures.get_mut(op).and_then(VecDeque::pop_front) {
            return Err(err);
        }
        f(&mut store)
    }

    async fn respond<T>(&self, op: &'static str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        let gate = self.holds.lock().unwrap().get(op).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        result
    }
}

impl Store {
    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl SuggestionApi for FakeApi {
    async fn list_topics(&self) -> Result<Option<Vec<Topic>>, ClientError> {
        let result = self.perform("list_topics", |store| {
            Ok((!store.null_topics).then(|| store.topics.clone()))
        });
        self.respond("list_topics", result).await
    }

    async fn get_topic(&self, topic_id: i64) -> Result<TopicData, ClientError> {
        let result = self.perform("get_topic", |store| {
            let topic = store
                .topics
                .iter()
                .find(|t| t.id == topic_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Topic {topic_id} not found")))?;

            let categories = store
                .categories
                .iter()
                .filter(|c| c.topic_id == topic_id)
                .map(|c| Category {
                    suggestions: store
                        .suggestions
                        .iter()
                        .filter(|s| s.category_id == c.id)
                        .cloned()
                        .collect(),
                    ..c.clone()
                })
                .collect();

            Ok(TopicData {
                topic,
                categories: (!store.null_categories).then_some(categories),
            })
        });
        self.respond("get_topic", result).await
    }

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic, ClientError> {
        let result = self.perform("create_topic", |store| {
            let topic = Topic {
                id: store.take_id(),
                name: topic.name,
                description: topic.description,
            };
            store.topics.push(topic.clone());
            Ok(topic)
        });
        self.respond("create_topic", result).await
    }

    async fn delete_topic(&self, topic_id: i64) -> Result<(), ClientError> {
        let result = self.perform("delete_topic", |store| {
            if !store.topics.iter().any(|t| t.id == topic_id) {
                return Err(ClientError::NotFound(format!("Topic {topic_id} not found")));
            }
            store.topics.retain(|t| t.id != topic_id);
            let removed: Vec<i64> = store
                .categories
                .iter()
                .filter(|c| c.topic_id == topic_id)
                .map(|c| c.id)
                .collect();
            store.categories.retain(|c| c.topic_id != topic_id);
            store.suggestions.retain(|s| !removed.contains(&s.category_id));
            Ok(())
        });
        self.respond("delete_topic", result).await
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, ClientError> {
        let result = self.perform("create_category", |store| {
            if !store.topics.iter().any(|t| t.id == category.topic_id) {
                return Err(ClientError::NotFound(format!(
                    "Topic {} not found",
                    category.topic_id
                )));
            }
            let category = Category {
                id: store.take_id(),
                name: category.name,
                topic_id: category.topic_id,
                suggestions: Vec::new(),
            };
            store.categories.push(category.clone());
            Ok(category)
        });
        self.respond("create_category", result).await
    }

    async fn delete_category(&self, category_id: i64) -> Result<(), ClientError> {
        let result = self.perform("delete_category", |store| {
            if !store.categories.iter().any(|c| c.id == category_id) {
                return Err(ClientError::NotFound(format!(
                    "Category {category_id} not found"
                )));
            }
            store.categories.retain(|c| c.id != category_id);
            store.suggestions.retain(|s| s.category_id != category_id);
            Ok(())
        });
        self.respond("delete_category", result).await
    }

    async fn create_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, ClientError> {
        let result = self.perform("create_suggestion", |store| {
            if !store.categories.iter().any(|c| c.id == suggestion.category_id) {
                return Err(ClientError::NotFound(format!(
                    "Category {} not found",
                    suggestion.category_id
                )));
            }
            let suggestion = Suggestion {
                id: store.take_id(),
                content: suggestion.content,
                name: suggestion.name,
                category_id: suggestion.category_id,
            };
            store.suggestions.push(suggestion.clone());
            Ok(suggestion)
        });
        self.respond("create_suggestion", result).await
    }

    async fn delete_suggestion(&self, suggestion_id: i64) -> Result<(), ClientError> {
        let result = self.perform("delete_suggestion", |store| {
            if !store.suggestions.iter().any(|s| s.id == suggestion_id) {
                return Err(ClientError::NotFound(format!(
                    "Suggestion {suggestion_id} not found"
                )));
            }
            store.suggestions.retain(|s| s.id != suggestion_id);
            Ok(())
        });
        self.respond("delete_suggestion", result).await
    }
}
