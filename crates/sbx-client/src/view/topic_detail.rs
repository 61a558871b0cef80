use std::sync::Arc;

use tokio::sync::watch;

use super::{Activity, Phase, Tracked, ViewCore, ViewStatus};
use crate::{
    api::SuggestionApi,
    error::ViewError,
    model::{Category, NewCategory, NewSuggestion, Suggestion, Topic},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
}

/// Inputs of the "new suggestion" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionForm {
    /// Contributor name
    pub name: String,
    pub content: String,
    /// Category the suggestion goes into; `None` until one is picked
    pub category_id: Option<i64>,
}

/// Actions the detail view can re-run after a transient failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicDetailRetry {
    Load,
    CreateCategory(NewCategory),
    CreateSuggestion(NewSuggestion),
    DeleteCategory(i64),
    DeleteSuggestion(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicDetailState {
    /// The topic this view is bound to
    pub topic_id: Option<i64>,
    /// Set once the composite read resolved
    pub topic: Option<Topic>,
    pub categories: Vec<Category>,
    pub category_form: CategoryForm,
    pub suggestion_form: SuggestionForm,
    pub activity: Activity<TopicDetailRetry>,
    // Bumped on every topic change; responses carry the value they started with
    generation: u64,
}

impl TopicDetailState {
    fn for_topic(topic_id: i64, generation: u64) -> Self {
        Self {
            topic_id: Some(topic_id),
            generation,
            ..Self::default()
        }
    }

    pub fn status(&self) -> ViewStatus {
        self.activity.status()
    }

    pub fn category(&self, category_id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn can_create_category(&self) -> bool {
        self.activity.is_settled()
            && self.topic.is_some()
            && !self.category_form.name.trim().is_empty()
    }

    /// Requires both fields and a selected category that is loaded
    pub fn can_create_suggestion(&self) -> bool {
        let form = &self.suggestion_form;
        self.activity.is_settled()
            && !form.name.trim().is_empty()
            && !form.content.trim().is_empty()
            && form
                .category_id
                .is_some_and(|id| self.category(id).is_some())
    }

    fn remove_category(&mut self, category_id: i64) {
        self.categories.retain(|c| c.id != category_id);
        if self.suggestion_form.category_id == Some(category_id) {
            self.suggestion_form.category_id = None;
        }
    }

    /// Drop everything shown for a topic the server no longer has
    fn forget_topic(&mut self) {
        self.topic = None;
        self.categories.clear();
        self.suggestion_form.category_id = None;
        self.activity.phase = Phase::Idle;
    }

    /// Drop the parent a failed create named, when the server says it is gone
    fn drop_stale_parent(&mut self, failed: &TopicDetailRetry) {
        match failed {
            TopicDetailRetry::CreateCategory(_) => self.forget_topic(),
            TopicDetailRetry::CreateSuggestion(request) => {
                self.remove_category(request.category_id);
            }
            _ => {}
        }
    }

    fn remove_suggestion(&mut self, suggestion_id: i64) {
        for category in &mut self.categories {
            category.suggestions.retain(|s| s.id != suggestion_id);
        }
    }
}

impl Tracked for TopicDetailState {
    type Retry = TopicDetailRetry;

    fn activity(&self) -> &Activity<TopicDetailRetry> {
        &self.activity
    }

    fn activity_mut(&mut self) -> &mut Activity<TopicDetailRetry> {
        &mut self.activity
    }
}

/// One topic with its categories and their suggestions
#[derive(Debug)]
pub struct TopicDetailView<A> {
    api: Arc<A>,
    core: ViewCore<TopicDetailState>,
}

impl<A: SuggestionApi> TopicDetailView<A> {
    /// View with no topic bound yet
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            core: ViewCore::new(TopicDetailState::default()),
        }
    }

    pub fn for_topic(api: Arc<A>, topic_id: i64) -> Self {
        Self {
            api,
            core: ViewCore::new(TopicDetailState::for_topic(topic_id, 0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TopicDetailState> {
        self.core.subscribe()
    }

    pub fn snapshot(&self) -> TopicDetailState {
        self.core.snapshot()
    }

    pub fn topic_id(&self) -> Option<i64> {
        self.core.read(|s| s.topic_id)
    }

    pub fn teardown(&self) {
        self.core.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.core.is_torn_down()
    }

    /// Bind the view to another topic and load it
    ///
    /// Everything shown for the previous topic is dropped, and responses still
    /// in flight for it resolve to [`ViewError::Stale`]. Binding the topic
    /// already shown does nothing.
    pub async fn set_topic_id(&self, topic_id: i64) -> Result<(), ViewError> {
        let changed = self.core.update_if(|s| {
            if s.topic_id == Some(topic_id) {
                return false;
            }
            *s = TopicDetailState::for_topic(topic_id, s.generation + 1);
            true
        })?;
        if !changed {
            return Ok(());
        }

        tracing::debug!(topic_id, "topic changed");
        self.activate().await
    }

    /// Read the bound topic and its categories in one request
    pub async fn activate(&self) -> Result<(), ViewError> {
        let mut target = None;
        let mut previous = Phase::Idle;
        let mut generation = 0;
        self.core.update(|s| {
            target = s.topic_id;
            generation = s.generation;
            previous = s.activity.phase;
            if target.is_some() {
                s.activity.phase = Phase::Loading;
            }
        })?;
        let Some(topic_id) = target else {
            return Err(ViewError::Validation("no topic selected".to_string()));
        };
        if previous == Phase::Loading {
            previous = Phase::Idle;
        }

        match self.core.guard(self.api.get_topic(topic_id)).await {
            Ok(data) => {
                let categories = data.categories.unwrap_or_default();
                tracing::debug!(topic_id, categories = categories.len(), "topic loaded");
                self.apply(generation, |s| {
                    s.topic = Some(data.topic);
                    s.categories = categories;
                    s.activity.phase = Phase::Ready;
                })
            }
            Err(err) => self
                .apply(generation, |s| {
                    if matches!(err, ViewError::NotFound(_)) {
                        s.forget_topic();
                    } else {
                        s.activity.phase = previous;
                    }
                    s.activity.raise(&err, TopicDetailRetry::Load);
                })
                .and(Err(err)),
        }
    }

    pub fn set_category_name(&self, name: impl Into<String>) {
        let name = name.into();
        let _ = self.core.update(|s| s.category_form.name = name);
    }

    pub fn set_suggestion_name(&self, name: impl Into<String>) {
        let name = name.into();
        let _ = self.core.update(|s| s.suggestion_form.name = name);
    }

    pub fn set_suggestion_content(&self, content: impl Into<String>) {
        let content = content.into();
        let _ = self.core.update(|s| s.suggestion_form.content = content);
    }

    pub fn select_category(&self, category_id: Option<i64>) {
        let _ = self.core.update(|s| s.suggestion_form.category_id = category_id);
    }

    pub fn can_create_category(&self) -> bool {
        self.core.read(TopicDetailState::can_create_category)
    }

    pub fn can_create_suggestion(&self) -> bool {
        self.core.read(TopicDetailState::can_create_suggestion)
    }

    /// Create a category under the loaded topic from the form
    pub async fn create_category(&self) -> Result<Category, ViewError> {
        self.core.ensure_alive()?;
        let request = self.core.read(|s| {
            let topic = s.topic.as_ref().filter(|_| s.can_create_category())?;
            Some(NewCategory {
                name: s.category_form.name.clone(),
                topic_id: topic.id,
            })
        });
        let Some(request) = request else {
            return Err(ViewError::Validation(
                "a category needs a name and a loaded topic".to_string(),
            ));
        };

        self.submit_category(request).await
    }

    /// Create a suggestion in the selected category from the form
    pub async fn create_suggestion(&self) -> Result<Suggestion, ViewError> {
        self.core.ensure_alive()?;
        let request = self.core.read(|s| {
            let form = &s.suggestion_form;
            let category_id = form.category_id.filter(|_| s.can_create_suggestion())?;
            Some(NewSuggestion {
                name: form.name.clone(),
                content: form.content.clone(),
                category_id,
            })
        });
        let Some(request) = request else {
            return Err(ViewError::Validation(
                "a suggestion needs a name, content and a category".to_string(),
            ));
        };

        self.submit_suggestion(request).await
    }

    /// Delete a category with its suggestions
    ///
    /// A category that is already gone is dropped locally as well.
    pub async fn delete_category(&self, category_id: i64) -> Result<(), ViewError> {
        let generation = self.begin_write()?;

        match self.core.guard(self.api.delete_category(category_id)).await {
            Ok(()) => {
                tracing::debug!(category_id, "category deleted");
                self.apply(generation, |s| {
                    s.activity.end_write();
                    s.remove_category(category_id);
                })
            }
            Err(err @ ViewError::NotFound(_)) => self.apply(generation, |s| {
                s.activity.end_write();
                s.remove_category(category_id);
                s.activity
                    .raise(&err, TopicDetailRetry::DeleteCategory(category_id));
            }),
            Err(err) => Err(self.fail(
                generation,
                err,
                TopicDetailRetry::DeleteCategory(category_id),
            )),
        }
    }

    pub async fn delete_suggestion(&self, suggestion_id: i64) -> Result<(), ViewError> {
        let generation = self.begin_write()?;

        match self.core.guard(self.api.delete_suggestion(suggestion_id)).await {
            Ok(()) => {
                tracing::debug!(suggestion_id, "suggestion deleted");
                self.apply(generation, |s| {
                    s.activity.end_write();
                    s.remove_suggestion(suggestion_id);
                })
            }
            Err(err @ ViewError::NotFound(_)) => self.apply(generation, |s| {
                s.activity.end_write();
                s.remove_suggestion(suggestion_id);
                s.activity
                    .raise(&err, TopicDetailRetry::DeleteSuggestion(suggestion_id));
            }),
            Err(err) => Err(self.fail(
                generation,
                err,
                TopicDetailRetry::DeleteSuggestion(suggestion_id),
            )),
        }
    }

    pub fn dismiss_notice(&self) {
        self.core.dismiss_notice();
    }

    /// Re-run the action behind the current notice, if it offers one
    pub async fn retry(&self) -> Result<(), ViewError> {
        match self.core.take_retry() {
            None => Ok(()),
            Some(TopicDetailRetry::Load) => self.activate().await,
            Some(TopicDetailRetry::CreateCategory(request)) => {
                self.submit_category(request).await.map(drop)
            }
            Some(TopicDetailRetry::CreateSuggestion(request)) => {
                self.submit_suggestion(request).await.map(drop)
            }
            Some(TopicDetailRetry::DeleteCategory(category_id)) => {
                self.delete_category(category_id).await
            }
            Some(TopicDetailRetry::DeleteSuggestion(suggestion_id)) => {
                self.delete_suggestion(suggestion_id).await
            }
        }
    }

    async fn submit_category(&self, request: NewCategory) -> Result<Category, ViewError> {
        let generation = self.begin_write()?;

        match self.core.guard(self.api.create_category(request.clone())).await {
            Ok(mut category) => {
                category.suggestions = Vec::new();
                let mut mismatch = None;
                self.apply(generation, |s| {
                    s.activity.end_write();
                    s.category_form = CategoryForm::default();
                    if s.topic.as_ref().is_some_and(|t| t.id == category.topic_id) {
                        s.categories.push(category.clone());
                    } else {
                        let err = ViewError::ReferentialMismatch(format!(
                            "category {} belongs to topic {}, which is not shown",
                            category.id, category.topic_id
                        ));
                        s.activity.raise(&err, TopicDetailRetry::Load);
                        mismatch = Some(err);
                    }
                })?;

                match mismatch {
                    Some(err) => Err(err),
                    None => {
                        tracing::debug!(category_id = category.id, "category created");
                        Ok(category)
                    }
                }
            }
            Err(err) => Err(self.fail(
                generation,
                err,
                TopicDetailRetry::CreateCategory(request),
            )),
        }
    }

    async fn submit_suggestion(&self, request: NewSuggestion) -> Result<Suggestion, ViewError> {
        let generation = self.begin_write()?;

        match self.core.guard(self.api.create_suggestion(request.clone())).await {
            Ok(suggestion) => {
                let mut mismatch = None;
                self.apply(generation, |s| {
                    s.activity.end_write();
                    s.suggestion_form = SuggestionForm::default();
                    match s
                        .categories
                        .iter_mut()
                        .find(|c| c.id == suggestion.category_id)
                    {
                        Some(category) => category.suggestions.push(suggestion.clone()),
                        None => {
                            let err = ViewError::ReferentialMismatch(format!(
                                "suggestion {} names category {}, which is not shown",
                                suggestion.id, suggestion.category_id
                            ));
                            s.activity.raise(&err, TopicDetailRetry::Load);
                            mismatch = Some(err);
                        }
                    }
                })?;

                match mismatch {
                    Some(err) => Err(err),
                    None => {
                        tracing::debug!(suggestion_id = suggestion.id, "suggestion created");
                        Ok(suggestion)
                    }
                }
            }
            Err(err) => Err(self.fail(
                generation,
                err,
                TopicDetailRetry::CreateSuggestion(request),
            )),
        }
    }

    /// Count a write against the current topic, returning its generation
    fn begin_write(&self) -> Result<u64, ViewError> {
        let mut generation = 0;
        self.core.update(|s| {
            s.activity.begin_write();
            generation = s.generation;
        })?;
        Ok(generation)
    }

    /// Apply `f` if the view still shows the topic of `generation`
    fn apply(
        &self,
        generation: u64,
        f: impl FnOnce(&mut TopicDetailState),
    ) -> Result<(), ViewError> {
        let applied = self.core.update_if(|s| {
            if s.generation != generation {
                return false;
            }
            f(s);
            true
        })?;

        if applied { Ok(()) } else { Err(ViewError::Stale) }
    }

    /// Settle a failed write and hand back the error the caller should see
    ///
    /// A not-found answer to a create means its parent is gone, so the parent
    /// is dropped locally.
    fn fail(&self, generation: u64, err: ViewError, retry: TopicDetailRetry) -> ViewError {
        let settled = self.apply(generation, |s| {
            s.activity.end_write();
            if matches!(err, ViewError::NotFound(_)) {
                s.drop_stale_parent(&retry);
            }
            s.activity.raise(&err, retry);
        });

        match settled {
            Ok(()) => err,
            Err(other) => other,
        }
    }
}
