use std::sync::Arc;

use tokio::sync::watch;

use super::{Activity, Phase, Tracked, ViewCore, ViewStatus};
use crate::{
    api::SuggestionApi,
    error::ViewError,
    model::{NewTopic, Topic},
};

/// Inputs of the "new topic" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicForm {
    pub name: String,
    pub description: String,
}

impl TopicForm {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Actions the topic list can re-run after a transient failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicListRetry {
    Load,
    CreateTopic(NewTopic),
    DeleteTopic(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicListState {
    pub topics: Vec<Topic>,
    pub form: TopicForm,
    pub activity: Activity<TopicListRetry>,
}

impl TopicListState {
    pub fn status(&self) -> ViewStatus {
        self.activity.status()
    }

    /// Whether the "create" action is enabled
    pub fn can_create_topic(&self) -> bool {
        self.activity.is_settled() && self.form.is_complete()
    }

    pub fn topic(&self, topic_id: i64) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    fn remove_topic(&mut self, topic_id: i64) {
        self.topics.retain(|t| t.id != topic_id);
    }
}

impl Tracked for TopicListState {
    type Retry = TopicListRetry;

    fn activity(&self) -> &Activity<TopicListRetry> {
        &self.activity
    }

    fn activity_mut(&mut self) -> &mut Activity<TopicListRetry> {
        &mut self.activity
    }
}

/// All topics, with create and delete
#[derive(Debug)]
pub struct TopicListView<A> {
    api: Arc<A>,
    core: ViewCore<TopicListState>,
}

impl<A: SuggestionApi> TopicListView<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            core: ViewCore::new(TopicListState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TopicListState> {
        self.core.subscribe()
    }

    pub fn snapshot(&self) -> TopicListState {
        self.core.snapshot()
    }

    /// Stop the view; responses still in flight are discarded
    pub fn teardown(&self) {
        self.core.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.core.is_torn_down()
    }

    /// Load the full topic collection
    ///
    /// A `null` collection is shown as empty. On failure the view falls back to
    /// the phase it had before and raises a notice.
    pub async fn activate(&self) -> Result<(), ViewError> {
        let mut previous = Phase::Idle;
        self.core.update(|s| {
            previous = s.activity.phase;
            s.activity.phase = Phase::Loading;
        })?;
        if previous == Phase::Loading {
            previous = Phase::Idle;
        }

        match self.core.guard(self.api.list_topics()).await {
            Ok(topics) => {
                let topics = topics.unwrap_or_default();
                tracing::debug!(count = topics.len(), "topics loaded");
                self.core.update(|s| {
                    s.topics = topics;
                    s.activity.phase = Phase::Ready;
                })
            }
            Err(err) => {
                let _ = self.core.update(|s| {
                    s.activity.phase = previous;
                    s.activity.raise(&err, TopicListRetry::Load);
                });
                Err(err)
            }
        }
    }

    pub fn set_topic_name(&self, name: impl Into<String>) {
        let name = name.into();
        let _ = self.core.update(|s| s.form.name = name);
    }

    pub fn set_topic_description(&self, description: impl Into<String>) {
        let description = description.into();
        let _ = self.core.update(|s| s.form.description = description);
    }

    pub fn can_create_topic(&self) -> bool {
        self.core.read(TopicListState::can_create_topic)
    }

    /// Create a topic from the form
    ///
    /// The new topic is appended and the form cleared once the server answers.
    pub async fn create_topic(&self) -> Result<Topic, ViewError> {
        self.core.ensure_alive()?;
        let request = self.core.read(|s| {
            s.can_create_topic().then(|| NewTopic {
                name: s.form.name.clone(),
                description: s.form.description.clone(),
            })
        });
        let Some(request) = request else {
            return Err(ViewError::Validation(
                "a topic needs a name and a description".to_string(),
            ));
        };

        self.submit_topic(request).await
    }

    /// Delete `topic` on the server and drop it from the list
    ///
    /// A topic that is already gone is removed locally as well, with a notice.
    pub async fn delete_topic(&self, topic: &Topic) -> Result<(), ViewError> {
        self.delete_topic_by_id(topic.id).await
    }

    pub fn dismiss_notice(&self) {
        self.core.dismiss_notice();
    }

    /// Re-run the action behind the current notice, if it offers one
    pub async fn retry(&self) -> Result<(), ViewError> {
        match self.core.take_retry() {
            None => Ok(()),
            Some(TopicListRetry::Load) => self.activate().await,
            Some(TopicListRetry::CreateTopic(request)) => self.submit_topic(request).await.map(drop),
            Some(TopicListRetry::DeleteTopic(topic_id)) => self.delete_topic_by_id(topic_id).await,
        }
    }

    async fn submit_topic(&self, request: NewTopic) -> Result<Topic, ViewError> {
        self.core.begin_write()?;

        match self.core.guard(self.api.create_topic(request.clone())).await {
            Ok(topic) => {
                tracing::debug!(topic_id = topic.id, "topic created");
                self.core.update(|s| {
                    s.activity.end_write();
                    s.topics.push(topic.clone());
                    s.form = TopicForm::default();
                })?;
                Ok(topic)
            }
            Err(err) => {
                self.core
                    .fail_write(&err, TopicListRetry::CreateTopic(request));
                Err(err)
            }
        }
    }

    async fn delete_topic_by_id(&self, topic_id: i64) -> Result<(), ViewError> {
        self.core.begin_write()?;

        match self.core.guard(self.api.delete_topic(topic_id)).await {
            Ok(()) => {
                tracing::debug!(topic_id, "topic deleted");
                self.core.update(|s| {
                    s.activity.end_write();
                    s.remove_topic(topic_id);
                })
            }
            Err(err @ ViewError::NotFound(_)) => self.core.update(|s| {
                s.activity.end_write();
                s.remove_topic(topic_id);
                s.activity.raise(&err, TopicListRetry::DeleteTopic(topic_id));
            }),
            Err(err) => {
                self.core
                    .fail_write(&err, TopicListRetry::DeleteTopic(topic_id));
                Err(err)
            }
        }
    }
}
