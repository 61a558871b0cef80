//! Owns the view for the current route.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::SuggestionApi,
    error::ViewError,
    router::{Route, RouteError, route_for},
    view::{TopicDetailView, TopicListView},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(transparent)]
    Route(#[from] RouteError),
    /// The view is installed but its first read failed
    #[error(transparent)]
    View(#[from] ViewError),
}

#[derive(Debug)]
pub enum ActiveView<A> {
    TopicList(TopicListView<A>),
    TopicDetail(TopicDetailView<A>),
}

impl<A: SuggestionApi> ActiveView<A> {
    fn for_route(api: Arc<A>, route: Route) -> Self {
        match route {
            Route::TopicList => Self::TopicList(TopicListView::new(api)),
            Route::TopicDetail { topic_id } => {
                Self::TopicDetail(TopicDetailView::for_topic(api, topic_id))
            }
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::TopicList(_) => Route::TopicList,
            Self::TopicDetail(view) => Route::TopicDetail {
                topic_id: view.topic_id().unwrap_or_default(),
            },
        }
    }

    pub async fn activate(&self) -> Result<(), ViewError> {
        match self {
            Self::TopicList(view) => view.activate().await,
            Self::TopicDetail(view) => view.activate().await,
        }
    }

    pub fn teardown(&self) {
        match self {
            Self::TopicList(view) => view.teardown(),
            Self::TopicDetail(view) => view.teardown(),
        }
    }
}

/// Maps paths to views, one view alive at a time
#[derive(Debug)]
pub struct Navigator<A> {
    api: Arc<A>,
    current: Option<ActiveView<A>>,
}

impl<A: SuggestionApi> Navigator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api, current: None }
    }

    pub fn current(&self) -> Option<&ActiveView<A>> {
        self.current.as_ref()
    }

    pub fn route(&self) -> Option<Route> {
        self.current.as_ref().map(ActiveView::route)
    }

    /// Show the view for `path`
    ///
    /// Moving between topics keeps the detail view and rebinds it; any other
    /// change tears the previous view down first. An unknown path leaves no
    /// view active.
    ///
    /// The returned future resolves once the new view finished its first read.
    /// To leave during a slow read, drop the future and navigate again: the
    /// half-loaded view is already installed and gets torn down like any other.
    pub async fn navigate(&mut self, path: &str) -> Result<Route, NavigationError> {
        let route = match route_for(path) {
            Ok(route) => route,
            Err(err) => {
                tracing::debug!(path, "no route");
                self.leave();
                return Err(err.into());
            }
        };

        if let (Some(ActiveView::TopicDetail(view)), Route::TopicDetail { topic_id }) =
            (&self.current, route)
        {
            view.set_topic_id(topic_id).await?;
            return Ok(route);
        }

        if self.route() == Some(route) {
            return Ok(route);
        }

        self.leave();
        tracing::debug!(path, ?route, "entering view");
        let view = self.current.insert(ActiveView::for_route(self.api.clone(), route));
        view.activate().await?;
        Ok(route)
    }

    fn leave(&mut self) {
        if let Some(view) = self.current.take() {
            view.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Topic, testing::FakeApi, view::ViewStatus};

    fn topic(id: i64) -> Topic {
        Topic {
            id,
            name: format!("Topic {id}"),
            description: "description".to_string(),
        }
    }

    #[tokio::test]
    async fn test_root_shows_loaded_topic_list() {
        let api = Arc::new(FakeApi::with_topics(vec![topic(1), topic(2)]));
        let mut navigator = Navigator::new(api.clone());

        let route = navigator.navigate("/").await.unwrap();

        assert_eq!(route, Route::TopicList);
        let Some(ActiveView::TopicList(view)) = navigator.current() else {
            panic!("expected the topic list");
        };
        assert_eq!(view.snapshot().topics, api.topics());
        assert_eq!(view.snapshot().status(), ViewStatus::Ready);
    }

    #[tokio::test]
    async fn test_switching_views_tears_down_previous() {
        let api = Arc::new(FakeApi::with_topics(vec![topic(3)]));
        let mut navigator = Navigator::new(api.clone());
        navigator.navigate("/topics").await.unwrap();
        let mut list_updates = match navigator.current() {
            Some(ActiveView::TopicList(view)) => view.subscribe(),
            _ => panic!("expected the topic list"),
        };

        navigator.navigate("/topics/3").await.unwrap();

        assert_eq!(navigator.route(), Some(Route::TopicDetail { topic_id: 3 }));
        // The list view is gone with its state channel
        assert!(list_updates.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_moving_between_topics_rebinds_detail() {
        let api = Arc::new(FakeApi::with_topics(vec![topic(3), topic(4)]));
        let mut navigator = Navigator::new(api.clone());
        navigator.navigate("/topics/3").await.unwrap();

        navigator.navigate("/topics/4").await.unwrap();
        navigator.navigate("/topics/4/").await.unwrap();

        let Some(ActiveView::TopicDetail(view)) = navigator.current() else {
            panic!("expected the topic detail");
        };
        assert!(!view.is_torn_down());
        assert_eq!(view.snapshot().topic, Some(topic(4)));
        assert_eq!(api.call_count("get_topic"), 2);
    }

    #[tokio::test]
    async fn test_unknown_path_leaves_no_view() {
        let api = Arc::new(FakeApi::new());
        let mut navigator = Navigator::new(api.clone());
        navigator.navigate("/topics").await.unwrap();

        let err = navigator.navigate("/settings").await.unwrap_err();

        assert_eq!(
            err,
            NavigationError::Route(RouteError::NotFound("/settings".to_string()))
        );
        assert!(navigator.current().is_none());
    }

    #[tokio::test]
    async fn test_failed_activation_keeps_view_for_retry() {
        let api = Arc::new(FakeApi::new());
        let mut navigator = Navigator::new(api.clone());

        let err = navigator.navigate("/topics/9").await.unwrap_err();

        assert!(matches!(err, NavigationError::View(ViewError::NotFound(_))));
        assert_eq!(navigator.route(), Some(Route::TopicDetail { topic_id: 9 }));
    }

    #[tokio::test]
    async fn test_leaving_during_slow_load() {
        let api = Arc::new(FakeApi::with_topics(vec![topic(3)]));
        api.hold("get_topic");
        let mut navigator = Navigator::new(api.clone());

        let slow = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            navigator.navigate("/topics/3"),
        )
        .await;
        assert!(slow.is_err(), "the read is still held");

        let mut detail_updates = match navigator.current() {
            Some(ActiveView::TopicDetail(view)) => {
                assert_eq!(view.snapshot().status(), ViewStatus::Loading);
                view.subscribe()
            }
            _ => panic!("expected the half-loaded topic detail"),
        };

        navigator.navigate("/topics").await.unwrap();
        api.release("get_topic", 1);

        assert_eq!(navigator.route(), Some(Route::TopicList));
        assert!(detail_updates.changed().await.is_err());
        assert_eq!(api.call_count("get_topic"), 1);
    }
}
