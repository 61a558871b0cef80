//! Client-side routes.
//!
//! `/` redirects to `/topics`, `/topics` shows the list and `/topics/{id}`
//! shows one topic. Anything else is not found.

use thiserror::Error;

pub const TOPICS_PATH: &str = "/topics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TopicList,
    TopicDetail { topic_id: i64 },
}

impl Route {
    /// Canonical path of the route
    pub fn path(&self) -> String {
        match self {
            Self::TopicList => TOPICS_PATH.to_string(),
            Self::TopicDetail { topic_id } => format!("{TOPICS_PATH}/{topic_id}"),
        }
    }
}

/// Outcome of matching a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route for {0}")]
    NotFound(String),
}

/// Match `path` against the route table
///
/// Query strings, fragments and a trailing slash are ignored.
pub fn resolve(path: &str) -> Result<Resolution, RouteError> {
    let not_found = || RouteError::NotFound(path.to_string());

    let trimmed = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let trimmed = match trimmed.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => trimmed,
    };

    let segments: Vec<&str> = trimmed
        .strip_prefix('/')
        .ok_or_else(not_found)?
        .split('/')
        .collect();

    match segments.as_slice() {
        [""] => Ok(Resolution::Redirect(TOPICS_PATH)),
        ["topics"] => Ok(Resolution::Render(Route::TopicList)),
        ["topics", id] => {
            let topic_id = id
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(not_found)?;
            Ok(Resolution::Render(Route::TopicDetail { topic_id }))
        }
        _ => Err(not_found()),
    }
}

/// Resolve `path`, following redirects
pub fn route_for(path: &str) -> Result<Route, RouteError> {
    let mut current = path;
    // The table only redirects to rendered routes, so one hop is enough
    for _ in 0..2 {
        match resolve(current)? {
            Resolution::Render(route) => return Ok(route),
            Resolution::Redirect(target) => current = target,
        }
    }
    Err(RouteError::NotFound(path.to_string()))
}
