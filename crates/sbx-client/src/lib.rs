pub mod api;
pub mod error;
pub mod model;
pub mod navigator;
pub mod router;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpApi, SuggestionApi};
pub use error::{ClientError, ViewError};
pub use navigator::{ActiveView, NavigationError, Navigator};
pub use router::Route;
