//! Search dispatch: the snapshot handed to a vendor backend and its results.

mod dispatcher;
mod model;

pub use dispatcher::SearchDispatcher;
pub use model::{QuerySnapshot, SearchResults};
