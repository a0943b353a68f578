//! Search and pagination parameter model

mod debounce;
mod params;

pub use debounce::{SearchInput, SearchModel};
pub use params::SearchParams;
