//! Value objects - immutable types that represent domain concepts

mod page;
mod tags;

pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use tags::{ActionType, EntityType, TagParseError};
