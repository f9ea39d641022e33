//! Topic catalog loaded from disk.

mod catalog;

pub use catalog::{TopicCatalog, TopicLoadError};
