//! Source of drawing topics.

use std::collections::BTreeMap;

/// A category and one topic drawn from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPick {
    pub category: String,
    pub topic: String,
}

/// Supplies secret topics for new rounds.
#[cfg_attr(test, mockall::automock)]
pub trait TopicSource: Send + Sync {
    /// Pick a random topic. `None` when no topics are available.
    fn random_topic(&self) -> Option<TopicPick>;

    /// Every category with its topics.
    fn categories(&self) -> BTreeMap<String, Vec<String>>;
}
