//! File-backed topic catalog.
//!
//! Layout of the topics directory:
//!
//! ```text
//! <dir>/config.json       {"category": ["animal", "food"]}
//! <dir>/animal.json       {"topics": ["cat", "dog"]}
//! <dir>/food.json         {"topics": ["banana"]}
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use rand::seq::{IteratorRandom, SliceRandom};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{TopicPick, TopicSource};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum TopicLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    #[serde(default)]
    category: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TopicFile {
    #[serde(default)]
    topics: Vec<String>,
}

/// Immutable set of categories and their topics.
#[derive(Debug, Clone, Default)]
pub struct TopicCatalog {
    categories: BTreeMap<String, Vec<String>>,
}

impl TopicCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_categories(categories: BTreeMap<String, Vec<String>>) -> Self {
        Self { categories }
    }

    /// Load the catalog from a topics directory.
    ///
    /// A category whose topic file cannot be loaded is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `config.json` cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self, TopicLoadError> {
        let config: CategoryFile = read_json(&dir.join(CONFIG_FILE))?;

        let mut categories = BTreeMap::new();
        for category in config.category {
            let path = dir.join(format!("{category}.json"));
            match read_json::<TopicFile>(&path) {
                Ok(file) => {
                    tracing::debug!("Loaded {} topics for '{}'", file.topics.len(), category);
                    categories.insert(category, file.topics);
                }
                Err(e) => tracing::warn!("Skipping category '{}': {}", category, e),
            }
        }

        tracing::info!("Topics loaded: {} categories", categories.len());
        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl TopicSource for TopicCatalog {
    fn random_topic(&self) -> Option<TopicPick> {
        let mut rng = rand::thread_rng();
        let (category, topics) = self
            .categories
            .iter()
            .filter(|(_, topics)| !topics.is_empty())
            .choose(&mut rng)?;
        let topic = topics.choose(&mut rng)?;
        Some(TopicPick {
            category: category.clone(),
            topic: topic.clone(),
        })
    }

    fn categories(&self) -> BTreeMap<String, Vec<String>> {
        self.categories.clone()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TopicLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| TopicLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| TopicLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
