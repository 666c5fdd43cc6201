//! Read-only feature collection loaded from a JSON dataset.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geo::contains_point;
use crate::models::{Feature, Point, Rectangle};

/// Errors that can occur while loading the feature dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read feature dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse feature dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered collection of named point features.
///
/// Built once before the service takes traffic and never mutated afterwards,
/// so it can be shared across calls without synchronization.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
}

impl FeatureStore {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Load features from a JSON file.
    ///
    /// The whole file must parse; a partially valid dataset is rejected.
    pub async fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_json_slice(&contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            "Loaded {} features from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse a JSON array of features.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        let features: Vec<Feature> = serde_json::from_slice(data)?;
        Ok(Self::new(features))
    }

    /// First feature located exactly at `point`.
    pub fn find_exact(&self, point: &Point) -> Option<&Feature> {
        self.features.iter().find(|f| f.location == *point)
    }

    /// Number of features located exactly at `point`, duplicates included.
    pub fn count_exact(&self, point: &Point) -> usize {
        self.features.iter().filter(|f| f.location == *point).count()
    }

    /// Features inside `rect`, in load order.
    ///
    /// Each call starts a fresh scan.
    pub fn find_in_region<'a>(
        &'a self,
        rect: &Rectangle,
    ) -> impl Iterator<Item = &'a Feature> + 'a {
        let bounds = rect.normalized();
        self.features
            .iter()
            .filter(move |f| contains_point(&bounds, &f.location))
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
