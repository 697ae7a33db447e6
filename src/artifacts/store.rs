//! Artifact store
//!
//! Loads the trained classifier and class dictionary exactly once per process
//! and hands out shared read-only references. Classification before `load()`
//! completes is a precondition violation surfaced as a typed error, so the
//! servers load artifacts before binding their listeners.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::info;

use crate::config::ArtifactsConfig;
use crate::engine::classifier::{Classifier, LinearClassifier};
use crate::engine::features::FEATURE_LEN;
use crate::error::{Error, Result};

use super::class_map::ClassMap;

/// The read-only artifact set shared by all classification calls.
#[derive(Clone)]
pub struct LoadedArtifacts {
    pub classifier: Arc<dyn Classifier>,
    pub classes: Arc<ClassMap>,
}

impl std::fmt::Debug for LoadedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifacts")
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

pub struct ArtifactStore {
    classifier_path: PathBuf,
    class_dictionary_path: PathBuf,
    loaded: RwLock<Option<LoadedArtifacts>>,
}

impl ArtifactStore {
    pub fn new(config: &ArtifactsConfig) -> Self {
        Self {
            classifier_path: config.classifier_path(),
            class_dictionary_path: config.class_dictionary_path(),
            loaded: RwLock::new(None),
        }
    }

    /// Read the artifacts from disk. Idempotent: a second call is a no-op.
    pub fn load(&self) -> Result<()> {
        if self.loaded.read().is_some() {
            return Ok(());
        }

        let mut guard = self.loaded.write();
        // Double-check after acquiring the write lock.
        if guard.is_some() {
            return Ok(());
        }

        info!("Loading artifacts from {:?}", self.classifier_path.parent());
        let start = Instant::now();

        let classes = ClassMap::load(&self.class_dictionary_path)?;
        if classes.is_empty() {
            return Err(Error::Artifact("class dictionary is empty".into()));
        }

        let classifier = LinearClassifier::load(&self.classifier_path)?;
        if classifier.n_features() != FEATURE_LEN {
            return Err(Error::InvalidModel(format!(
                "classifier expects {} features, pipeline produces {}",
                classifier.n_features(),
                FEATURE_LEN
            )));
        }
        if classifier.n_classes() != classes.len() {
            return Err(Error::InvalidModel(format!(
                "classifier has {} classes, dictionary has {}",
                classifier.n_classes(),
                classes.len()
            )));
        }

        *guard = Some(LoadedArtifacts {
            classifier: Arc::new(classifier),
            classes: Arc::new(classes),
        });

        info!("Artifacts loaded in {:?}", start.elapsed());
        Ok(())
    }

    /// Install an already-materialized artifact set, bypassing disk.
    pub fn install(&self, artifacts: LoadedArtifacts) {
        *self.loaded.write() = Some(artifacts);
    }

    /// Get the loaded artifact set, failing if `load()` has not completed.
    pub fn get(&self) -> Result<LoadedArtifacts> {
        self.loaded
            .read()
            .as_ref()
            .cloned()
            .ok_or(Error::ArtifactsNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.read().is_some()
    }
}
