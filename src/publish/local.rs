//! Local-directory and in-memory publishers

use crate::publish::{PublishError, PublishResult, Publisher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;

/// Writes feeds below a directory, using the output path as a relative file path
pub struct LocalPublisher {
    base_path: PathBuf,
}

impl LocalPublisher {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolves `path` below the base directory, rejecting escapes
    fn full_path(&self, path: &str) -> PublishResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(PublishError::Upload {
                path: path.to_string(),
                message: "output path must be relative and stay inside the publish directory"
                    .to_string(),
            });
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl Publisher for LocalPublisher {
    async fn publish(
        &self,
        path: &str,
        content: Vec<u8>,
        _content_type: &str,
    ) -> PublishResult<()> {
        let full_path = self.full_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, content).await?;

        tracing::info!("Wrote feed to {}", full_path.display());
        Ok(())
    }
}

/// A document captured by [`MemoryPublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDocument {
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Keeps published feeds in memory, keyed by output path
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    documents: Arc<Mutex<HashMap<String, PublishedDocument>>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document last published under `path`
    pub fn get(&self, path: &str) -> Option<PublishedDocument> {
        self.lock().get(path).cloned()
    }

    /// Output paths that have been published, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PublishedDocument>> {
        // A poisoned map still holds every completed insert
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(
        &self,
        path: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> PublishResult<()> {
        self.lock().insert(
            path.to_string(),
            PublishedDocument {
                content,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
