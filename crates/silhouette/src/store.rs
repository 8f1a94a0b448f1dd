use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    types::Silhouette,
};

/// A named, persisted silhouette plus the descriptor captured when the
/// operator confirmed it. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedObject {
    pub name: String,
    pub contour: Silhouette,
    pub angle: f64,
    pub center: [f64; 2],
}

impl LearnedObject {
    pub fn new(name: String, contour: Silhouette, angle: f64, center: [f64; 2]) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            name,
            contour,
            angle,
            center,
        })
    }
}

/// Durable, ordered collection of learned objects backed by a single
/// JSON file. A load failure of any kind yields an empty store: a fresh
/// system with nothing learned is a valid start state. Save rewrites the
/// entire collection, which keeps the file valid across crashes at the
/// cost of an O(n) rewrite per save; saves are human-paced.
#[derive(Debug)]
pub struct ObjectStore {
    path: PathBuf,
    objects: Vec<LearnedObject>,
}

impl ObjectStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let objects = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<LearnedObject>>(&contents) {
                Ok(objects) => {
                    info!(count = objects.len(), path = %path.display(), "loaded object store");
                    objects
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "corrupt object store, starting empty");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "no readable object store, starting empty");
                Vec::new()
            }
        };
        Self { path, objects }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn objects(&self) -> &[LearnedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append the object in memory, then persist the whole collection.
    /// Single writer assumed.
    pub fn save(&mut self, object: LearnedObject) -> Result<()> {
        self.objects.push(object);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(&self.objects)?;
        fs::write(&self.path, serialized)?;
        info!(count = self.objects.len(), path = %self.path.display(), "object store saved");
        Ok(())
    }
}
