use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ResolveResource, ResourceRef, copy_absolute, prepare_target};
use crate::TRACING_TARGET_RESOURCE;
use crate::error::{Error, Result};

/// Resources stored in a directory, usually the one holding the exam file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct DirectoryContext {
    root_path: PathBuf,
}

impl DirectoryContext {
    /// Creates a context resolving paths against `root_path`.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// Returns the directory resources are resolved against.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl ResolveResource for DirectoryContext {
    fn resolve_and_copy(&self, resource: &ResourceRef, destination: &Path) -> Result<PathBuf> {
        fs::create_dir_all(destination)?;

        if resource.is_absolute() {
            return copy_absolute(resource.as_path(), destination);
        }

        let source = self.root_path.join(resource.as_path());
        let target = prepare_target(resource.as_path(), destination)?;
        fs::copy(&source, &target).map_err(|err| {
            Error::from(err).with_message(format!("could not copy {}", source.display()))
        })?;

        tracing::debug!(
            target: TRACING_TARGET_RESOURCE,
            resource = %resource,
            source = %source.display(),
            target = %target.display(),
            "Copied resource from directory"
        );

        Ok(target)
    }
}
