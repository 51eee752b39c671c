//! Resource addressing.
//!
//! Rich text can reference external files such as images. A [`ResourceRef`]
//! names such a file relative to the exam it belongs to, and a
//! [`ResourceContext`] knows where that exam came from: a directory or an
//! archive. Copying a resource resolves its path against the context and
//! writes it under a destination directory, preserving the relative layout.

mod archive;
mod directory;
mod reference;

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use self::archive::ArchiveContext;
pub use self::directory::DirectoryContext;
pub use self::reference::ResourceRef;
use crate::error::{Error, Result};

/// Resolves resources against a backing store and copies them out.
pub trait ResolveResource {
    /// Copies `resource` into `destination`, returning the path written.
    ///
    /// # Errors
    ///
    /// Returns a [`NotFound`](crate::ErrorKind::NotFound) error if the file or
    /// archive entry does not exist.
    fn resolve_and_copy(&self, resource: &ResourceRef, destination: &Path) -> Result<PathBuf>;
}

/// The origin of an exam's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceContext {
    /// Resources stored inside a zip archive.
    Archive(ArchiveContext),
    /// Resources stored in a directory tree.
    Directory(DirectoryContext),
}

impl ResourceContext {
    /// Creates an archive-backed context.
    pub fn archive(archive_path: impl Into<PathBuf>) -> Self {
        Self::Archive(ArchiveContext::new(archive_path))
    }

    /// Creates a directory-backed context.
    pub fn directory(root_path: impl Into<PathBuf>) -> Self {
        Self::Directory(DirectoryContext::new(root_path))
    }
}

impl ResolveResource for ResourceContext {
    fn resolve_and_copy(&self, resource: &ResourceRef, destination: &Path) -> Result<PathBuf> {
        match self {
            Self::Archive(context) => context.resolve_and_copy(resource, destination),
            Self::Directory(context) => context.resolve_and_copy(resource, destination),
        }
    }
}

/// Copies an absolutely addressed resource into `destination`, keeping its name.
fn copy_absolute(source: &Path, destination: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        Error::invalid_input().with_message(format!("{} has no file name", source.display()))
    })?;

    let target = destination.join(file_name);
    fs::copy(source, &target).map_err(|err| {
        Error::from(err).with_message(format!("could not copy {}", source.display()))
    })?;
    Ok(target)
}

/// Prepares the target path of a relatively addressed resource.
///
/// Creates `destination` and the resource's parent directories below it.
/// Paths leaving `destination` through `..` or a root are rejected.
fn prepare_target(relative: &Path, destination: &Path) -> Result<PathBuf> {
    let escapes = relative.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::invalid_input().with_message(format!(
            "resource path {} leaves the destination directory",
            relative.display()
        )));
    }

    let target = destination.join(relative);
    let parent = target.parent().unwrap_or(destination);
    fs::create_dir_all(parent)?;
    Ok(target)
}
