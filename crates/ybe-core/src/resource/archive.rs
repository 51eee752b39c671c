use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zip::ZipArchive;

use super::{ResolveResource, ResourceRef, copy_absolute, prepare_target};
use crate::TRACING_TARGET_RESOURCE;
use crate::error::{Error, Result};

/// Resources stored inside a zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct ArchiveContext {
    archive_path: PathBuf,
}

impl ArchiveContext {
    /// Creates a context extracting from the archive at `archive_path`.
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
        }
    }

    /// Returns the path of the backing archive.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    fn open(&self) -> Result<ZipArchive<File>> {
        let file = File::open(&self.archive_path).map_err(|err| {
            Error::from(err).with_message(format!(
                "could not open archive {}",
                self.archive_path.display()
            ))
        })?;
        Ok(ZipArchive::new(file)?)
    }
}

/// Archive entry name of a relative resource path, always `/`-separated.
fn entry_name(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl ResolveResource for ArchiveContext {
    fn resolve_and_copy(&self, resource: &ResourceRef, destination: &Path) -> Result<PathBuf> {
        fs::create_dir_all(destination)?;

        if resource.is_absolute() {
            return copy_absolute(resource.as_path(), destination);
        }

        let target = prepare_target(resource.as_path(), destination)?;
        let name = entry_name(resource.as_path());

        let mut archive = self.open()?;
        let mut entry = archive.by_name(&name).map_err(|err| {
            Error::from(err).with_message(format!(
                "{name} not found in {}",
                self.archive_path.display()
            ))
        })?;

        let mut output = File::create(&target)?;
        io::copy(&mut entry, &mut output)?;

        tracing::debug!(
            target: TRACING_TARGET_RESOURCE,
            resource = %resource,
            archive = %self.archive_path.display(),
            target = %target.display(),
            "Extracted resource from archive"
        );

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::error::ErrorKind;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_nested_entry() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive_path = temp.path().join("exam.zip");
        write_archive(&archive_path, &[("pics/a.png", b"zipped"), ("exam.ybe", b"")]);

        let context = ArchiveContext::new(&archive_path);
        let destination = temp.path().join("out");
        let copied = context
            .resolve_and_copy(&ResourceRef::new("pics/a.png"), &destination)
            .unwrap();

        assert_eq!(copied, destination.join("pics/a.png"));
        assert_eq!(fs::read(copied).unwrap(), b"zipped");
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive_path = temp.path().join("exam.zip");
        write_archive(&archive_path, &[("exam.ybe", b"")]);

        let context = ArchiveContext::new(&archive_path);
        let error = context
            .resolve_and_copy(&ResourceRef::new("pics/b.png"), &temp.path().join("out"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_archive_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let context = ArchiveContext::new(temp.path().join("absent.zip"));
        let error = context
            .resolve_and_copy(&ResourceRef::new("a.png"), &temp.path().join("out"))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(entry_name(Path::new("./pics/a.png")), "pics/a.png");
    }
}
