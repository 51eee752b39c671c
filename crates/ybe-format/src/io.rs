//! Reading and writing exam files and archives.
//!
//! Documents read from disk carry a resource context, so the resources their
//! text references can be copied out later with
//! [`ExamDocument::copy_resources`].

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use ybe_core::model::ExamDocument;
use ybe_core::resource::ResourceContext;

use crate::config::{ReaderConfig, WriterConfig};
use crate::error::LoadResult;
use crate::{ExamReader, ExamWriter, TRACING_TARGET_IO};

/// File extension of exam files.
pub const EXAM_EXTENSION: &str = "ybe";

/// Reads an exam from text. The document has no resource context.
pub fn read_str(text: &str, config: &ReaderConfig) -> LoadResult<ExamDocument> {
    ExamReader::new(config.clone()).read_str(text)
}

/// Reads an exam file.
///
/// Resources resolve relative to the directory containing the file.
pub fn read_file(path: impl AsRef<Path>, config: &ReaderConfig) -> LoadResult<ExamDocument> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let document = read_str(&text, config)?;

    let root = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    tracing::debug!(
        target: TRACING_TARGET_IO,
        path = %path.display(),
        questions = document.questions.len(),
        "Read exam file"
    );

    Ok(document.with_resource_context(ResourceContext::directory(root)))
}

/// Reads the first exam file inside a zip archive.
///
/// Resources resolve against entries of the same archive, relative to the
/// archive root.
pub fn read_zip(path: impl AsRef<Path>, config: &ReaderConfig) -> LoadResult<ExamDocument> {
    let path = path.as_ref();
    let mut archive = zip::ZipArchive::new(File::open(path)?).map_err(ybe_core::Error::from)?;

    let suffix = format!(".{EXAM_EXTENSION}");
    let mut text = None;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(ybe_core::Error::from)?;
        if entry.is_file() && entry.name().ends_with(&suffix) {
            tracing::debug!(
                target: TRACING_TARGET_IO,
                archive = %path.display(),
                entry = entry.name(),
                "Found exam in archive"
            );

            let mut content = String::new();
            entry.read_to_string(&mut content)?;
            text = Some(content);
            break;
        }
    }

    let text = text.ok_or_else(|| {
        ybe_core::Error::not_found().with_message(format!(
            "no '*.{EXAM_EXTENSION}' file in archive '{}'",
            path.display()
        ))
    })?;

    let document = read_str(&text, config)?;
    Ok(document.with_resource_context(ResourceContext::archive(path)))
}

/// Writes an exam as text.
pub fn write_string(document: &ExamDocument, config: &WriterConfig) -> String {
    ExamWriter::new(config.clone()).write_string(document)
}

/// Writes an exam file, creating missing parent directories.
pub fn write_file(
    document: &ExamDocument,
    path: impl AsRef<Path>,
    config: &WriterConfig,
) -> ybe_core::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let text = write_string(document, config);
    fs::write(path, &text)?;

    tracing::debug!(
        target: TRACING_TARGET_IO,
        path = %path.display(),
        bytes = text.len(),
        "Wrote exam file"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ybe_core::ErrorKind;
    use ybe_core::resource::ResourceRef;
    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::error::LoadError;

    const EXAM: &str = "\
schema_version: 0.3.0
questions:
-   text_only:
        id: intro
        text_markdown: 'See ![diagram](pics/diagram.png)'
";

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_read_file_copies_resources() {
        let source = tempfile::tempdir().unwrap();
        fs::create_dir(source.path().join("pics")).unwrap();
        fs::write(source.path().join("pics/diagram.png"), b"png").unwrap();
        fs::write(source.path().join("exam.ybe"), EXAM).unwrap();

        let document = read_file(source.path().join("exam.ybe"), &ReaderConfig::default()).unwrap();
        assert_eq!(
            document.list_resources(),
            vec![ResourceRef::new("pics/diagram.png").with_alt(Some("diagram".to_owned()))]
        );

        let target = tempfile::tempdir().unwrap();
        let copied = document.copy_resources(target.path()).unwrap();
        assert_eq!(copied, vec![target.path().join("pics/diagram.png")]);
        assert_eq!(fs::read(&copied[0]).unwrap(), b"png");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = read_file(dir.path().join("absent.ybe"), &ReaderConfig::default()).unwrap_err();
        match error {
            LoadError::Io(error) => assert_eq!(error.kind(), ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("exam.zip");
        write_zip(
            &archive,
            &[
                ("README.txt", b"not an exam"),
                ("exam.ybe", EXAM.as_bytes()),
                ("pics/diagram.png", b"png"),
            ],
        );

        let document = read_zip(&archive, &ReaderConfig::default()).unwrap();
        assert_eq!(document.questions.len(), 1);

        let target = tempfile::tempdir().unwrap();
        let copied = document.copy_resources(target.path()).unwrap();
        assert_eq!(fs::read(&copied[0]).unwrap(), b"png");
    }

    #[test]
    fn test_read_zip_without_exam() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("empty.zip");
        write_zip(&archive, &[("notes.txt", b"nothing here")]);

        match read_zip(&archive, &ReaderConfig::default()).unwrap_err() {
            LoadError::Io(error) => assert_eq!(error.kind(), ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_file_round_trip() {
        let document = read_str(EXAM, &ReaderConfig::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/exam.ybe");
        write_file(&document, &path, &WriterConfig::default()).unwrap();

        let read_back = read_file(&path, &ReaderConfig::default()).unwrap();
        assert_eq!(read_back.questions, document.questions);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            write_string(&document, &WriterConfig::default())
        );
    }
}
