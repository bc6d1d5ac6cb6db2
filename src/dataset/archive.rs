//! On-disk handling of the exported dataset archive.
//!
//! The backend streams a zip; we stage it next to its final location, check
//! that it really is a readable archive, then move it into place under the
//! fixed name so the training tooling can pick it up.

use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Fixed filename for exported dataset archives.
pub const EXPORT_ARCHIVE_NAME: &str = "data.zip";

/// Errors raised while staging, validating, or persisting the archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Downloaded payload is not a readable zip archive: {0}")]
    Malformed(String),
    #[error("Failed to move archive into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Create a staging file in the target directory, creating the directory
/// first. Staging in the same directory keeps the final move atomic.
pub fn stage_archive(dir: &Path) -> Result<NamedTempFile, ArchiveError> {
    std::fs::create_dir_all(dir)?;
    Ok(NamedTempFile::new_in(dir)?)
}

/// Check that the staged payload is a non-empty zip archive.
pub fn verify_archive(file: &mut File) -> Result<(), ArchiveError> {
    file.rewind()?;
    let archive =
        zip::ZipArchive::new(&mut *file).map_err(|err| ArchiveError::Malformed(err.to_string()))?;
    if archive.is_empty() {
        return Err(ArchiveError::Malformed("archive has no entries".into()));
    }
    Ok(())
}

/// Validate the staged payload and move it into place as `data.zip`,
/// replacing any archive from a previous export.
pub fn finalize_export(mut staged: NamedTempFile, dir: &Path) -> Result<PathBuf, ArchiveError> {
    verify_archive(staged.as_file_mut())?;
    let path = dir.join(EXPORT_ARCHIVE_NAME);
    staged
        .persist(&path)
        .map_err(|err| ArchiveError::Persist {
            path: path.clone(),
            source: err.error,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_zip_payload(target: &mut impl Write, entries: &[(&str, &[u8])]) {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (name, data) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
            writer.finish().unwrap();
        }
        target.write_all(cursor.get_ref()).unwrap();
    }

    #[test]
    fn finalize_places_archive_under_fixed_name() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("downloads");
        let mut staged = stage_archive(&target).unwrap();
        write_zip_payload(
            &mut staged,
            &[("train/a.png", b"aa"), ("val/b.png", b"bb")],
        );

        let path = finalize_export(staged, &target).unwrap();
        assert_eq!(path, target.join(EXPORT_ARCHIVE_NAME));
        assert!(path.is_file());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn finalize_replaces_a_previous_export() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("downloads");

        let mut first = stage_archive(&target).unwrap();
        write_zip_payload(&mut first, &[("train/a.png", b"old")]);
        finalize_export(first, &target).unwrap();
        let old_len = std::fs::metadata(target.join(EXPORT_ARCHIVE_NAME))
            .unwrap()
            .len();

        let mut second = stage_archive(&target).unwrap();
        write_zip_payload(
            &mut second,
            &[("train/a.png", b"new"), ("test/b.png", b"more data here")],
        );
        finalize_export(second, &target).unwrap();

        let new_len = std::fs::metadata(target.join(EXPORT_ARCHIVE_NAME))
            .unwrap()
            .len();
        assert_ne!(old_len, new_len);
    }

    #[test]
    fn garbage_payload_is_rejected() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("downloads");
        let mut staged = stage_archive(&target).unwrap();
        staged.write_all(b"<html>definitely not a zip</html>").unwrap();

        let err = finalize_export(staged, &target).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
        assert!(!target.join(EXPORT_ARCHIVE_NAME).exists());
    }

    #[test]
    fn empty_archive_is_rejected() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("downloads");
        let mut staged = stage_archive(&target).unwrap();
        write_zip_payload(&mut staged, &[]);

        let err = finalize_export(staged, &target).unwrap_err();
        assert!(matches!(err, ArchiveError::Malformed(_)));
    }
}
