//! Scratch storage for uploads.
//!
//! An upload lives in `UPLOAD_DIR` only while it is being analysed. `ScratchFile`
//! owns the file and removes it when dropped, so every exit path cleans up.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tempfile::NamedTempFile;

use crate::errors::AppError;

/// True when the name's suffix after the last dot is `pdf`, ignoring case.
pub fn is_pdf_filename(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// Reduces a client-supplied filename to a safe single path component.
///
/// Directory separators become spaces, anything outside `[A-Za-z0-9_.-]` is dropped,
/// whitespace runs collapse to `_`, and leading/trailing dots and underscores are
/// stripped. Returns an empty string when nothing safe remains.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// A temporary copy of an upload, deleted on drop.
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Writes `bytes` to a uniquely named file in `dir` whose name ends with the sanitized
    /// client filename.
    pub fn create(dir: &Path, client_name: &str, bytes: &[u8]) -> Result<Self, AppError> {
        let safe = sanitize_filename(client_name);
        let suffix = if safe.is_empty() {
            "upload.pdf".to_string()
        } else {
            format!("-{safe}")
        };

        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .with_context(|| format!("creating scratch file in {}", dir.display()))?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .context("writing scratch file")?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the file now, reporting any removal error. Dropping also deletes it.
    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("resume.pdf"));
        assert!(is_pdf_filename("Resume.PDF"));
        assert!(is_pdf_filename("my.resume.v2.Pdf"));
        assert!(!is_pdf_filename("resume.docx"));
        assert!(!is_pdf_filename("resume.pdf.exe"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename(""));
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\..\\win.ini"), "win.ini");
        assert!(!sanitize_filename("/tmp/../x.pdf").contains('/'));
    }

    #[test]
    fn test_sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_filename("My Resume 2024.pdf"), "My_Resume_2024.pdf");
        assert_eq!(sanitize_filename("cv-final_v2.pdf"), "cv-final_v2.pdf");
    }

    #[test]
    fn test_sanitize_drops_unsafe_characters() {
        assert_eq!(sanitize_filename("résumé<>|*.pdf"), "rsum.pdf");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_scratch_file_written_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchFile::create(dir.path(), "../cv.pdf", b"%PDF-1.4").unwrap();
            let path = scratch.path().to_path_buf();
            assert_eq!(path.parent(), Some(dir.path()));
            assert!(path.file_name().unwrap().to_str().unwrap().ends_with("-cv.pdf"));
            assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_file_close_removes() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::create(dir.path(), "cv.pdf", b"x").unwrap();
        let path = scratch.path().to_path_buf();
        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_same_client_name_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFile::create(dir.path(), "cv.pdf", b"a").unwrap();
        let b = ScratchFile::create(dir.path(), "cv.pdf", b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
