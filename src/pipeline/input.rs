//! Input resolution: validate the user-supplied PDF path.
//!
//! ## Why check magic bytes here?
//!
//! pdfium's error for a non-PDF file is a generic load failure. Checking the
//! `%PDF` magic bytes up front gives callers a meaningful "this is not a
//! PDF" error (with the offending bytes) rather than a cryptic decoder
//! message — and it happens before any page processing begins, so a bad
//! input never produces partial work.

use crate::error::PdfmdError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_input(path_str: &str) -> Result<PathBuf, PdfmdError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(PdfmdError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            // Verify PDF magic bytes
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfmdError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfmdError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfmdError::FileNotFound { path });
        }
    }

    debug!("Resolved input PDF: {}", path.display());
    Ok(path)
}

/// Derive the default output path: the input path with a `.md` extension.
pub fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension("md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_file_not_found() {
        let err = resolve_input("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, PdfmdError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_content_is_rejected_with_magic() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not a pdf at all").expect("write");
        let err = resolve_input(tmp.path().to_str().unwrap()).unwrap_err();
        match err {
            PdfmdError::NotAPdf { magic, .. } => assert_eq!(&magic, b"not "),
            other => panic!("expected NotAPdf, got: {other}"),
        }
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"%PDF-1.7\n...").expect("write");
        let path = resolve_input(tmp.path().to_str().unwrap()).expect("resolve");
        assert_eq!(path, tmp.path());
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            derive_output_path(Path::new("dir/report.pdf")),
            PathBuf::from("dir/report.md")
        );
        assert_eq!(
            derive_output_path(Path::new("no_extension")),
            PathBuf::from("no_extension.md")
        );
    }
}
