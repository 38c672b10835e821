//! Full-document conversion entry points.
//!
//! ## Ownership of the document handle
//!
//! The pdfium document handle is opened inside [`convert`] and lives only
//! for the duration of the page loop — it is read (never mutated) by every
//! page operation and released exactly once by RAII on every exit path,
//! including an early abort when a page hits a fatal error. Callers never
//! see the handle; they get back an owned [`ConversionOutput`].

use crate::config::ConversionConfig;
use crate::engine::LazyEngine;
use crate::error::PdfmdError;
use crate::output::{
    ConversionOutput, ConversionStats, DocumentMetadata, ExtractionMethod, PageExtraction,
};
use crate::pipeline::{self, input};
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Section body used for pages with no extractable text.
///
/// The wording matters less than the stability: downstream consumers key on
/// this exact string to detect blank pages, so it must not vary per page or
/// per run.
pub const EMPTY_PAGE_PLACEHOLDER: &str =
    "*[No text content on this page - may be image-based PDF]*";

/// Convert a PDF file to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_path` — Local file path to a PDF
/// * `config`     — Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` when every page was processed. Pages without
/// extractable text are included with placeholder sections — they are not
/// failures (check `output.stats.empty_pages`).
///
/// # Errors
/// Returns `Err(PdfmdError)` only for fatal errors:
/// - File not found / permission denied / not a PDF
/// - Document structure unreadable (corrupt, wrong password)
/// - A page could not be read or rendered
/// - Recognition was needed but the OCR engine is unavailable or failed
pub fn convert(
    input_path: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, PdfmdError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path);

    // ── Step 1: Resolve and validate input ───────────────────────────────
    let pdf_path = input::resolve_input(input_path)?;
    let title = derive_title(&pdf_path);

    // ── Step 2: Open the document ────────────────────────────────────────
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, &pdf_path, config.password.as_deref())?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 3: Extract each page in order ───────────────────────────────
    // The engine stays unresolved until the first page that needs OCR.
    let mut engine = LazyEngine::new(config);
    let mut results: Vec<PageExtraction> = Vec::with_capacity(total_pages);
    let mut recognition_duration_ms = 0u64;

    for index in 0..total_pages {
        let page_num = index + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let page_start = Instant::now();
        let extraction = pages
            .get(index as u16)
            .map_err(|e| PdfmdError::PageLoadFailed {
                page: page_num,
                detail: format!("{e:?}"),
            })
            .and_then(|page| pipeline::extract_page(&page, page_num, config, &mut engine));

        let extraction = match extraction {
            Ok(extraction) => extraction,
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total_pages, e.to_string());
                }
                return Err(e);
            }
        };

        if extraction.method == ExtractionMethod::Recognition {
            recognition_duration_ms += page_start.elapsed().as_millis() as u64;
        }
        debug!(
            "Page {}/{}: method={}, {} chars",
            page_num,
            total_pages,
            extraction.method,
            extraction.text.len()
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total_pages, extraction.method, extraction.text.len());
        }

        results.push(extraction);
    }

    // ── Step 4: Assemble the output document ─────────────────────────────
    let markdown = assemble_document(&title, &results);

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let text_layer_pages = results
        .iter()
        .filter(|p| p.success && p.method != ExtractionMethod::Recognition)
        .count();
    let recognized_pages = results
        .iter()
        .filter(|p| p.success && p.method == ExtractionMethod::Recognition)
        .count();
    let empty_pages = results.iter().filter(|p| !p.success).count();

    let stats = ConversionStats {
        total_pages,
        text_layer_pages,
        recognized_pages,
        empty_pages,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        recognition_duration_ms,
    };

    info!(
        "Conversion complete: {} pages with text ({} via OCR), {} empty, {}ms total",
        text_layer_pages + recognized_pages,
        recognized_pages,
        empty_pages,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages, text_layer_pages + recognized_pages);
    }

    Ok(ConversionOutput {
        markdown,
        title,
        pages: results,
        stats,
    })
}

/// Convert a PDF and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_to_file(
    input_path: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, PdfmdError> {
    let output = convert(input_path, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PdfmdError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    std::fs::write(&tmp_path, &output.markdown).map_err(|e| PdfmdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| PdfmdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(output.stats)
}

/// Convert PDF bytes in memory to Markdown.
///
/// Avoids the need for the caller to create a temporary file: the bytes are
/// written to a managed [`tempfile`] that is cleaned up automatically on
/// return or panic. Recommended when PDF data comes from a database or an
/// in-memory buffer rather than a file on disk.
pub fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, PdfmdError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| PdfmdError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PdfmdError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(&path, config)
}

/// Extract PDF metadata without converting content.
///
/// Never touches the text layer or the OCR engine.
pub fn inspect(input_path: impl AsRef<str>) -> Result<DocumentMetadata, PdfmdError> {
    let pdf_path = input::resolve_input(input_path.as_ref())?;
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, &pdf_path, None)?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Bind to a pdfium shared library: system-wide first, then next to the
/// executable. Binding failure is an error, not a panic — the CLI turns it
/// into a setup hint.
fn bind_pdfium() -> Result<Pdfium, PdfmdError> {
    Pdfium::bind_to_system_library()
        .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")))
        .map(Pdfium::new)
        .map_err(|e| PdfmdError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Open a document, mapping pdfium's load failure onto the password /
/// corruption taxonomy.
fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfmdError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{e:?}");
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfmdError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfmdError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfmdError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Derive the document title from the source filename (stem, no extension).
fn derive_title(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Assemble the final Markdown document from per-page results.
///
/// Layout contract: a `# <title>` line, then one `## Page N` section per
/// page in order, with exactly one blank line between consecutive sections
/// and a single trailing newline. Pages without text get the fixed
/// placeholder body. This spacing is relied on by downstream renderers, so
/// it is asserted by tests rather than left to taste.
fn assemble_document(title: &str, pages: &[PageExtraction]) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(pages.len() + 1);
    sections.push(format!("# {title}"));

    for page in pages {
        let body = if page.text.is_empty() {
            EMPTY_PAGE_PLACEHOLDER
        } else {
            page.text.as_str()
        };
        sections.push(format!("## Page {}\n\n{}", page.page_num, body));
    }

    let mut markdown = sections.join("\n\n");
    markdown.push('\n');
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(num: usize, text: &str, method: ExtractionMethod) -> PageExtraction {
        PageExtraction {
            page_num: num,
            text: text.to_string(),
            method,
            success: !text.is_empty(),
        }
    }

    #[test]
    fn single_text_page_layout() {
        let pages = vec![page(1, "Hello World", ExtractionMethod::Direct)];
        let md = assemble_document("doc", &pages);
        assert_eq!(md, "# doc\n\n## Page 1\n\nHello World\n");
    }

    #[test]
    fn empty_page_gets_placeholder_section() {
        let pages = vec![page(1, "", ExtractionMethod::Recognition)];
        let md = assemble_document("scan", &pages);
        assert_eq!(md, format!("# scan\n\n## Page 1\n\n{EMPTY_PAGE_PLACEHOLDER}\n"));
    }

    #[test]
    fn section_count_equals_page_count_in_order() {
        let pages = vec![
            page(1, "one", ExtractionMethod::Direct),
            page(2, "", ExtractionMethod::Recognition),
            page(3, "three", ExtractionMethod::Blocks),
        ];
        let md = assemble_document("doc", &pages);

        let headers: Vec<&str> = md.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(headers, vec!["## Page 1", "## Page 2", "## Page 3"]);
    }

    #[test]
    fn exactly_one_blank_line_between_sections() {
        let pages = vec![
            page(1, "alpha", ExtractionMethod::Direct),
            page(2, "beta", ExtractionMethod::Direct),
        ];
        let md = assemble_document("doc", &pages);
        assert_eq!(md, "# doc\n\n## Page 1\n\nalpha\n\n## Page 2\n\nbeta\n");
        assert!(!md.contains("\n\n\n"));
    }

    #[test]
    fn output_ends_with_single_newline() {
        let pages = vec![page(1, "text", ExtractionMethod::Direct)];
        let md = assemble_document("doc", &pages);
        assert!(md.ends_with('\n'));
        assert!(!md.ends_with("\n\n"));
    }

    #[test]
    fn multiline_page_text_is_preserved() {
        let pages = vec![page(1, "line one\nline two", ExtractionMethod::Structured)];
        let md = assemble_document("doc", &pages);
        assert!(md.contains("## Page 1\n\nline one\nline two\n"));
    }

    #[test]
    fn title_from_filename_stem() {
        assert_eq!(derive_title(Path::new("/tmp/report.pdf")), "report");
        assert_eq!(derive_title(Path::new("archive.tar.pdf")), "archive.tar");
        assert_eq!(derive_title(Path::new("noext")), "noext");
    }

    #[test]
    fn unicode_page_text_is_carried_verbatim() {
        let pages = vec![page(1, "스캔됨", ExtractionMethod::Recognition)];
        let md = assemble_document("scan", &pages);
        assert!(md.contains("## Page 1\n\n스캔됨\n"));
    }
}
