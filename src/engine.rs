//! The optical recognition engine seam.
//!
//! The pipeline talks to OCR through the [`RecognitionEngine`] trait rather
//! than calling Tesseract directly. This keeps the collaborator swappable:
//! tests inject counting/fake engines (no Tesseract installation needed),
//! and embedders can plug in their own OCR stack via
//! [`crate::config::ConversionConfigBuilder::engine`].
//!
//! The default implementation, [`TesseractEngine`], wraps `leptess`. It is
//! constructed lazily — only when the first page actually needs recognition —
//! so a purely text-layer document converts successfully on a machine with
//! no Tesseract at all.

use crate::error::PdfmdError;
use crate::pipeline::encode;
use image::DynamicImage;
use leptess::LepTess;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A synchronous optical recognition engine.
///
/// Given a rendered page bitmap and a set of language hints, return the
/// recognised text. An empty string is a valid result (nothing legible on
/// the page); errors are reserved for the engine itself being broken.
///
/// The call has no timeout: a pathological bitmap can keep the engine busy
/// indefinitely, and the conversion blocks with it.
pub trait RecognitionEngine: Send + Sync {
    /// Recognise text in `image` using the given Tesseract-style language
    /// codes (e.g. `["eng"]`, `["kor", "eng"]`).
    fn recognize(&self, image: &DynamicImage, languages: &[String]) -> Result<String, PdfmdError>;
}

/// Tesseract-backed [`RecognitionEngine`] via `leptess`.
///
/// `LepTess` is `Send` but not `Sync` and needs `&mut` for every call, so a
/// single instance lives behind a `Mutex` together with the language string
/// it was initialised for. If a call requests a different language set the
/// instance is re-initialised in place; in practice the languages are fixed
/// for a whole conversion and this never triggers.
pub struct TesseractEngine {
    inner: Mutex<(String, LepTess)>,
}

impl TesseractEngine {
    /// Initialise Tesseract for the given language codes.
    ///
    /// # Errors
    /// [`PdfmdError::EngineUnavailable`] when Tesseract or the requested
    /// language data cannot be loaded.
    pub fn new(languages: &[String]) -> Result<Self, PdfmdError> {
        let lang = join_languages(languages);
        let tess = init_leptess(&lang)?;
        debug!("Tesseract engine initialised for '{}'", lang);
        Ok(Self {
            inner: Mutex::new((lang, tess)),
        })
    }
}

impl RecognitionEngine for TesseractEngine {
    // Errors carry page ordinal 0 here; the pipeline's recognition stage
    // rewrites it to the actual page before propagating.
    fn recognize(&self, image: &DynamicImage, languages: &[String]) -> Result<String, PdfmdError> {
        let png = encode::encode_bitmap(image).map_err(|e| PdfmdError::RecognitionFailed {
            page: 0,
            detail: format!("PNG encoding failed: {e}"),
        })?;

        let requested = join_languages(languages);
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| PdfmdError::Internal("recognition engine mutex poisoned".into()))?;

        if guard.0 != requested {
            debug!("Re-initialising Tesseract: '{}' → '{}'", guard.0, requested);
            guard.1 = init_leptess(&requested)?;
            guard.0 = requested;
        }

        let (_, tess) = &mut *guard;
        tess.set_image_from_mem(&png)
            .map_err(|e| PdfmdError::RecognitionFailed {
                page: 0,
                detail: format!("failed to load bitmap into Tesseract: {e}"),
            })?;

        tess.get_utf8_text()
            .map_err(|e| PdfmdError::RecognitionFailed {
                page: 0,
                detail: format!("Tesseract produced invalid UTF-8: {e}"),
            })
    }
}

/// Deferred engine resolution for one conversion run.
///
/// Mirrors the precedence of the config: a caller-injected engine wins;
/// otherwise a [`TesseractEngine`] is built from the configured languages —
/// but only on the first `get()` call. A conversion that never reaches the
/// recognition path never resolves an engine, which is what lets purely
/// text-layer documents convert on machines without Tesseract.
pub struct LazyEngine {
    injected: Option<Arc<dyn RecognitionEngine>>,
    languages: Vec<String>,
    default_engine: Option<TesseractEngine>,
}

impl LazyEngine {
    /// Capture the engine-relevant parts of the config without resolving
    /// anything yet.
    pub fn new(config: &crate::config::ConversionConfig) -> Self {
        Self {
            injected: config.engine.clone(),
            languages: config.languages.clone(),
            default_engine: None,
        }
    }

    /// Resolve the engine, constructing the Tesseract default on first use.
    ///
    /// # Errors
    /// [`PdfmdError::EngineUnavailable`] when no engine was injected and
    /// Tesseract cannot be initialised.
    pub fn get(&mut self) -> Result<&dyn RecognitionEngine, PdfmdError> {
        if let Some(ref engine) = self.injected {
            return Ok(engine.as_ref());
        }
        match self.default_engine {
            Some(ref engine) => Ok(engine),
            None => {
                let engine = TesseractEngine::new(&self.languages)?;
                let engine: &TesseractEngine = self.default_engine.insert(engine);
                Ok(engine)
            }
        }
    }
}

/// Join language codes into Tesseract's `lang1+lang2` syntax.
fn join_languages(languages: &[String]) -> String {
    languages.join("+")
}

fn init_leptess(lang: &str) -> Result<LepTess, PdfmdError> {
    LepTess::new(None, lang).map_err(|e| PdfmdError::EngineUnavailable {
        detail: format!("failed to initialise Tesseract for '{lang}': {e}"),
    })
}
