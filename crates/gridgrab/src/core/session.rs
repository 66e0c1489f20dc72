//! Capture sessions.
//!
//! A [`CaptureSession`] owns the latest capture of a screen region: it runs the
//! OCR backend (twice, the second time at the scale the first pass suggests),
//! post-processes the page and keeps the committed [`PassOutput`]. Follow-up
//! requests (a new search query, a config change) re-run only the
//! post-processing over the committed page.
//!
//! Requests never queue. Each one updates the session inputs and bumps the
//! request generation; whichever caller holds the [`InferenceGate`] keeps
//! recomputing until its result matches the latest generation, and callers
//! that find the gate busy return [`PassStatus::Coalesced`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;
use parking_lot::Mutex;

use super::config::EngineConfig;
use super::gate::{InferenceGate, RequestToken};
use super::pipeline::{PassOutput, post_process};
use crate::ocr::{OcrBackend, pad_image, scale_uniform};
use crate::types::OcrPage;
use crate::{GridgrabError, Result};

/// What became of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum PassStatus {
    /// The request's own result was committed.
    Committed(PassOutput),
    /// A newer request replaced this one's inputs before it committed.
    Superseded,
    /// Another pass was running; it picks up this request's inputs.
    Coalesced,
    /// There is no capture to process.
    Idle,
}

impl PassStatus {
    pub fn output(&self) -> Option<&PassOutput> {
        match self {
            PassStatus::Committed(output) => Some(output),
            _ => None,
        }
    }

    pub fn into_output(self) -> Option<PassOutput> {
        match self {
            PassStatus::Committed(output) => Some(output),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    config: EngineConfig,
    page: Option<OcrPage>,
    query: Option<String>,
    output: Option<PassOutput>,
    committed: Option<RequestToken>,
}

pub struct CaptureSession<B: OcrBackend> {
    backend: Arc<B>,
    gate: InferenceGate,
    captures: AtomicU64,
    state: Mutex<SessionState>,
}

impl<B: OcrBackend> CaptureSession<B> {
    /// # Errors
    ///
    /// Returns `GridgrabError::Validation` when `config` is invalid.
    pub fn new(backend: B, config: EngineConfig) -> Result<Self> {
        Self::with_shared_backend(Arc::new(backend), config)
    }

    pub fn with_shared_backend(backend: Arc<B>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            gate: InferenceGate::new(),
            captures: AtomicU64::new(0),
            state: Mutex::new(SessionState {
                config,
                ..Default::default()
            }),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> EngineConfig {
        self.state.lock().config.clone()
    }

    /// The latest committed output.
    pub fn committed(&self) -> Option<PassOutput> {
        self.state.lock().output.clone()
    }

    /// The page of the latest capture, in capture coordinates.
    pub fn page(&self) -> Option<OcrPage> {
        self.state.lock().page.clone()
    }

    pub fn query(&self) -> Option<String> {
        self.state.lock().query.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Recognizes `image` and post-processes the result.
    ///
    /// A new capture replaces the previous page and clears the search query.
    ///
    /// # Errors
    ///
    /// Backend failures, unsupported languages and raster errors propagate.
    pub async fn grab(&self, image: &RgbaImage) -> Result<PassStatus> {
        let capture = self.captures.fetch_add(1, Ordering::AcqRel) + 1;
        let config = self.config();

        let page = self.recognize(image, &config).await?;

        let token = {
            let mut state = self.state.lock();
            if self.captures.load(Ordering::Acquire) != capture {
                tracing::debug!("capture {} superseded during recognition", capture);
                return Ok(PassStatus::Superseded);
            }
            state.page = Some(page);
            state.query = None;
            state.output = None;
            self.gate.request()
        };

        self.drive(token).await
    }

    /// Re-runs post-processing over the committed page with a new query.
    pub async fn research(&self, query: &str) -> Result<PassStatus> {
        let token = {
            let mut state = self.state.lock();
            if state.page.is_none() {
                return Ok(PassStatus::Idle);
            }
            state.query = Some(query.to_string());
            self.gate.request()
        };

        self.drive(token).await
    }

    /// Replaces the configuration and re-runs post-processing over the
    /// committed page, if any.
    ///
    /// # Errors
    ///
    /// Returns `GridgrabError::Validation` when `config` is invalid; the
    /// previous configuration is kept in that case.
    pub async fn reprocess(&self, config: EngineConfig) -> Result<PassStatus> {
        config.validate()?;

        let token = {
            let mut state = self.state.lock();
            state.config = config;
            if state.page.is_none() {
                return Ok(PassStatus::Idle);
            }
            self.gate.request()
        };

        self.drive(token).await
    }

    /// Discards the capture and its output. Passes still in flight will not
    /// commit.
    pub fn reset(&self) {
        self.captures.fetch_add(1, Ordering::AcqRel);

        let mut state = self.state.lock();
        state.page = None;
        state.query = None;
        state.output = None;
        self.gate.invalidate();
        state.committed = Some(self.gate.current());
    }

    async fn recognize(&self, image: &RgbaImage, config: &EngineConfig) -> Result<OcrPage> {
        let language = config.language.as_deref().unwrap_or("");
        if !language.is_empty() && !self.backend.supports_language(language) {
            return Err(GridgrabError::validation(format!(
                "OCR backend '{}' does not support language '{}'",
                self.backend.name(),
                language
            )));
        }

        let padded = pad_image(image, config.scale.min_pad_width, config.scale.min_pad_height);
        let first = self.backend.recognize(&padded.image, language).await?;

        let max_dimension = self
            .backend
            .max_image_dimension()
            .unwrap_or(config.scale.max_image_dimension);
        let scale = config.scale.advisor().ideal_scale(
            &first.word_heights(),
            padded.image.width(),
            padded.image.height(),
            max_dimension,
        );

        let page = if (scale - 1.0).abs() < f64::EPSILON {
            first
        } else {
            let scaled = scale_uniform(&padded.image, scale)?;
            tracing::debug!(
                "second {} pass at scale {:.3} ({}x{})",
                self.backend.name(),
                scale,
                scaled.width(),
                scaled.height()
            );
            self.backend.recognize(&scaled, language).await?
        };

        Ok(page.into_native(scale, padded.offset, image.width(), image.height()))
    }

    async fn drive(&self, token: RequestToken) -> Result<PassStatus> {
        let mut mine = None;

        loop {
            let Some(guard) = self.gate.try_enter() else {
                tracing::debug!("pass in flight, coalescing request");
                return Ok(mine.map_or(PassStatus::Coalesced, PassStatus::Committed));
            };

            loop {
                let (current, page, config, query) = {
                    let state = self.state.lock();
                    (
                        self.gate.current(),
                        state.page.clone(),
                        state.config.clone(),
                        state.query.clone(),
                    )
                };

                let Some(page) = page else {
                    self.state.lock().committed = Some(current);
                    break;
                };

                let output = run_blocking(page, config, query).await?;

                let mut state = self.state.lock();
                if self.gate.is_current(current) {
                    state.output = Some(output.clone());
                    state.committed = Some(current);
                    if current == token {
                        mine = Some(output);
                    }
                    break;
                }
                tracing::debug!("inputs changed during pass, recomputing");
            }

            drop(guard);

            let settled = {
                let state = self.state.lock();
                state.committed.is_some_and(|committed| self.gate.is_current(committed))
            };
            if settled {
                break;
            }
        }

        Ok(mine.map_or(PassStatus::Superseded, PassStatus::Committed))
    }
}

async fn run_blocking(page: OcrPage, config: EngineConfig, query: Option<String>) -> Result<PassOutput> {
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _guard = span.entered();
        post_process(&page, &config, query.as_deref())
    })
    .await
    .map_err(|e| GridgrabError::Other(format!("Post-processing task failed: {}", e)))
}
