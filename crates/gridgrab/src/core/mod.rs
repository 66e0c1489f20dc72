//! Post-processing orchestration.
//!
//! - **Configuration** (`config`): `EngineConfig` loading, discovery and validation
//! - **Pipeline** (`pipeline`): one pass from an `OcrPage` to output text and table
//! - **Gate** (`gate`): single-flight guard and request tokens
//! - **Session** (`session`): capture, double OCR pass, commit of the latest result
//!
//! # Example
//!
//! ```rust
//! use gridgrab::core::config::EngineConfig;
//! use gridgrab::core::pipeline::post_process;
//! use gridgrab::types::{Line, OcrPage, Rect, Word};
//!
//! let page = OcrPage {
//!     lines: vec![Line::new(0, vec![
//!         Word::new("Hello", Rect::from_xywh(0.0, 0.0, 40.0, 12.0), 0),
//!         Word::new("world", Rect::from_xywh(48.0, 0.0, 40.0, 12.0), 0),
//!     ])],
//!     language: "en-US".to_string(),
//!     width: 100,
//!     height: 20,
//!     ..Default::default()
//! };
//!
//! let output = post_process(&page, &EngineConfig::default(), None);
//! assert_eq!(output.text, "Hello world\n");
//! ```

pub mod config;
pub mod gate;
pub mod pipeline;
#[cfg(all(feature = "raster", feature = "tokio-runtime"))]
pub mod session;

pub use config::{EngineConfig, ScaleConfig, SearchConfig, TableConfig, TableUnit};
pub use gate::{InferenceGate, PassGuard, RequestToken};
pub use pipeline::{PassOutput, post_process, text_at_point};
#[cfg(all(feature = "raster", feature = "tokio-runtime"))]
pub use session::{CaptureSession, PassStatus};
