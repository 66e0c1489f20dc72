//! gridgrab - OCR Result Post-Processing for Screen Grabs
//!
//! gridgrab takes what an OCR engine recognized in a captured screen region
//! (words with pixel bounding boxes, grouped into lines) and turns it into
//! clipboard-ready text. It joins words following the rules of the page's
//! language, restores right-to-left reading order, and can rebuild a table
//! from word positions alone so the result pastes into a spreadsheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gridgrab::{EngineConfig, load_page_file, post_process};
//!
//! # fn main() -> gridgrab::Result<()> {
//! let mut config = EngineConfig::discover()?.unwrap_or_default();
//! config.table.enabled = true;
//!
//! let page = load_page_file("capture.tsv", config.min_confidence)?;
//! let output = post_process(&page, &config, None);
//! println!("{}", output.text);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Text** (`text`): word joining, language profiles, letter/number repair, search selection
//! - **Table** (`table`): grid inference over bounding boxes and tab-separated assembly
//! - **OCR** (`ocr`): backend trait, scale advice, raster preparation, TSV/JSON input
//! - **Core** (`core`): configuration, the post-processing pipeline and capture sessions

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod ocr;
pub mod table;
pub mod text;
pub mod types;

pub use error::{GridgrabError, Result};
pub use types::*;

pub use core::config::{EngineConfig, ScaleConfig, SearchConfig, TableConfig, TableUnit};
pub use core::gate::{InferenceGate, RequestToken};
pub use core::pipeline::{PassOutput, post_process, text_at_point};
#[cfg(all(feature = "raster", feature = "tokio-runtime"))]
pub use core::session::{CaptureSession, PassStatus};

#[cfg(feature = "raster")]
pub use ocr::{OcrBackend, PaddedImage, pad_image, scale_uniform};
pub use ocr::{ScaleAdvisor, extract_page_from_tsv, ideal_scale, load_page_file};

pub use table::{GridInferencer, GridSettings, ResultColumn, ResultRow, ResultTable, assemble, assemble_plain, assemble_table};
pub use text::{LanguageProfile, fix_letter_number_errors, join, join_line, join_lines, reverse_words_rtl, select_matches};
