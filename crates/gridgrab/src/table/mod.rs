//! Table reconstruction from word geometry.
//!
//! [`GridInferencer`] partitions recognized words into rows and columns using
//! only their bounding boxes, and [`assemble`] turns the assignment back into
//! tab/newline separated text that pastes cleanly into a spreadsheet.
//!
//! # Example
//!
//! ```rust
//! use gridgrab::table::{GridInferencer, GridSettings, assemble_table};
//! use gridgrab::types::{Rect, Word};
//!
//! let mut words = vec![
//!     Word::new("A", Rect::from_xywh(10.0, 10.0, 20.0, 10.0), 0),
//!     Word::new("B", Rect::from_xywh(60.0, 10.0, 20.0, 10.0), 0),
//!     Word::new("C", Rect::from_xywh(10.0, 40.0, 20.0, 10.0), 1),
//!     Word::new("D", Rect::from_xywh(60.0, 40.0, 20.0, 10.0), 1),
//! ];
//! let settings = GridSettings { outlier_threshold: 1, ..Default::default() };
//! let table = GridInferencer::new(settings).infer(&mut words, Rect::from_xywh(0.0, 0.0, 100.0, 60.0));
//!
//! assert_eq!(assemble_table(&words, &table, true), "A\tB\nC\tD");
//! ```
pub mod assembler;
pub mod inference;
pub mod merge;
pub mod model;

pub use assembler::{assemble, assemble_plain, assemble_table};
pub use inference::{GridInferencer, GridSettings, infer_grid};
pub use merge::{merge_outlier_columns, merge_outlier_rows};
pub use model::{Band, BandArena, ResultColumn, ResultRow, ResultTable};
